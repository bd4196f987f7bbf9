use crate::application::portfolio::{AnalyzerConfig, PortfolioAnalyzer};
use crate::application::report::{AdvancedAnalytics, PortfolioSummary, RiskMetrics, TradeView};
use crate::domain::error::DomainError;
use crate::domain::ports::trade_repository::{TradeFilter, TradeRepository};
use std::sync::Arc;
use tracing::debug;

/// Loads an account's closed trades and hands them to the analyzer.
/// Nothing is cached, so every call reflects the current store.
pub struct AnalyticsUseCase {
    repo: Arc<dyn TradeRepository>,
    config: AnalyzerConfig,
}

impl AnalyticsUseCase {
    pub fn new(repo: Arc<dyn TradeRepository>, config: AnalyzerConfig) -> Self {
        Self { repo, config }
    }

    pub fn analyzer(&self, account_id: &str) -> Result<PortfolioAnalyzer, DomainError> {
        let trades = self.repo.list_trades(&TradeFilter::closed_for(account_id))?;
        debug!(account_id, trades = trades.len(), "loaded closed trades");
        Ok(PortfolioAnalyzer::with_config(trades, self.config.clone()))
    }

    pub fn summary(&self, account_id: &str) -> Result<PortfolioSummary, DomainError> {
        Ok(self.analyzer(account_id)?.summary())
    }

    pub fn recent_trades(&self, account_id: &str) -> Result<Vec<TradeView>, DomainError> {
        Ok(self.analyzer(account_id)?.recent_trades())
    }

    pub fn advanced(&self, account_id: &str) -> Result<Option<AdvancedAnalytics>, DomainError> {
        Ok(self.analyzer(account_id)?.advanced_analytics())
    }

    pub fn risk(&self, account_id: &str) -> Result<Option<RiskMetrics>, DomainError> {
        Ok(self.analyzer(account_id)?.risk_metrics())
    }
}
