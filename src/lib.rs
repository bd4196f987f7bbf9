pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

use crate::application::accounts::AccountUseCase;
use crate::application::analytics::AnalyticsUseCase;
use crate::application::import::{CsvTradeImporter, ImportReport};
use crate::application::portfolio::AnalyzerConfig;
use crate::application::report::{AdvancedAnalytics, PortfolioSummary, RiskMetrics, TradeView};
use crate::domain::entities::account::TradingAccount;
use crate::domain::entities::trade::Trade;
use crate::domain::error::DomainError;
use crate::domain::ports::account_repository::AccountRepository;
use crate::domain::ports::trade_repository::{TradeFilter, TradeRepository};
use crate::domain::values::account_type::AccountType;
use crate::infrastructure::sqlite::account_repo::SqliteAccountRepo;
use crate::infrastructure::sqlite::migrations::run_migrations;
use crate::infrastructure::sqlite::trade_repo::SqliteTradeRepo;
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::info;

pub struct Tradebook {
    account_uc: AccountUseCase,
    importer: CsvTradeImporter,
    analytics_uc: AnalyticsUseCase,
    trade_repo: Arc<dyn TradeRepository>,
}

impl Tradebook {
    pub fn new(db_path: &str) -> Result<Self, DomainError> {
        Self::with_config(db_path, AnalyzerConfig::default())
    }

    pub fn with_config(db_path: &str, config: AnalyzerConfig) -> Result<Self, DomainError> {
        let conn = Connection::open(db_path).map_err(|e| DomainError::Database(format!("DB error: {e}")))?;
        conn.pragma_update(None, "journal_mode", "WAL").map_err(|e| DomainError::Database(format!("WAL error: {e}")))?;
        conn.pragma_update(None, "foreign_keys", "ON").map_err(|e| DomainError::Database(format!("Pragma error: {e}")))?;
        run_migrations(&conn)?;
        info!(db_path, "database ready");

        let conn = Arc::new(Mutex::new(conn));
        let account_repo: Arc<dyn AccountRepository> = Arc::new(SqliteAccountRepo::new(conn.clone()));
        let trade_repo: Arc<dyn TradeRepository> = Arc::new(SqliteTradeRepo::new(conn));

        Ok(Self::with_repositories(account_repo, trade_repo, config))
    }

    /// Wire the use cases over arbitrary stores.
    pub fn with_repositories(
        account_repo: Arc<dyn AccountRepository>,
        trade_repo: Arc<dyn TradeRepository>,
        config: AnalyzerConfig,
    ) -> Self {
        Self {
            account_uc: AccountUseCase::new(account_repo),
            importer: CsvTradeImporter::new(trade_repo.clone()),
            analytics_uc: AnalyticsUseCase::new(trade_repo.clone(), config),
            trade_repo,
        }
    }

    pub fn create_account(
        &self,
        name: String,
        broker: String,
        account_type: AccountType,
        initial_balance: Decimal,
    ) -> Result<TradingAccount, DomainError> {
        self.account_uc.create(name, broker, account_type, initial_balance)
    }

    pub fn get_account(&self, id: &str) -> Result<Option<TradingAccount>, DomainError> {
        self.account_uc.get(id)
    }

    pub fn list_accounts(&self) -> Result<Vec<TradingAccount>, DomainError> {
        self.account_uc.list()
    }

    pub fn import_csv<R: Read>(&self, account_id: &str, reader: R) -> Result<ImportReport, DomainError> {
        self.account_uc.require(account_id)?;
        self.importer.process_csv(account_id, reader)
    }

    pub fn import_csv_file(&self, account_id: &str, path: &Path) -> Result<ImportReport, DomainError> {
        let file = File::open(path)
            .map_err(|e| DomainError::InvalidInput(format!("Cannot open {}: {e}", path.display())))?;
        self.import_csv(account_id, BufReader::new(file))
    }

    pub fn trade_list(
        &self,
        account_id: &str,
        closed: Option<bool>,
        symbol: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<Trade>, DomainError> {
        self.account_uc.require(account_id)?;
        self.trade_repo.list_trades(&TradeFilter {
            account_id: Some(account_id.to_string()),
            symbol: symbol.map(String::from),
            closed,
            limit,
        })
    }

    pub fn portfolio_summary(&self, account_id: &str) -> Result<PortfolioSummary, DomainError> {
        self.account_uc.require(account_id)?;
        self.analytics_uc.summary(account_id)
    }

    pub fn recent_trades(&self, account_id: &str) -> Result<Vec<TradeView>, DomainError> {
        self.account_uc.require(account_id)?;
        self.analytics_uc.recent_trades(account_id)
    }

    /// `None` when the account has no closed trades.
    pub fn advanced_analytics(&self, account_id: &str) -> Result<Option<AdvancedAnalytics>, DomainError> {
        self.account_uc.require(account_id)?;
        self.analytics_uc.advanced(account_id)
    }

    /// `None` when the account has no closed trades.
    pub fn risk_metrics(&self, account_id: &str) -> Result<Option<RiskMetrics>, DomainError> {
        self.account_uc.require(account_id)?;
        self.analytics_uc.risk(account_id)
    }
}
