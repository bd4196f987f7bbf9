use crate::domain::entities::trade::Trade;
use crate::domain::error::DomainError;

#[derive(Debug, Clone, Default)]
pub struct TradeFilter {
    pub account_id: Option<String>,
    pub symbol: Option<String>,
    /// `Some(true)` keeps only trades with a close time, `Some(false)` only open ones.
    pub closed: Option<bool>,
    pub limit: Option<usize>,
}

impl TradeFilter {
    pub fn closed_for(account_id: &str) -> Self {
        Self {
            account_id: Some(account_id.to_string()),
            closed: Some(true),
            ..Self::default()
        }
    }
}

pub trait TradeRepository: Send + Sync {
    /// Insert unless `(account_id, trade_id)` is already stored.
    /// Returns `false` when the row was a duplicate.
    fn insert_trade(&self, trade: &Trade) -> Result<bool, DomainError>;
    fn exists(&self, account_id: &str, trade_id: &str) -> Result<bool, DomainError>;
    /// Results are ordered most recent close first, open trades last.
    fn list_trades(&self, filter: &TradeFilter) -> Result<Vec<Trade>, DomainError>;
}
