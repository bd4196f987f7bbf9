use crate::domain::entities::account::TradingAccount;
use crate::domain::error::DomainError;

pub trait AccountRepository: Send + Sync {
    fn add_account(&self, account: &TradingAccount) -> Result<(), DomainError>;
    fn get_account(&self, id: &str) -> Result<Option<TradingAccount>, DomainError>;
    fn list_accounts(&self) -> Result<Vec<TradingAccount>, DomainError>;
}
