use crate::domain::entities::account::TradingAccount;
use crate::domain::error::DomainError;
use crate::domain::ports::account_repository::AccountRepository;
use crate::domain::values::account_type::AccountType;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;

pub struct AccountUseCase {
    repo: Arc<dyn AccountRepository>,
}

impl AccountUseCase {
    pub fn new(repo: Arc<dyn AccountRepository>) -> Self {
        Self { repo }
    }

    pub fn create(
        &self,
        name: String,
        broker: String,
        account_type: AccountType,
        initial_balance: Decimal,
    ) -> Result<TradingAccount, DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::InvalidInput("Account name is required".into()));
        }
        let account = TradingAccount::new(name, broker, account_type, initial_balance);
        self.repo.add_account(&account)?;
        info!(account_id = %account.id, name = %account.name, "account created");
        Ok(account)
    }

    /// Like `get` but an unknown id is an error.
    pub fn require(&self, id: &str) -> Result<TradingAccount, DomainError> {
        self.repo
            .get_account(id)?
            .ok_or_else(|| DomainError::NotFound(format!("Account not found: {id}")))
    }

    pub fn get(&self, id: &str) -> Result<Option<TradingAccount>, DomainError> {
        self.repo.get_account(id)
    }

    pub fn list(&self) -> Result<Vec<TradingAccount>, DomainError> {
        self.repo.list_accounts()
    }
}
