use crate::domain::values::account_type::AccountType;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradingAccount {
    pub id: String,
    pub name: String,
    pub broker: String,
    pub account_type: AccountType,
    pub initial_balance: Decimal,
    pub current_balance: Decimal,
    pub created_at: DateTime<Utc>,
}

impl TradingAccount {
    pub fn new(name: String, broker: String, account_type: AccountType, initial_balance: Decimal) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            broker,
            account_type,
            initial_balance,
            current_balance: initial_balance,
            created_at: Utc::now(),
        }
    }
}
