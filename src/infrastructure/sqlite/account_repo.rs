use crate::domain::entities::account::TradingAccount;
use crate::domain::error::DomainError;
use crate::domain::ports::account_repository::AccountRepository;
use crate::domain::values::account_type::AccountType;
use crate::infrastructure::sqlite::trade_repo::{decode_decimal, decode_time, encode_time};
use rusqlite::types::Type;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

pub struct SqliteAccountRepo {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteAccountRepo {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn row_to_account(row: &rusqlite::Row) -> Result<TradingAccount, rusqlite::Error> {
        let type_str: String = row.get(3)?;
        let account_type: AccountType = type_str.parse().map_err(|e: String| {
            rusqlite::Error::FromSqlConversionFailure(3, Type::Text, e.into())
        })?;
        let initial: String = row.get(4)?;
        let current: String = row.get(5)?;
        let created: String = row.get(6)?;

        Ok(TradingAccount {
            id: row.get(0)?,
            name: row.get(1)?,
            broker: row.get(2)?,
            account_type,
            initial_balance: decode_decimal(4, &initial)?,
            current_balance: decode_decimal(5, &current)?,
            created_at: decode_time(6, &created)?,
        })
    }
}

impl AccountRepository for SqliteAccountRepo {
    fn add_account(&self, account: &TradingAccount) -> Result<(), DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        conn.execute(
            "INSERT INTO accounts (id, name, broker, account_type, initial_balance, current_balance, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                account.id,
                account.name,
                account.broker,
                account.account_type.to_string(),
                account.initial_balance.to_string(),
                account.current_balance.to_string(),
                encode_time(&account.created_at),
            ],
        ).map_err(|e| DomainError::Database(format!("Failed to add account: {e}")))?;
        Ok(())
    }

    fn get_account(&self, id: &str) -> Result<Option<TradingAccount>, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let mut stmt = conn.prepare(
            "SELECT id, name, broker, account_type, initial_balance, current_balance, created_at FROM accounts WHERE id = ?1"
        )?;
        let mut rows = stmt.query_map(params![id], Self::row_to_account)?;
        let account = rows.next().transpose()?;
        Ok(account)
    }

    fn list_accounts(&self) -> Result<Vec<TradingAccount>, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let mut stmt = conn.prepare(
            "SELECT id, name, broker, account_type, initial_balance, current_balance, created_at FROM accounts ORDER BY created_at ASC"
        )?;
        let accounts = stmt
            .query_map([], Self::row_to_account)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(accounts)
    }
}
