use crate::domain::error::DomainError;
use rusqlite::Connection;

pub fn run_migrations(conn: &Connection) -> Result<(), DomainError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS accounts (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            broker TEXT NOT NULL,
            account_type TEXT NOT NULL,
            initial_balance TEXT NOT NULL,
            current_balance TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS trades (
            account_id TEXT NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
            trade_id TEXT NOT NULL,
            symbol TEXT NOT NULL,
            side TEXT NOT NULL,
            volume TEXT NOT NULL,
            open_price TEXT NOT NULL,
            close_price TEXT,
            stop_loss TEXT,
            take_profit TEXT,
            open_time TEXT NOT NULL,
            close_time TEXT,
            commission TEXT NOT NULL DEFAULT '0',
            swap TEXT NOT NULL DEFAULT '0',
            profit TEXT NOT NULL DEFAULT '0',
            reason TEXT,
            UNIQUE (account_id, trade_id)
        );

        CREATE INDEX IF NOT EXISTS idx_trades_account_symbol ON trades(account_id, symbol);
        CREATE INDEX IF NOT EXISTS idx_trades_close_time ON trades(close_time);
        "
    ).map_err(|e| DomainError::Database(format!("Migration failed: {e}")))
}
