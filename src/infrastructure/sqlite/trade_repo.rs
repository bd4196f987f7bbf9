use crate::domain::entities::trade::Trade;
use crate::domain::error::DomainError;
use crate::domain::ports::trade_repository::*;
use crate::domain::values::side::Side;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

const TRADE_COLUMNS: &str = "account_id, trade_id, symbol, side, volume, open_price, close_price, stop_loss, take_profit, open_time, close_time, commission, swap, profit, reason";

pub struct SqliteTradeRepo {
    conn: Arc<Mutex<Connection>>,
}

/// Fixed-width UTC form so `ORDER BY` on the text column is chronological.
pub(crate) fn encode_time(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn decode_time(idx: usize, s: &str) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn decode_decimal(idx: usize, s: &str) -> Result<Decimal, rusqlite::Error> {
    Decimal::from_str(s)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn decode_opt_decimal(row: &rusqlite::Row, idx: usize) -> Result<Option<Decimal>, rusqlite::Error> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| decode_decimal(idx, &s)).transpose()
}

impl SqliteTradeRepo {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn row_to_trade(row: &rusqlite::Row) -> Result<Trade, rusqlite::Error> {
        let side_str: String = row.get(3)?;
        let side: Side = side_str.parse().map_err(|e: String| {
            rusqlite::Error::FromSqlConversionFailure(3, Type::Text, e.into())
        })?;
        let volume: String = row.get(4)?;
        let open_price: String = row.get(5)?;
        let open_time: String = row.get(9)?;
        let close_time: Option<String> = row.get(10)?;
        let commission: String = row.get(11)?;
        let swap: String = row.get(12)?;
        let profit: String = row.get(13)?;

        Ok(Trade {
            account_id: row.get(0)?,
            trade_id: row.get(1)?,
            symbol: row.get(2)?,
            side,
            volume: decode_decimal(4, &volume)?,
            open_price: decode_decimal(5, &open_price)?,
            close_price: decode_opt_decimal(row, 6)?,
            stop_loss: decode_opt_decimal(row, 7)?,
            take_profit: decode_opt_decimal(row, 8)?,
            open_time: decode_time(9, &open_time)?,
            close_time: close_time.map(|s| decode_time(10, &s)).transpose()?,
            commission: decode_decimal(11, &commission)?,
            swap: decode_decimal(12, &swap)?,
            profit: decode_decimal(13, &profit)?,
            reason: row.get(14)?,
        })
    }
}

impl TradeRepository for SqliteTradeRepo {
    fn insert_trade(&self, trade: &Trade) -> Result<bool, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let rows = conn.execute(
            &format!(
                "INSERT INTO trades ({TRADE_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
                 ON CONFLICT (account_id, trade_id) DO NOTHING"
            ),
            params![
                trade.account_id,
                trade.trade_id,
                trade.symbol,
                trade.side.to_string(),
                trade.volume.to_string(),
                trade.open_price.to_string(),
                trade.close_price.map(|d| d.to_string()),
                trade.stop_loss.map(|d| d.to_string()),
                trade.take_profit.map(|d| d.to_string()),
                encode_time(&trade.open_time),
                trade.close_time.as_ref().map(encode_time),
                trade.commission.to_string(),
                trade.swap.to_string(),
                trade.profit.to_string(),
                trade.reason,
            ],
        ).map_err(|e| DomainError::Database(format!("Failed to add trade: {e}")))?;
        Ok(rows == 1)
    }

    fn exists(&self, account_id: &str, trade_id: &str) -> Result<bool, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let found: i64 = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM trades WHERE account_id = ?1 AND trade_id = ?2)",
            params![account_id, trade_id],
            |row| row.get(0),
        )?;
        Ok(found == 1)
    }

    fn list_trades(&self, filter: &TradeFilter) -> Result<Vec<Trade>, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let mut sql = format!("SELECT {TRADE_COLUMNS} FROM trades WHERE 1=1");
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(account_id) = &filter.account_id {
            sql.push_str(&format!(" AND account_id = ?{}", param_values.len() + 1));
            param_values.push(Box::new(account_id.clone()));
        }
        if let Some(symbol) = &filter.symbol {
            sql.push_str(&format!(" AND symbol = ?{}", param_values.len() + 1));
            param_values.push(Box::new(symbol.clone()));
        }
        if let Some(closed) = filter.closed {
            if closed {
                sql.push_str(" AND close_time IS NOT NULL");
            } else {
                sql.push_str(" AND close_time IS NULL");
            }
        }
        sql.push_str(" ORDER BY close_time IS NULL, close_time DESC, open_time DESC, trade_id DESC");
        if let Some(limit) = filter.limit {
            sql.push_str(&format!(" LIMIT ?{}", param_values.len() + 1));
            param_values.push(Box::new(limit as i64));
        }

        let params_refs: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();
        let mut stmt = conn.prepare(&sql)?;
        let trades = stmt
            .query_map(params_refs.as_slice(), Self::row_to_trade)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DomainError::Database(format!("Corrupt trade row: {e}")))?;
        Ok(trades)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::account::TradingAccount;
    use crate::domain::entities::trade::NewTrade;
    use crate::domain::ports::account_repository::AccountRepository;
    use crate::domain::values::account_type::AccountType;
    use crate::infrastructure::sqlite::account_repo::SqliteAccountRepo;
    use crate::infrastructure::sqlite::migrations::run_migrations;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn setup() -> (SqliteTradeRepo, String) {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let conn = Arc::new(Mutex::new(conn));
        let account = TradingAccount::new("Main".into(), "".into(), AccountType::Demo, dec!(0));
        SqliteAccountRepo::new(conn.clone()).add_account(&account).unwrap();
        (SqliteTradeRepo::new(conn), account.id)
    }

    fn trade(account_id: &str, trade_id: &str, profit: Decimal) -> Trade {
        let mut trade = Trade::new(
            account_id,
            NewTrade {
                trade_id: trade_id.into(),
                symbol: "EURUSD".into(),
                side: Side::Buy,
                volume: dec!(0.1),
                open_price: dec!(1.1000),
                open_time: Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
            },
        )
        .unwrap();
        trade.profit = profit;
        trade
    }

    #[test]
    fn test_conflicting_insert_is_ignored() {
        let (repo, account) = setup();
        assert!(repo.insert_trade(&trade(&account, "42", dec!(10))).unwrap());
        assert!(!repo.insert_trade(&trade(&account, "42", dec!(99))).unwrap());

        let stored = repo.list_trades(&TradeFilter::default()).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].profit, dec!(10));
        assert!(repo.exists(&account, "42").unwrap());
        assert!(!repo.exists(&account, "43").unwrap());
    }

    #[test]
    fn test_filter_by_symbol() {
        let (repo, account) = setup();
        repo.insert_trade(&trade(&account, "1", dec!(1))).unwrap();
        let mut gold = trade(&account, "2", dec!(2));
        gold.symbol = "XAUUSD".into();
        repo.insert_trade(&gold).unwrap();

        let filter = TradeFilter {
            symbol: Some("XAUUSD".into()),
            ..TradeFilter::default()
        };
        let trades = repo.list_trades(&filter).unwrap();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].trade_id, "2");
    }
}
