use crate::domain::error::DomainError;
use crate::domain::values::side::Side;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One position as exported by the broker. Identity is `(account_id, trade_id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub account_id: String,
    pub trade_id: String,
    pub symbol: String,
    pub side: Side,
    pub volume: Decimal,
    pub open_price: Decimal,
    pub close_price: Option<Decimal>,
    pub stop_loss: Option<Decimal>,
    pub take_profit: Option<Decimal>,
    pub open_time: DateTime<Utc>,
    pub close_time: Option<DateTime<Utc>>,
    pub commission: Decimal,
    pub swap: Decimal,
    pub profit: Decimal,
    pub reason: Option<String>,
}

/// Fields required to construct a [`Trade`]; everything else defaults.
#[derive(Debug, Clone)]
pub struct NewTrade {
    pub trade_id: String,
    pub symbol: String,
    pub side: Side,
    pub volume: Decimal,
    pub open_price: Decimal,
    pub open_time: DateTime<Utc>,
}

impl Trade {
    pub fn new(account_id: impl Into<String>, required: NewTrade) -> Result<Self, DomainError> {
        if required.volume <= Decimal::ZERO {
            return Err(DomainError::InvalidInput(format!(
                "Volume must be positive, got {}",
                required.volume
            )));
        }
        Ok(Self {
            account_id: account_id.into(),
            trade_id: required.trade_id,
            symbol: required.symbol,
            side: required.side,
            volume: required.volume,
            open_price: required.open_price,
            close_price: None,
            stop_loss: None,
            take_profit: None,
            open_time: required.open_time,
            close_time: None,
            commission: Decimal::ZERO,
            swap: Decimal::ZERO,
            profit: Decimal::ZERO,
            reason: None,
        })
    }

    /// Attach the close leg. A close time without a close price is rejected.
    pub fn with_close(
        mut self,
        close_price: Option<Decimal>,
        close_time: Option<DateTime<Utc>>,
    ) -> Result<Self, DomainError> {
        if close_time.is_some() && close_price.is_none() {
            return Err(DomainError::InvalidInput(format!(
                "Trade {} has a close time but no close price",
                self.trade_id
            )));
        }
        self.close_price = close_price;
        self.close_time = close_time;
        Ok(self)
    }

    pub fn is_closed(&self) -> bool {
        self.close_time.is_some()
    }

    /// Hours the position was (or has been) held. Open trades measure up to `now`.
    pub fn duration_hours(&self, now: DateTime<Utc>) -> Decimal {
        let end = self.close_time.unwrap_or(now);
        let secs = (end - self.open_time).num_seconds();
        Decimal::from(secs) / Decimal::from(3600)
    }

    /// Price movement in pips, signed in the trade's favour.
    pub fn pips(&self) -> Decimal {
        let close_price = match (self.is_closed(), self.close_price) {
            (true, Some(p)) => p,
            _ => return Decimal::ZERO,
        };

        let mut diff = close_price - self.open_price;
        if self.side == Side::Sell {
            diff = -diff;
        }

        let symbol = self.symbol.to_uppercase();
        let multiplier = if symbol.contains("JPY") {
            100
        } else if symbol.contains("XAU") || symbol.contains("GOLD") {
            10
        } else {
            10_000
        };
        diff * Decimal::from(multiplier)
    }
}
