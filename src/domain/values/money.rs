//! Display-boundary conversions. Accumulation stays in `Decimal`; these are
//! only called when a report value is produced.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Round half-to-even at `dp` places and convert for display.
pub fn round_f64(value: Decimal, dp: u32) -> f64 {
    value.round_dp(dp).to_f64().unwrap_or(0.0)
}

pub fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// Parse an exact decimal from text, accepting scientific notation (`1e-3`)
/// as some spreadsheet exports write small volumes that way.
pub fn parse_decimal(raw: &str) -> Result<Decimal, String> {
    let s = raw.trim();
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .map_err(|_| format!("Invalid decimal value: '{s}'"))
}

/// Imported amounts and prices must stay below this magnitude.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000;

/// `parse_decimal` bounded by [`MAX_AMOUNT`], so sums and squares over a
/// journal stay inside `Decimal` range.
pub fn parse_amount(raw: &str) -> Result<Decimal, String> {
    let value = parse_decimal(raw)?;
    if value.abs() >= Decimal::from(MAX_AMOUNT) {
        return Err(format!("Value out of range: '{}'", raw.trim()));
    }
    Ok(value)
}
