//! Broker CSV import.
//!
//! Headers are resolved against [`COLUMN_MAPPING`]; adding a broker column is
//! a new table entry. Rows are handled independently: a duplicate or
//! incomplete row is skipped, a row with an unparseable value is reported in
//! `errors`, and neither stops the batch. Only a file that is not readable
//! as CSV at all fails the call, before anything is written.

use crate::domain::entities::trade::{NewTrade, Trade};
use crate::domain::error::DomainError;
use crate::domain::ports::trade_repository::TradeRepository;
use crate::domain::values::money::parse_amount;
use crate::domain::values::side::Side;
use crate::domain::values::timestamp::parse_timestamp;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use std::io::Read;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TradeField {
    TradeId,
    Symbol,
    Side,
    Volume,
    OpenPrice,
    ClosePrice,
    StopLoss,
    TakeProfit,
    OpenTime,
    CloseTime,
    Commission,
    Swap,
    Profit,
    Reason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Text,
    Decimal,
    Timestamp,
}

impl TradeField {
    fn kind(self) -> FieldKind {
        match self {
            TradeField::OpenTime | TradeField::CloseTime => FieldKind::Timestamp,
            TradeField::Volume
            | TradeField::OpenPrice
            | TradeField::ClosePrice
            | TradeField::StopLoss
            | TradeField::TakeProfit
            | TradeField::Commission
            | TradeField::Swap
            | TradeField::Profit => FieldKind::Decimal,
            TradeField::TradeId | TradeField::Symbol | TradeField::Side | TradeField::Reason => {
                FieldKind::Text
            }
        }
    }

    fn name(self) -> &'static str {
        match self {
            TradeField::TradeId => "trade_id",
            TradeField::Symbol => "symbol",
            TradeField::Side => "side",
            TradeField::Volume => "volume",
            TradeField::OpenPrice => "open_price",
            TradeField::ClosePrice => "close_price",
            TradeField::StopLoss => "stop_loss",
            TradeField::TakeProfit => "take_profit",
            TradeField::OpenTime => "open_time",
            TradeField::CloseTime => "close_time",
            TradeField::Commission => "commission",
            TradeField::Swap => "swap",
            TradeField::Profit => "profit",
            TradeField::Reason => "reason",
        }
    }
}

/// Broker export header -> trade field.
pub const COLUMN_MAPPING: &[(&str, TradeField)] = &[
    ("ID", TradeField::TradeId),
    ("Symbol", TradeField::Symbol),
    ("Side", TradeField::Side),
    ("Volume", TradeField::Volume),
    ("Open price", TradeField::OpenPrice),
    ("Close Price", TradeField::ClosePrice),
    ("Stop loss", TradeField::StopLoss),
    ("Take profit", TradeField::TakeProfit),
    ("Open time", TradeField::OpenTime),
    ("Close time", TradeField::CloseTime),
    ("Commission", TradeField::Commission),
    ("Swap", TradeField::Swap),
    ("Profit", TradeField::Profit),
    ("Reason", TradeField::Reason),
];

/// A row must carry all of these to become a trade.
pub const REQUIRED_FIELDS: &[TradeField] = &[
    TradeField::TradeId,
    TradeField::Symbol,
    TradeField::Side,
    TradeField::Volume,
    TradeField::OpenPrice,
    TradeField::OpenTime,
];

const NULL_MARKERS: &[&str] = &["nan", "na", "n/a", "null", "none"];

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportReport {
    pub processed: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
}

#[derive(Debug)]
enum RowOutcome {
    Imported,
    Duplicate,
    Incomplete(TradeField),
}

#[derive(Debug, Clone)]
enum FieldValue {
    Text(String),
    Decimal(Decimal),
    Timestamp(DateTime<Utc>),
}

/// Typed values of one row, keyed by the field they were mapped to.
#[derive(Debug, Default)]
struct MappedRow {
    values: HashMap<TradeField, FieldValue>,
}

impl MappedRow {
    fn text(&self, field: TradeField) -> Option<&str> {
        match self.values.get(&field) {
            Some(FieldValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    fn decimal(&self, field: TradeField) -> Option<Decimal> {
        match self.values.get(&field) {
            Some(FieldValue::Decimal(d)) => Some(*d),
            _ => None,
        }
    }

    fn timestamp(&self, field: TradeField) -> Option<DateTime<Utc>> {
        match self.values.get(&field) {
            Some(FieldValue::Timestamp(t)) => Some(*t),
            _ => None,
        }
    }

    fn missing_required(&self) -> Option<TradeField> {
        REQUIRED_FIELDS
            .iter()
            .copied()
            .find(|f| !self.values.contains_key(f))
    }
}

/// Parsed upload, held in memory so a malformed file is rejected before any write.
struct Table {
    headers: Vec<String>,
    rows: Vec<csv::StringRecord>,
}

fn read_table<R: Read>(reader: R) -> Result<Table, DomainError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| DomainError::Import(e.to_string()))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(DomainError::Import("No columns to parse from file".into()));
    }

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(|e| DomainError::Import(e.to_string()))?;
        if record.len() > headers.len() {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            return Err(DomainError::Import(format!(
                "Expected {} fields in line {}, saw {}",
                headers.len(),
                line,
                record.len()
            )));
        }
        rows.push(record);
    }

    Ok(Table { headers, rows })
}

/// Map header positions to fields. Exact names win; remaining headers fall
/// back to a case-insensitive match. The first column claiming a field keeps it.
fn resolve_columns(headers: &[String]) -> Vec<(usize, TradeField)> {
    let mut claimed: HashMap<TradeField, usize> = HashMap::new();

    for (idx, header) in headers.iter().enumerate() {
        if let Some((_, field)) = COLUMN_MAPPING.iter().find(|(name, _)| *name == header.as_str()) {
            claimed.entry(*field).or_insert(idx);
        }
    }
    for (idx, header) in headers.iter().enumerate() {
        if claimed.values().any(|&i| i == idx) {
            continue;
        }
        if let Some((_, field)) = COLUMN_MAPPING
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(header))
        {
            claimed.entry(*field).or_insert(idx);
        }
    }

    let mut columns: Vec<(usize, TradeField)> = claimed.into_iter().map(|(f, i)| (i, f)).collect();
    columns.sort_by_key(|(i, _)| *i);
    columns
}

fn cell(record: &csv::StringRecord, idx: usize) -> Option<&str> {
    let raw = record.get(idx)?.trim();
    if raw.is_empty() || NULL_MARKERS.iter().any(|m| m.eq_ignore_ascii_case(raw)) {
        return None;
    }
    Some(raw)
}

fn map_row(record: &csv::StringRecord, columns: &[(usize, TradeField)]) -> Result<MappedRow, String> {
    let mut row = MappedRow::default();
    for &(idx, field) in columns {
        let Some(raw) = cell(record, idx) else {
            continue;
        };
        let value = match field.kind() {
            FieldKind::Text => FieldValue::Text(raw.to_string()),
            FieldKind::Decimal => FieldValue::Decimal(
                parse_amount(raw).map_err(|e| format!("{}: {e}", field.name()))?,
            ),
            FieldKind::Timestamp => FieldValue::Timestamp(
                parse_timestamp(raw).map_err(|e| format!("{}: {e}", field.name()))?,
            ),
        };
        row.values.insert(field, value);
    }
    Ok(row)
}

fn build_trade(account_id: &str, row: &MappedRow) -> Result<Trade, String> {
    let side: Side = row.text(TradeField::Side).ok_or("side missing")?.parse()?;
    let required = NewTrade {
        trade_id: row.text(TradeField::TradeId).ok_or("trade_id missing")?.to_string(),
        symbol: row.text(TradeField::Symbol).ok_or("symbol missing")?.to_string(),
        side,
        volume: row.decimal(TradeField::Volume).ok_or("volume missing")?,
        open_price: row.decimal(TradeField::OpenPrice).ok_or("open_price missing")?,
        open_time: row.timestamp(TradeField::OpenTime).ok_or("open_time missing")?,
    };

    let mut trade = Trade::new(account_id, required)
        .and_then(|t| {
            t.with_close(
                row.decimal(TradeField::ClosePrice),
                row.timestamp(TradeField::CloseTime),
            )
        })
        .map_err(|e| e.to_string())?;
    trade.stop_loss = row.decimal(TradeField::StopLoss);
    trade.take_profit = row.decimal(TradeField::TakeProfit);
    trade.commission = row.decimal(TradeField::Commission).unwrap_or_default();
    trade.swap = row.decimal(TradeField::Swap).unwrap_or_default();
    trade.profit = row.decimal(TradeField::Profit).unwrap_or_default();
    trade.reason = row.text(TradeField::Reason).map(String::from);
    Ok(trade)
}

pub struct CsvTradeImporter {
    trades: Arc<dyn TradeRepository>,
}

impl CsvTradeImporter {
    pub fn new(trades: Arc<dyn TradeRepository>) -> Self {
        Self { trades }
    }

    /// Import every row of `reader` into `account_id`.
    pub fn process_csv<R: Read>(&self, account_id: &str, reader: R) -> Result<ImportReport, DomainError> {
        let table = read_table(reader)?;
        let columns = resolve_columns(&table.headers);
        let id_column = columns
            .iter()
            .find(|(_, f)| *f == TradeField::TradeId)
            .map(|(i, _)| *i);

        let mut report = ImportReport::default();
        for (index, record) in table.rows.iter().enumerate() {
            let row_number = index + 1;
            match self.import_row(account_id, record, &columns, id_column) {
                Ok(RowOutcome::Imported) => report.processed += 1,
                Ok(RowOutcome::Duplicate) => {
                    debug!(row = row_number, "skipping trade already stored");
                    report.skipped += 1;
                }
                Ok(RowOutcome::Incomplete(field)) => {
                    debug!(row = row_number, field = field.name(), "skipping row without required field");
                    report.skipped += 1;
                }
                Err(cause) => {
                    warn!(row = row_number, %cause, "row rejected");
                    report.errors.push(format!("Row {row_number}: {cause}"));
                }
            }
        }

        info!(
            account_id,
            processed = report.processed,
            skipped = report.skipped,
            errors = report.errors.len(),
            "CSV import finished"
        );
        Ok(report)
    }

    fn import_row(
        &self,
        account_id: &str,
        record: &csv::StringRecord,
        columns: &[(usize, TradeField)],
        id_column: Option<usize>,
    ) -> Result<RowOutcome, String> {
        if let Some(trade_id) = id_column.and_then(|i| cell(record, i)) {
            if self.trades.exists(account_id, trade_id).map_err(|e| e.to_string())? {
                return Ok(RowOutcome::Duplicate);
            }
        }

        let row = map_row(record, columns)?;
        if let Some(field) = row.missing_required() {
            return Ok(RowOutcome::Incomplete(field));
        }

        let trade = build_trade(account_id, &row)?;
        // The unique (account, trade_id) key catches a concurrent import of the same row.
        if self.trades.insert_trade(&trade).map_err(|e| e.to_string())? {
            Ok(RowOutcome::Imported)
        } else {
            Ok(RowOutcome::Duplicate)
        }
    }
}
