//! Shared test helpers.
#![allow(dead_code)]

use rust_decimal_macros::dec;
use tradebook::domain::values::account_type::AccountType;
use tradebook::Tradebook;

pub const HEADER: &str = "ID,Symbol,Side,Volume,Open price,Close Price,Stop loss,Take profit,Open time,Close time,Commission,Swap,Profit,Reason";

pub fn setup() -> Tradebook {
    Tradebook::new(":memory:").unwrap()
}

pub fn make_account(tb: &Tradebook) -> String {
    tb.create_account("Main".into(), "IC Markets".into(), AccountType::Demo, dec!(10000))
        .unwrap()
        .id
}

/// One CSV line for a trade closed on `day` of May 2024 at `hour`.
pub fn closed_row(id: &str, symbol: &str, volume: &str, profit: &str, day: u32, hour: u32) -> String {
    format!(
        "{id},{symbol},BUY,{volume},1.1000,1.1010,,,2024-05-{day:02} {open:02}:00:00,2024-05-{day:02} {hour:02}:00:00,-0.50,0,{profit},",
        open = hour.saturating_sub(1),
    )
}

pub fn csv(rows: &[String]) -> String {
    let mut out = String::from(HEADER);
    for row in rows {
        out.push('\n');
        out.push_str(row);
    }
    out.push('\n');
    out
}

pub fn import(tb: &Tradebook, account: &str, rows: &[String]) {
    let report = tb.import_csv(account, csv(rows).as_bytes()).unwrap();
    assert!(report.errors.is_empty(), "unexpected errors: {:?}", report.errors);
}
