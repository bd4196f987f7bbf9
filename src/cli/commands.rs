use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tradebook", about = "Trading journal with CSV import and portfolio analytics")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a trading account
    AccountAdd {
        name: String,
        /// Broker name
        #[arg(long, default_value = "")]
        broker: String,
        /// Account type (demo, live)
        #[arg(long = "type", default_value = "demo")]
        account_type: String,
        /// Starting balance
        #[arg(long, default_value = "0")]
        balance: String,
    },
    /// List trading accounts
    Accounts,
    /// Import trades from a broker CSV export
    Import {
        /// Account ID
        account: String,
        /// Path to the CSV file
        file: PathBuf,
    },
    /// Portfolio summary for closed trades
    Summary { account: String },
    /// Most recent closed trades
    Trades { account: String },
    /// Sharpe, drawdown, VaR and period breakdowns
    Analytics { account: String },
    /// Risk distribution, position sizing and alerts
    Risk { account: String },
    /// Dump stored trades as JSON, open ones included
    Export {
        account: String,
        /// Only closed (true) or only open (false) trades
        #[arg(long)]
        closed: Option<bool>,
        /// Only trades in this symbol
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long)]
        limit: Option<usize>,
    },
}
