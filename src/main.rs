use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use tradebook::cli::commands::{Cli, Commands};
use tradebook::config::Config;
use tradebook::domain::values::account_type::AccountType;
use tradebook::domain::values::money::parse_decimal;
use tradebook::Tradebook;

fn main() {
    let cli = Cli::parse();
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let tb = match Tradebook::with_config(&config.db_path, config.analyzer.clone()) {
        Ok(tb) => tb,
        Err(e) => {
            eprintln!("Error initializing Tradebook: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_command(tb, cli.command) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Analytics views with no closed trades print as an empty object.
fn print_optional<T: Serialize>(value: Option<T>) -> Result<(), Box<dyn std::error::Error>> {
    match value {
        Some(v) => print_json(&v),
        None => print_json(&serde_json::json!({})),
    }
}

fn run_command(tb: Tradebook, cmd: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::AccountAdd {
            name,
            broker,
            account_type,
            balance,
        } => {
            let kind: AccountType = account_type.parse()?;
            let balance = parse_decimal(&balance)?;
            let account = tb.create_account(name, broker, kind, balance)?;
            print_json(&account)?;
        }
        Commands::Accounts => {
            print_json(&tb.list_accounts()?)?;
        }
        Commands::Import { account, file } => {
            let report = tb.import_csv_file(&account, &file)?;
            print_json(&report)?;
        }
        Commands::Summary { account } => {
            print_json(&tb.portfolio_summary(&account)?)?;
        }
        Commands::Trades { account } => {
            print_json(&tb.recent_trades(&account)?)?;
        }
        Commands::Analytics { account } => {
            print_optional(tb.advanced_analytics(&account)?)?;
        }
        Commands::Risk { account } => {
            print_optional(tb.risk_metrics(&account)?)?;
        }
        Commands::Export {
            account,
            closed,
            symbol,
            limit,
        } => {
            print_json(&tb.trade_list(&account, closed, symbol.as_deref(), limit)?)?;
        }
    }
    Ok(())
}
