use crate::application::portfolio::AnalyzerConfig;
use crate::domain::error::DomainError;
use crate::domain::values::money::parse_decimal;
use dotenv::dotenv;

/// Runtime settings, read from the environment (and `.env` when present).
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub log_filter: String,
    pub analyzer: AnalyzerConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, DomainError> {
        dotenv().ok();

        let mut analyzer = AnalyzerConfig::default();
        if let Ok(rate) = std::env::var("TRADEBOOK_RISK_FREE_RATE") {
            analyzer.annual_risk_free_rate = parse_decimal(&rate)
                .map_err(|e| DomainError::InvalidInput(format!("TRADEBOOK_RISK_FREE_RATE: {e}")))?;
        }

        Ok(Config {
            db_path: std::env::var("TRADEBOOK_DB").unwrap_or_else(|_| "./tradebook.db".into()),
            log_filter: std::env::var("TRADEBOOK_LOG").unwrap_or_else(|_| "info".into()),
            analyzer,
        })
    }
}
