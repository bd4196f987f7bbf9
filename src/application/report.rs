//! Serializable views produced by the portfolio analyzer.
//!
//! Money and ratios are rounded to 2 places, rates and percentages to 1.
//! Rounding happens once, when these structs are built.

use crate::domain::values::side::Side;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub win_rate: f64,
    pub total_profit: f64,
    pub total_commission: f64,
    /// Reported separately; not part of `net_profit`.
    pub total_swap: f64,
    pub net_profit: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub profit_factor: f64,
    pub total_volume: f64,
    pub symbol_stats: Vec<SymbolStats>,
    pub recent_trades: Vec<TradeView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolStats {
    pub symbol: String,
    pub trades: usize,
    pub profit: f64,
    pub win_rate: f64,
}

/// A closed trade formatted for display (dates as `MM/DD/YYYY`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeView {
    pub id: String,
    pub symbol: String,
    pub side: Side,
    pub volume: f64,
    pub open_price: f64,
    pub close_price: f64,
    pub profit: f64,
    pub pips: f64,
    pub open_time: String,
    pub close_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdvancedAnalytics {
    pub sharpe_ratio: f64,
    /// Percentage decline from the running peak of cumulative profit.
    pub max_drawdown: f64,
    pub avg_duration_hours: f64,
    pub var_95: f64,
    /// Most recent days, ascending by date.
    pub daily_returns: Vec<DailyPnl>,
    pub monthly_performance: Vec<MonthlyPnl>,
    /// Keyed by hour of day (0-23) of the close time; every hour is present.
    pub hourly_performance: BTreeMap<u32, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyPnl {
    pub date: String,
    pub profit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyPnl {
    pub month: String,
    pub profit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskMetrics {
    pub risk_distribution: RiskDistribution,
    pub position_analysis: PositionAnalysis,
    pub risk_alerts: Vec<RiskAlert>,
}

/// Share of trades per volume band, in percent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskDistribution {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionAnalysis {
    pub avg_volume: f64,
    pub max_volume: f64,
    pub min_volume: f64,
    pub volume_consistency: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAlert {
    #[serde(rename = "type")]
    pub level: AlertLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Success,
    Warning,
    Danger,
}
