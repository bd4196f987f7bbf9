//! Portfolio statistics over a fixed set of trades.
//!
//! `PortfolioAnalyzer` is a pure calculator: it takes an already-loaded trade
//! list, keeps only closed trades, and derives summary, advanced and risk
//! views from it. All accumulation is done in `Decimal`; values are converted
//! to `f64` only when a report struct is built.
//!
//! Degenerate input never errors. Every ratio checks its denominator and
//! yields zero instead, and sums saturate at the `Decimal` bounds.

use crate::application::report::*;
use crate::domain::entities::trade::Trade;
use crate::domain::values::money::{round_f64, to_f64};
use chrono::{NaiveDate, Timelike, Utc};
use rust_decimal::prelude::*;
use std::collections::{BTreeMap, HashMap};

/// Tunables for the analyzer. `Default` gives the journal's standard settings.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Annual rate, spread evenly over 365 days for the Sharpe ratio.
    pub annual_risk_free_rate: Decimal,
    pub var_confidence: Decimal,
    pub recent_trades_limit: usize,
    /// Number of most recent trading days fed into Sharpe and VaR.
    pub daily_window: usize,
    /// Number of most recent trading days returned for display.
    pub daily_display: usize,
    /// Fraction of all trades above which a single symbol is flagged.
    pub concentration_threshold: Decimal,
    pub low_win_rate: Decimal,
    pub high_win_rate: Decimal,
    /// Win-rate alerts need strictly more trades than this.
    pub min_trades_for_win_rate_alert: usize,
    pub low_risk_volume: Decimal,
    pub medium_risk_volume: Decimal,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            annual_risk_free_rate: Decimal::new(2, 2), // 2%
            var_confidence: Decimal::new(95, 2),
            recent_trades_limit: 20,
            daily_window: 60,
            daily_display: 30,
            concentration_threshold: Decimal::new(8, 1),
            low_win_rate: Decimal::from(40),
            high_win_rate: Decimal::from(70),
            min_trades_for_win_rate_alert: 10,
            low_risk_volume: Decimal::new(1, 1),
            medium_risk_volume: Decimal::new(5, 1),
        }
    }
}

pub struct PortfolioAnalyzer {
    /// Closed trades only, most recent close first.
    trades: Vec<Trade>,
    config: AnalyzerConfig,
}

fn sum(values: impl IntoIterator<Item = Decimal>) -> Decimal {
    values
        .into_iter()
        .fold(Decimal::ZERO, |acc, v| acc.saturating_add(v))
}

fn add_to(slot: &mut Decimal, value: Decimal) {
    *slot = slot.saturating_add(value);
}

fn ratio(numerator: Decimal, denominator: Decimal) -> Decimal {
    numerator.checked_div(denominator).unwrap_or(Decimal::ZERO)
}

fn mean(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    ratio(sum(values.iter().copied()), Decimal::from(values.len()))
}

/// Population standard deviation.
fn std_dev(values: &[Decimal], mean: Decimal) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    let squares = sum(values.iter().map(|v| {
        let diff = v.saturating_sub(mean);
        diff.saturating_mul(diff)
    }));
    ratio(squares, Decimal::from(values.len()))
        .sqrt()
        .unwrap_or(Decimal::ZERO)
}

fn percent(part: usize, whole: usize) -> Decimal {
    if whole == 0 {
        return Decimal::ZERO;
    }
    Decimal::from(part) * Decimal::ONE_HUNDRED / Decimal::from(whole)
}

impl PortfolioAnalyzer {
    pub fn new(trades: Vec<Trade>) -> Self {
        Self::with_config(trades, AnalyzerConfig::default())
    }

    pub fn with_config(trades: Vec<Trade>, config: AnalyzerConfig) -> Self {
        let mut trades: Vec<Trade> = trades.into_iter().filter(|t| t.is_closed()).collect();
        trades.sort_by(|a, b| {
            b.close_time
                .cmp(&a.close_time)
                .then_with(|| b.open_time.cmp(&a.open_time))
                .then_with(|| b.trade_id.cmp(&a.trade_id))
        });
        Self { trades, config }
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    fn winners(&self) -> impl Iterator<Item = &Trade> {
        self.trades.iter().filter(|t| t.profit > Decimal::ZERO)
    }

    fn losers(&self) -> impl Iterator<Item = &Trade> {
        self.trades.iter().filter(|t| t.profit < Decimal::ZERO)
    }

    pub fn summary(&self) -> PortfolioSummary {
        if self.trades.is_empty() {
            return PortfolioSummary::default();
        }

        let total_trades = self.trades.len();
        let wins: Vec<Decimal> = self.winners().map(|t| t.profit).collect();
        let losses: Vec<Decimal> = self.losers().map(|t| t.profit).collect();

        let total_profit = sum(self.trades.iter().map(|t| t.profit));
        let total_commission = sum(self.trades.iter().map(|t| t.commission));
        let total_swap = sum(self.trades.iter().map(|t| t.swap));
        let total_volume = sum(self.trades.iter().map(|t| t.volume));
        let net_profit = total_profit.saturating_add(total_commission);

        let gross_profit = sum(wins.iter().copied());
        let gross_loss = sum(losses.iter().copied()).abs();
        let profit_factor = ratio(gross_profit, gross_loss);

        PortfolioSummary {
            total_trades,
            winning_trades: wins.len(),
            losing_trades: losses.len(),
            win_rate: round_f64(percent(wins.len(), total_trades), 1),
            total_profit: round_f64(total_profit, 2),
            total_commission: round_f64(total_commission, 2),
            total_swap: round_f64(total_swap, 2),
            net_profit: round_f64(net_profit, 2),
            avg_win: round_f64(mean(&wins), 2),
            avg_loss: round_f64(mean(&losses), 2),
            profit_factor: round_f64(profit_factor, 2),
            total_volume: round_f64(total_volume, 2),
            symbol_stats: self.symbol_stats(),
            recent_trades: self.recent_trades(),
        }
    }

    /// Per-symbol breakdown, highest profit first.
    pub fn symbol_stats(&self) -> Vec<SymbolStats> {
        let mut by_symbol: BTreeMap<&str, Vec<&Trade>> = BTreeMap::new();
        for trade in &self.trades {
            by_symbol.entry(trade.symbol.as_str()).or_default().push(trade);
        }

        let mut stats: Vec<(Decimal, SymbolStats)> = by_symbol
            .into_iter()
            .map(|(symbol, trades)| {
                let profit = sum(trades.iter().map(|t| t.profit));
                let won = trades.iter().filter(|t| t.profit > Decimal::ZERO).count();
                let stat = SymbolStats {
                    symbol: symbol.to_string(),
                    trades: trades.len(),
                    profit: round_f64(profit, 2),
                    win_rate: round_f64(percent(won, trades.len()), 1),
                };
                (profit, stat)
            })
            .collect();
        // BTreeMap order makes ties fall back to symbol name; sort_by is stable.
        stats.sort_by(|a, b| b.0.cmp(&a.0));
        stats.into_iter().map(|(_, s)| s).collect()
    }

    pub fn recent_trades(&self) -> Vec<TradeView> {
        self.trades
            .iter()
            .take(self.config.recent_trades_limit)
            .map(|t| TradeView {
                id: t.trade_id.clone(),
                symbol: t.symbol.clone(),
                side: t.side,
                volume: to_f64(t.volume),
                open_price: to_f64(t.open_price),
                close_price: to_f64(t.close_price.unwrap_or(Decimal::ZERO)),
                profit: round_f64(t.profit, 2),
                pips: round_f64(t.pips(), 1),
                open_time: t.open_time.format("%m/%d/%Y").to_string(),
                close_time: t
                    .close_time
                    .map(|dt| dt.format("%m/%d/%Y").to_string())
                    .unwrap_or_default(),
            })
            .collect()
    }

    pub fn advanced_analytics(&self) -> Option<AdvancedAnalytics> {
        if self.trades.is_empty() {
            return None;
        }

        let daily = self.daily_pnl();
        let returns: Vec<Decimal> = daily.iter().map(|(_, pnl)| *pnl).collect();
        let display_from = daily.len().saturating_sub(self.config.daily_display);

        Some(AdvancedAnalytics {
            sharpe_ratio: round_f64(self.sharpe_ratio(&returns), 2),
            max_drawdown: round_f64(self.max_drawdown(), 2),
            avg_duration_hours: round_f64(self.average_duration_hours(), 1),
            var_95: round_f64(self.value_at_risk(&returns), 2),
            daily_returns: daily[display_from..]
                .iter()
                .map(|(date, pnl)| DailyPnl {
                    date: date.format("%Y-%m-%d").to_string(),
                    profit: round_f64(*pnl, 2),
                })
                .collect(),
            monthly_performance: self.monthly_performance(),
            hourly_performance: self.hourly_performance(),
        })
    }

    /// Profit summed per close date, ascending, limited to the last
    /// `daily_window` trading days.
    pub fn daily_pnl(&self) -> Vec<(NaiveDate, Decimal)> {
        let mut by_day: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
        for trade in &self.trades {
            if let Some(closed) = trade.close_time {
                add_to(by_day.entry(closed.date_naive()).or_default(), trade.profit);
            }
        }
        let days: Vec<(NaiveDate, Decimal)> = by_day.into_iter().collect();
        let from = days.len().saturating_sub(self.config.daily_window);
        days[from..].to_vec()
    }

    /// `(mean - daily_risk_free) / stddev` over daily P&L.
    pub fn sharpe_ratio(&self, returns: &[Decimal]) -> Decimal {
        if returns.len() < 2 {
            return Decimal::ZERO;
        }
        let avg = mean(returns);
        let sd = std_dev(returns, avg);
        if sd.is_zero() {
            return Decimal::ZERO;
        }
        let daily_risk_free = ratio(self.config.annual_risk_free_rate, Decimal::from(365));
        ratio(avg.saturating_sub(daily_risk_free), sd)
    }

    /// Largest percentage drop of cumulative profit from its running peak,
    /// walking trades in close order. Break-even trades do not move the curve.
    pub fn max_drawdown(&self) -> Decimal {
        let mut cumulative = Decimal::ZERO;
        let mut peak: Option<Decimal> = None;
        let mut max_drawdown = Decimal::ZERO;

        for trade in self.trades.iter().rev() {
            if trade.profit.is_zero() {
                continue;
            }
            add_to(&mut cumulative, trade.profit);
            let peak = peak.get_or_insert(cumulative);
            if cumulative > *peak {
                *peak = cumulative;
            }
            if *peak > Decimal::ZERO {
                let drawdown = ratio(peak.saturating_sub(cumulative), *peak).saturating_mul(Decimal::ONE_HUNDRED);
                max_drawdown = max_drawdown.max(drawdown);
            }
        }
        max_drawdown
    }

    pub fn average_duration_hours(&self) -> Decimal {
        let now = Utc::now();
        let durations: Vec<Decimal> = self.trades.iter().map(|t| t.duration_hours(now)).collect();
        mean(&durations)
    }

    /// Historical VaR: the daily loss at the `(1 - confidence)` quantile.
    pub fn value_at_risk(&self, returns: &[Decimal]) -> Decimal {
        if returns.is_empty() {
            return Decimal::ZERO;
        }
        let mut sorted = returns.to_vec();
        sorted.sort();
        let index = (Decimal::ONE - self.config.var_confidence)
            .saturating_mul(Decimal::from(sorted.len()))
            .floor()
            .to_usize()
            .unwrap_or(sorted.len());
        sorted.get(index).map(|r| r.abs()).unwrap_or(Decimal::ZERO)
    }

    pub fn monthly_performance(&self) -> Vec<MonthlyPnl> {
        let mut by_month: BTreeMap<String, Decimal> = BTreeMap::new();
        for trade in &self.trades {
            if let Some(closed) = trade.close_time {
                if trade.profit.is_zero() {
                    continue;
                }
                add_to(by_month.entry(closed.format("%Y-%m").to_string()).or_default(), trade.profit);
            }
        }
        by_month
            .into_iter()
            .map(|(month, profit)| MonthlyPnl {
                month,
                profit: round_f64(profit, 2),
            })
            .collect()
    }

    pub fn hourly_performance(&self) -> BTreeMap<u32, f64> {
        let mut by_hour: BTreeMap<u32, Decimal> = (0..24).map(|h| (h, Decimal::ZERO)).collect();
        for trade in &self.trades {
            if let Some(closed) = trade.close_time {
                add_to(by_hour.entry(closed.hour()).or_default(), trade.profit);
            }
        }
        by_hour
            .into_iter()
            .map(|(hour, profit)| (hour, round_f64(profit, 2)))
            .collect()
    }

    pub fn risk_metrics(&self) -> Option<RiskMetrics> {
        if self.trades.is_empty() {
            return None;
        }
        Some(RiskMetrics {
            risk_distribution: self.risk_distribution(),
            position_analysis: self.position_analysis(),
            risk_alerts: self.risk_alerts(),
        })
    }

    /// Trade share by volume band: `<= low_risk_volume`, `<= medium_risk_volume`, above.
    pub fn risk_distribution(&self) -> RiskDistribution {
        let (mut low, mut medium, mut high) = (0, 0, 0);
        for trade in &self.trades {
            if trade.volume <= self.config.low_risk_volume {
                low += 1;
            } else if trade.volume <= self.config.medium_risk_volume {
                medium += 1;
            } else {
                high += 1;
            }
        }
        let total = self.trades.len();
        RiskDistribution {
            low: round_f64(percent(low, total), 1),
            medium: round_f64(percent(medium, total), 1),
            high: round_f64(percent(high, total), 1),
        }
    }

    pub fn position_analysis(&self) -> PositionAnalysis {
        let volumes: Vec<Decimal> = self.trades.iter().map(|t| t.volume).collect();
        PositionAnalysis {
            avg_volume: round_f64(mean(&volumes), 2),
            max_volume: to_f64(volumes.iter().copied().max().unwrap_or(Decimal::ZERO)),
            min_volume: to_f64(volumes.iter().copied().min().unwrap_or(Decimal::ZERO)),
            volume_consistency: round_f64(volume_consistency(&volumes), 2),
        }
    }

    pub fn risk_alerts(&self) -> Vec<RiskAlert> {
        let total = self.trades.len();
        let mut alerts = Vec::new();

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for trade in &self.trades {
            *counts.entry(trade.symbol.as_str()).or_default() += 1;
        }
        let top = counts
            .into_iter()
            .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)));
        if let Some((symbol, count)) = top {
            if Decimal::from(count) > Decimal::from(total) * self.config.concentration_threshold {
                alerts.push(RiskAlert {
                    level: AlertLevel::Warning,
                    message: format!("High concentration in {symbol} ({count} trades)"),
                });
            }
        }

        if total > self.config.min_trades_for_win_rate_alert {
            let win_rate = percent(self.winners().count(), total);
            if win_rate < self.config.low_win_rate {
                alerts.push(RiskAlert {
                    level: AlertLevel::Danger,
                    message: format!("Low win rate: {:.1}% - Review strategy", to_f64(win_rate)),
                });
            } else if win_rate > self.config.high_win_rate {
                alerts.push(RiskAlert {
                    level: AlertLevel::Success,
                    message: format!("Excellent win rate: {:.1}%", to_f64(win_rate)),
                });
            }
        }

        alerts
    }
}

/// `100 - CV * 100`, floored at zero. A single trade is perfectly consistent.
fn volume_consistency(volumes: &[Decimal]) -> Decimal {
    if volumes.len() < 2 {
        return Decimal::ONE_HUNDRED;
    }
    let avg = mean(volumes);
    if avg.is_zero() {
        return Decimal::ZERO;
    }
    let cv = ratio(std_dev(volumes, avg), avg);
    Decimal::ONE_HUNDRED
        .saturating_sub(cv.saturating_mul(Decimal::ONE_HUNDRED))
        .max(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::trade::NewTrade;
    use crate::domain::values::side::Side;
    use chrono::{DateTime, Duration, TimeZone};
    use rust_decimal_macros::dec;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, hour, 0, 0).unwrap()
    }

    fn closed(id: &str, symbol: &str, profit: Decimal, volume: Decimal, close: DateTime<Utc>) -> Trade {
        let mut trade = Trade::new(
            "acct",
            NewTrade {
                trade_id: id.into(),
                symbol: symbol.into(),
                side: Side::Buy,
                volume,
                open_price: dec!(1.1000),
                open_time: close - Duration::hours(2),
            },
        )
        .unwrap()
        .with_close(Some(dec!(1.1010)), Some(close))
        .unwrap();
        trade.profit = profit;
        trade
    }

    /// One trade per day, in order, with the given profits.
    fn series(profits: &[Decimal]) -> Vec<Trade> {
        profits
            .iter()
            .enumerate()
            .map(|(i, p)| closed(&i.to_string(), "EURUSD", *p, dec!(0.1), at(i as u32 + 1, 12)))
            .collect()
    }

    #[test]
    fn test_empty_set_is_zeroed() {
        let analyzer = PortfolioAnalyzer::new(vec![]);
        assert_eq!(analyzer.summary(), PortfolioSummary::default());
        assert!(analyzer.advanced_analytics().is_none());
        assert!(analyzer.risk_metrics().is_none());
    }

    #[test]
    fn test_open_trades_are_ignored() {
        let mut open = closed("open", "EURUSD", dec!(500), dec!(1), at(3, 9));
        open.close_time = None;
        let analyzer = PortfolioAnalyzer::new(vec![open, closed("a", "EURUSD", dec!(10), dec!(1), at(2, 9))]);
        assert_eq!(analyzer.trades().len(), 1);
        assert_eq!(analyzer.summary().total_profit, 10.0);
    }

    #[test]
    fn test_break_even_trades_are_neither_win_nor_loss() {
        let analyzer = PortfolioAnalyzer::new(series(&[dec!(10), dec!(0), dec!(-5)]));
        let s = analyzer.summary();
        assert_eq!(s.total_trades, 3);
        assert_eq!(s.winning_trades, 1);
        assert_eq!(s.losing_trades, 1);
        assert_eq!(s.win_rate, 33.3);
        assert_eq!(s.avg_win, 10.0);
        assert_eq!(s.avg_loss, -5.0);
        assert_eq!(s.profit_factor, 2.0);
    }

    #[test]
    fn test_profit_factor_zero_without_losses() {
        let analyzer = PortfolioAnalyzer::new(series(&[dec!(10), dec!(25)]));
        let s = analyzer.summary();
        assert_eq!(s.profit_factor, 0.0);
        assert_eq!(s.win_rate, 100.0);
    }

    #[test]
    fn test_money_sums_are_exact() {
        let trades: Vec<Trade> = (0..10)
            .map(|i| closed(&i.to_string(), "EURUSD", dec!(0.1), dec!(0.01), at(1, 1)))
            .collect();
        let s = PortfolioAnalyzer::new(trades).summary();
        assert_eq!(s.total_profit, 1.0);
        assert_eq!(s.total_volume, 0.1);
    }

    #[test]
    fn test_net_profit_adds_commission_not_swap() {
        let mut trade = closed("1", "EURUSD", dec!(100), dec!(1), at(1, 1));
        trade.commission = dec!(-7);
        trade.swap = dec!(-3);
        let s = PortfolioAnalyzer::new(vec![trade]).summary();
        assert_eq!(s.total_commission, -7.0);
        assert_eq!(s.total_swap, -3.0);
        assert_eq!(s.net_profit, 93.0);
    }

    #[test]
    fn test_drawdown_from_running_peak() {
        // cumulative 100, 150, 90, 200
        let analyzer = PortfolioAnalyzer::new(series(&[dec!(100), dec!(50), dec!(-60), dec!(110)]));
        assert_eq!(analyzer.max_drawdown(), dec!(40));
    }

    #[test]
    fn test_drawdown_zero_when_strictly_rising() {
        let analyzer = PortfolioAnalyzer::new(series(&[dec!(10), dec!(20), dec!(5)]));
        assert_eq!(analyzer.max_drawdown(), Decimal::ZERO);
    }

    #[test]
    fn test_drawdown_ignores_non_positive_peak() {
        let analyzer = PortfolioAnalyzer::new(series(&[dec!(-10), dec!(-20)]));
        assert_eq!(analyzer.max_drawdown(), Decimal::ZERO);
    }

    #[test]
    fn test_sharpe_guards() {
        let analyzer = PortfolioAnalyzer::new(vec![]);
        assert_eq!(analyzer.sharpe_ratio(&[dec!(5)]), Decimal::ZERO);
        assert_eq!(analyzer.sharpe_ratio(&[dec!(5), dec!(5)]), Decimal::ZERO);

        // mean 10, population stddev 10
        let sharpe = analyzer.sharpe_ratio(&[dec!(0), dec!(20)]);
        assert!(sharpe < Decimal::ONE && sharpe > dec!(0.999));
    }

    #[test]
    fn test_daily_buckets_sum_per_date() {
        let trades = vec![
            closed("a", "EURUSD", dec!(10), dec!(0.1), at(1, 9)),
            closed("b", "EURUSD", dec!(-4), dec!(0.1), at(1, 15)),
            closed("c", "EURUSD", dec!(7), dec!(0.1), at(2, 9)),
        ];
        let daily = PortfolioAnalyzer::new(trades).daily_pnl();
        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0].1, dec!(6));
        assert_eq!(daily[1].1, dec!(7));
    }

    #[test]
    fn test_daily_window_keeps_latest_days() {
        let config = AnalyzerConfig {
            daily_window: 2,
            ..AnalyzerConfig::default()
        };
        let analyzer = PortfolioAnalyzer::with_config(series(&[dec!(1), dec!(2), dec!(3)]), config);
        let days: Vec<Decimal> = analyzer.daily_pnl().into_iter().map(|(_, p)| p).collect();
        assert_eq!(days, vec![dec!(2), dec!(3)]);
    }

    #[test]
    fn test_value_at_risk_index() {
        let analyzer = PortfolioAnalyzer::new(vec![]);
        assert_eq!(analyzer.value_at_risk(&[]), Decimal::ZERO);

        // floor(0.05 * 20) = 1 -> second-worst day
        let mut returns: Vec<Decimal> = (1..=18i64).map(Decimal::from).collect();
        returns.push(dec!(-50));
        returns.push(dec!(-30));
        assert_eq!(analyzer.value_at_risk(&returns), dec!(30));

        // fewer than 20 days -> index 0, worst day
        assert_eq!(analyzer.value_at_risk(&[dec!(4), dec!(-12), dec!(3)]), dec!(12));
    }

    #[test]
    fn test_monthly_and_hourly_buckets() {
        let trades = vec![
            closed("a", "EURUSD", dec!(10), dec!(0.1), at(1, 9)),
            closed("b", "EURUSD", dec!(5), dec!(0.1), at(2, 9)),
            closed("c", "EURUSD", dec!(-3), dec!(0.1), Utc.with_ymd_and_hms(2024, 6, 1, 23, 0, 0).unwrap()),
        ];
        let analyzer = PortfolioAnalyzer::new(trades);

        let monthly = analyzer.monthly_performance();
        assert_eq!(monthly.len(), 2);
        assert_eq!(monthly[0].month, "2024-05");
        assert_eq!(monthly[0].profit, 15.0);
        assert_eq!(monthly[1].profit, -3.0);

        let hourly = analyzer.hourly_performance();
        assert_eq!(hourly.len(), 24);
        assert_eq!(hourly[&9], 15.0);
        assert_eq!(hourly[&23], -3.0);
        assert_eq!(hourly[&0], 0.0);
    }

    #[test]
    fn test_average_duration() {
        let analyzer = PortfolioAnalyzer::new(series(&[dec!(1), dec!(2)]));
        assert_eq!(analyzer.average_duration_hours(), dec!(2));
    }

    #[test]
    fn test_risk_distribution_by_volume_band() {
        let trades = vec![
            closed("a", "EURUSD", dec!(1), dec!(0.05), at(1, 1)),
            closed("b", "EURUSD", dec!(1), dec!(0.3), at(2, 1)),
            closed("c", "EURUSD", dec!(1), dec!(0.05), at(3, 1)),
            closed("d", "EURUSD", dec!(1), dec!(0.9), at(4, 1)),
        ];
        let dist = PortfolioAnalyzer::new(trades).risk_distribution();
        assert_eq!(dist.low, 50.0);
        assert_eq!(dist.medium, 25.0);
        assert_eq!(dist.high, 25.0);
    }

    #[test]
    fn test_volume_consistency() {
        assert_eq!(volume_consistency(&[dec!(0.5)]), Decimal::ONE_HUNDRED);
        assert_eq!(volume_consistency(&[dec!(0.5), dec!(0.5)]), Decimal::ONE_HUNDRED);
        // mean 1, stddev 1 -> CV 1 -> 0
        assert_eq!(volume_consistency(&[dec!(0), dec!(2)]).round_dp(6), Decimal::ZERO);
        // mean 0.2, stddev 0.1 -> CV 0.5 -> 50
        assert_eq!(volume_consistency(&[dec!(0.1), dec!(0.3)]).round_dp(6), dec!(50));
        assert_eq!(volume_consistency(&[dec!(0), dec!(0)]), Decimal::ZERO);
    }

    #[test]
    fn test_concentration_alert() {
        let mut trades: Vec<Trade> = (0..9)
            .map(|i| closed(&format!("g{i}"), "XAUUSD", dec!(1), dec!(0.1), at(i + 1, 1)))
            .collect();
        trades.push(closed("e", "EURUSD", dec!(1), dec!(0.1), at(20, 1)));

        let alerts = PortfolioAnalyzer::new(trades).risk_alerts();
        assert!(alerts.iter().any(|a| a.level == AlertLevel::Warning
            && a.message == "High concentration in XAUUSD (9 trades)"));
    }

    #[test]
    fn test_low_win_rate_alert() {
        let mut profits = vec![dec!(5); 3];
        profits.extend(vec![dec!(-5); 8]);
        let mut trades = series(&profits);
        // spread symbols so concentration does not fire
        for (i, t) in trades.iter_mut().enumerate() {
            t.symbol = format!("SYM{}", i % 4);
        }

        let alerts = PortfolioAnalyzer::new(trades).risk_alerts();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].level, AlertLevel::Danger);
        assert_eq!(alerts[0].message, "Low win rate: 27.3% - Review strategy");
    }

    #[test]
    fn test_excellent_win_rate_alert() {
        let mut profits = vec![dec!(5); 9];
        profits.extend(vec![dec!(-5); 2]);
        let mut trades = series(&profits);
        for (i, t) in trades.iter_mut().enumerate() {
            t.symbol = format!("SYM{}", i % 3);
        }

        let alerts = PortfolioAnalyzer::new(trades).risk_alerts();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].level, AlertLevel::Success);
        assert_eq!(alerts[0].message, "Excellent win rate: 81.8%");
    }

    #[test]
    fn test_no_win_rate_alert_in_normal_band_or_small_sample() {
        let mut trades = series(&[dec!(5), dec!(-5), dec!(5), dec!(-5), dec!(5), dec!(-5), dec!(5), dec!(-5), dec!(5), dec!(-5), dec!(5)]);
        for (i, t) in trades.iter_mut().enumerate() {
            t.symbol = format!("SYM{}", i % 3);
        }
        assert!(PortfolioAnalyzer::new(trades).risk_alerts().is_empty());

        // 10 losing trades is not enough for a win-rate alert
        let mut small = series(&[dec!(-1); 10]);
        for (i, t) in small.iter_mut().enumerate() {
            t.symbol = format!("SYM{}", i % 2);
        }
        assert!(PortfolioAnalyzer::new(small).risk_alerts().is_empty());
    }

    #[test]
    fn test_large_daily_swing_keeps_analytics_finite() {
        let analyzer = PortfolioAnalyzer::new(series(&[dec!(0), dec!(1000000000000000)]));
        let a = analyzer.advanced_analytics().unwrap();
        assert!(a.sharpe_ratio.is_finite());
        assert_eq!(a.var_95, 0.0);
    }

    #[test]
    fn test_sums_saturate_instead_of_overflowing() {
        let huge = dec!(50000000000000000000000000000);
        let analyzer = PortfolioAnalyzer::new(series(&[huge, huge]));

        let s = analyzer.summary();
        assert_eq!(s.total_profit, to_f64(Decimal::MAX));
        assert_eq!(s.winning_trades, 2);
        assert_eq!(s.profit_factor, 0.0);

        let a = analyzer.advanced_analytics().unwrap();
        assert_eq!(a.max_drawdown, 0.0);
        assert_eq!(a.monthly_performance[0].profit, to_f64(Decimal::MAX));
        assert!(analyzer.risk_metrics().is_some());
    }

    #[test]
    fn test_symbol_stats_sorted_by_profit() {
        let trades = vec![
            closed("a", "EURUSD", dec!(10), dec!(0.1), at(1, 1)),
            closed("b", "GBPUSD", dec!(40), dec!(0.1), at(2, 1)),
            closed("c", "EURUSD", dec!(-2), dec!(0.1), at(3, 1)),
        ];
        let stats = PortfolioAnalyzer::new(trades).symbol_stats();
        assert_eq!(stats[0].symbol, "GBPUSD");
        assert_eq!(stats[1].symbol, "EURUSD");
        assert_eq!(stats[1].trades, 2);
        assert_eq!(stats[1].profit, 8.0);
        assert_eq!(stats[1].win_rate, 50.0);
    }

    #[test]
    fn test_recent_trades_display_format() {
        let config = AnalyzerConfig {
            recent_trades_limit: 2,
            ..AnalyzerConfig::default()
        };
        let analyzer = PortfolioAnalyzer::with_config(series(&[dec!(1.005), dec!(2), dec!(3.456)]), config);
        let recent = analyzer.recent_trades();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].id, "2");
        assert_eq!(recent[0].profit, 3.46);
        assert_eq!(recent[0].close_time, "05/03/2024");
        assert_eq!(recent[0].open_time, "05/03/2024");
        assert_eq!(recent[0].pips, 10.0);
    }
}
