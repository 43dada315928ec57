//! Performance metrics: pure functions over the equity curve and trade log.
//!
//! Percentages are expressed as percent (`12.5` means 12.5%), not fractions.

use std::collections::BTreeMap;

use backtide_core::domain::{utc_date_of, EquityPoint, Trade, TradeSide};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Trading periods per year used to annualise the Sharpe ratio.
pub const PERIODS_PER_YEAR: f64 = 252.0;

/// Standard deviations of step returns below this are treated as zero, so a
/// flat curve with rounding noise reports a Sharpe of 0 instead of a huge one.
pub const MIN_RETURN_STD_DEV: f64 = 1e-15;

/// Aggregate performance for a single backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSummary {
    pub total_return: f64,
    pub win_rate: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub trades_count: usize,
}

impl PerformanceSummary {
    pub fn compute(
        equity: &[EquityPoint],
        trades: &[Trade],
        initial_capital: f64,
        final_capital: f64,
    ) -> Self {
        let values: Vec<f64> = equity.iter().map(|p| p.value).collect();
        Self {
            total_return: total_return(initial_capital, final_capital),
            win_rate: win_rate(trades),
            sharpe_ratio: sharpe_ratio(&values),
            max_drawdown: max_drawdown(&values, initial_capital),
            trades_count: trades_count(trades),
        }
    }
}

/// Day-over-day change in closing equity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyReturn {
    /// UTC calendar day, `YYYY-MM-DD`.
    pub date: String,
    /// Percent change from the previous day's close.
    pub value: f64,
}

// ─── Individual metric functions ────────────────────────────────────

/// Total return in percent. Zero when there was no starting capital.
pub fn total_return(initial_capital: f64, final_capital: f64) -> f64 {
    if initial_capital == 0.0 {
        return 0.0;
    }
    (final_capital - initial_capital) / initial_capital * 100.0
}

/// Share of round trips that closed at a profit, in percent.
pub fn win_rate(trades: &[Trade]) -> f64 {
    let round_trips = trades_count(trades);
    if round_trips == 0 {
        return 0.0;
    }
    let wins = trades.iter().filter(|t| t.is_winning_sell()).count();
    wins as f64 / round_trips as f64 * 100.0
}

/// Annualised Sharpe ratio of per-step equity returns.
///
/// Uses the population standard deviation and no risk-free rate. Zero with
/// fewer than two points or a deviation under `MIN_RETURN_STD_DEV`.
pub fn sharpe_ratio(values: &[f64]) -> f64 {
    let returns = step_returns(values);
    if returns.is_empty() {
        return 0.0;
    }
    let mean = mean_f64(&returns);
    let std = population_std_dev(&returns);
    if std < MIN_RETURN_STD_DEV {
        return 0.0;
    }
    mean / std * PERIODS_PER_YEAR.sqrt()
}

/// Largest peak-to-trough fall, in percent, with the running peak seeded at
/// the initial capital. Never negative.
pub fn max_drawdown(values: &[f64], initial_capital: f64) -> f64 {
    let mut peak = initial_capital;
    let mut max_dd = 0.0_f64;
    for &v in values {
        peak = peak.max(v);
        if peak > 0.0 {
            max_dd = max_dd.max((peak - v) / peak * 100.0);
        }
    }
    max_dd
}

/// Completed round trips.
pub fn trades_count(trades: &[Trade]) -> usize {
    trades.iter().filter(|t| t.side == TradeSide::Sell).count()
}

/// Bucket the equity curve by UTC day (last point of each day wins, in curve
/// order) and return the percent change between consecutive days.
///
/// Points whose timestamp maps to no calendar date are skipped. A zero
/// previous close yields a zero return.
pub fn daily_returns(equity: &[EquityPoint]) -> Vec<DailyReturn> {
    let mut closes: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for point in equity {
        if let Some(day) = utc_date_of(point.date) {
            closes.insert(day, point.value);
        }
    }
    let days: Vec<(NaiveDate, f64)> = closes.into_iter().collect();
    days.windows(2)
        .map(|w| {
            let (_, prev) = w[0];
            let (day, curr) = w[1];
            let value = if prev != 0.0 { (curr - prev) / prev * 100.0 } else { 0.0 };
            DailyReturn {
                date: day.format("%Y-%m-%d").to_string(),
                value,
            }
        })
        .collect()
}

// ─── Helpers ────────────────────────────────────────────────────────

/// Simple returns between consecutive values. A zero base yields zero.
pub fn step_returns(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .map(|w| if w[0] != 0.0 { (w[1] - w[0]) / w[0] } else { 0.0 })
        .collect()
}

pub(crate) fn mean_f64(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub(crate) fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = mean_f64(values);
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
