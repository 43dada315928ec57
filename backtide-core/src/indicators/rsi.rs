//! Relative Strength Index (RSI).
//!
//! Wilder smoothing of average gains and average losses.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Lookback: period. Indices before `period` hold the `RSI_PLACEHOLDER`
//! value (50.0), which is a neutral filler and not a computed RSI.
//! Edge cases: avg_loss == 0 → RSI = 100, including a flat series.

use super::Indicator;

/// Value reported for every index that has no RSI yet.
pub const RSI_PLACEHOLDER: f64 = 50.0;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, prices: &[f64]) -> Vec<f64> {
        rsi_of_series(prices, self.period)
    }
}

/// Compute RSI values from a price slice.
///
/// Series shorter than `period + 1` (and a zero period) come back as all
/// placeholders.
pub fn rsi_of_series(prices: &[f64], period: usize) -> Vec<f64> {
    let n = prices.len();
    let mut result = vec![RSI_PLACEHOLDER; n];
    if period == 0 || n < period + 1 {
        return result;
    }

    // Seed: a zero change counts as a gain of zero.
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for i in 1..=period {
        let change = prices[i] - prices[i - 1];
        if change >= 0.0 {
            avg_gain += change;
        } else {
            avg_loss -= change;
        }
    }
    let p = period as f64;
    avg_gain /= p;
    avg_loss /= p;
    result[period] = compute_rsi(avg_gain, avg_loss);

    for i in (period + 1)..n {
        let change = prices[i] - prices[i - 1];
        let (gain, loss) = if change >= 0.0 {
            (change, 0.0)
        } else {
            (0.0, -change)
        };
        avg_gain = (avg_gain * (p - 1.0) + gain) / p;
        avg_loss = (avg_loss * (p - 1.0) + loss) / p;
        result[i] = compute_rsi(avg_gain, avg_loss);
    }

    result
}

fn compute_rsi(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}
