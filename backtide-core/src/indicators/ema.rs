//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = (close[t] - EMA[t-1]) * k + EMA[t-1], k = 2 / (period + 1)
//! Seed: EMA[0] = close[0]. There is no SMA seed window, so every index
//! carries a value and the lookback is zero.

use super::Indicator;

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    name: String,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            name: format!("ema_{period}"),
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, prices: &[f64]) -> Vec<f64> {
        ema_of_series(prices, self.period)
    }
}

/// Compute EMA values from a price slice.
///
/// An empty series or a zero period yields all zeros.
pub fn ema_of_series(prices: &[f64], period: usize) -> Vec<f64> {
    let mut result = vec![0.0; prices.len()];
    if prices.is_empty() || period == 0 {
        return result;
    }

    let multiplier = 2.0 / (period as f64 + 1.0);
    result[0] = prices[0];
    for i in 1..prices.len() {
        result[i] = (prices[i] - result[i - 1]) * multiplier + result[i - 1];
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn ema_period_1_equals_close() {
        let result = Ema::new(1).compute(&[100.0, 200.0, 300.0]);
        assert_eq!(result, vec![100.0, 200.0, 300.0]);
    }

    #[test]
    fn ema_3_known_values() {
        // k = 2/(3+1) = 0.5
        // EMA[0] = 10
        // EMA[1] = (11 - 10) * 0.5 + 10 = 10.5
        // EMA[2] = (12 - 10.5) * 0.5 + 10.5 = 11.25
        // EMA[3] = (13 - 11.25) * 0.5 + 11.25 = 12.125
        let result = ema_of_series(&[10.0, 11.0, 12.0, 13.0], 3);
        assert_approx(result[0], 10.0, DEFAULT_EPSILON);
        assert_approx(result[1], 10.5, DEFAULT_EPSILON);
        assert_approx(result[2], 11.25, DEFAULT_EPSILON);
        assert_approx(result[3], 12.125, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_constant_series_is_constant() {
        let result = ema_of_series(&[42.0; 30], 12);
        assert!(result.iter().all(|&v| v == 42.0));
    }

    #[test]
    fn ema_empty_and_zero_period() {
        assert!(ema_of_series(&[], 5).is_empty());
        assert_eq!(ema_of_series(&[1.0, 2.0, 3.0], 0), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn ema_name_and_lookback() {
        let ema = Ema::new(20);
        assert_eq!(ema.name(), "ema_20");
        assert_eq!(ema.lookback(), 0);
        assert_eq!(ema.period(), 20);
    }
}
