//! RSI threshold signal: buy oversold, sell overbought.

use super::SignalGenerator;
use crate::domain::Signal;
use crate::indicators::rsi_of_series;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsiThreshold {
    pub period: usize,
    pub oversold: f64,
    pub overbought: f64,
}

impl RsiThreshold {
    pub fn new(period: usize, oversold: f64, overbought: f64) -> Self {
        Self {
            period,
            oversold,
            overbought,
        }
    }
}

impl Default for RsiThreshold {
    fn default() -> Self {
        Self::new(14, 30.0, 70.0)
    }
}

impl SignalGenerator for RsiThreshold {
    fn name(&self) -> &str {
        "rsi_threshold"
    }

    fn warmup(&self) -> usize {
        self.period
    }

    fn generate(&self, closes: &[f64]) -> Vec<Signal> {
        let rsi = rsi_of_series(closes, self.period);
        threshold_signals(&rsi, self.period, self.oversold, self.overbought)
    }

    fn buy_reason(&self) -> &str {
        "RSI BUY"
    }

    fn sell_reason(&self) -> &str {
        "RSI SELL"
    }
}

/// Classify an RSI series. Strict comparisons: a value sitting exactly on a
/// threshold is a hold.
pub fn threshold_signals(rsi: &[f64], warmup: usize, oversold: f64, overbought: f64) -> Vec<Signal> {
    rsi.iter()
        .enumerate()
        .map(|(i, &v)| {
            if i < warmup {
                Signal::Hold
            } else if v < oversold {
                Signal::Buy
            } else if v > overbought {
                Signal::Sell
            } else {
                Signal::Hold
            }
        })
        .collect()
}
