//! Candle: the fundamental market data unit.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One OHLCV candle.
///
/// `timestamp` is epoch milliseconds as delivered by the candle feed. Only
/// `timestamp` and `close` drive the current strategies; the rest of the
/// record is carried so new strategies can use it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// Number of numeric fields per candle in the flat wire layout.
    pub const FIELDS: usize = 6;
}

/// Map an epoch-millisecond timestamp to its UTC calendar date.
pub fn utc_date_of(timestamp_ms: i64) -> Option<NaiveDate> {
    DateTime::<Utc>::from_timestamp_millis(timestamp_ms).map(|dt| dt.date_naive())
}

/// Ordered candles for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolSeries {
    pub symbol: String,
    pub candles: Vec<Candle>,
}

impl SymbolSeries {
    pub fn new(symbol: impl Into<String>, candles: Vec<Candle>) -> Self {
        Self {
            symbol: symbol.into(),
            candles,
        }
    }

    /// Build a series from close prices alone, stamping one candle per minute
    /// starting at `start_ts`. Open/high/low mirror the close; volume is zero.
    pub fn from_closes(symbol: impl Into<String>, start_ts: i64, closes: &[f64]) -> Self {
        let candles = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Candle {
                timestamp: start_ts + i as i64 * 60_000,
                open: close,
                high: close,
                low: close,
                close,
                volume: 0.0,
            })
            .collect();
        Self::new(symbol, candles)
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Close-price series, aligned 1:1 with the candles.
    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }
}
