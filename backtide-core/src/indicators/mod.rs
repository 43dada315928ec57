//! Indicator engine.
//!
//! Indicators are pure functions: price series in, series of the same length
//! out. They hold no state between calls, so running one twice on the same
//! input yields bit-identical output.

pub mod ema;
pub mod rsi;

pub use ema::{ema_of_series, Ema};
pub use rsi::{rsi_of_series, Rsi, RSI_PLACEHOLDER};

/// Trait for indicators computed over a close-price series.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "ema_20", "rsi_14").
    fn name(&self) -> &str;

    /// Number of leading values that are warm-up filler rather than real output.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire series.
    ///
    /// Returns a `Vec<f64>` of the same length as `prices`.
    fn compute(&self, prices: &[f64]) -> Vec<f64>;
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
