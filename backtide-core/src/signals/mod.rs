//! Signal generators.
//!
//! A generator maps a close-price series to one `Signal` per index. The CIR
//! generator is the exception: it simulates its own rate path and is invoked
//! on its own, outside the price pipeline.

pub mod cir;
pub mod rsi_threshold;

pub use cir::{crossing_signals, simulate_cir, CirError, CirParams, CirPath, MAX_CIR_STEPS};
pub use rsi_threshold::{threshold_signals, RsiThreshold};

use crate::domain::Signal;

/// Trait for price-driven signal generators.
///
/// Output must be aligned 1:1 with the input and hold `Signal::Hold` for every
/// index below `warmup()`.
pub trait SignalGenerator: Send + Sync {
    fn name(&self) -> &str;

    /// First index at which the generator may emit a non-hold signal.
    fn warmup(&self) -> usize;

    fn generate(&self, closes: &[f64]) -> Vec<Signal>;

    /// Reason recorded on the buy leg of a trade opened by this generator.
    fn buy_reason(&self) -> &str;

    /// Reason recorded on the sell leg of a trade closed by this generator.
    fn sell_reason(&self) -> &str;
}
