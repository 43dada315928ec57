//! Signal precomputation.
//!
//! Indicators and signals are pure per-symbol computations, so they run in
//! parallel across symbols before the sequential fold. Results come back in
//! input order.

use crate::domain::{Signal, SymbolSeries};
use crate::indicators::Indicator;
use crate::signals::SignalGenerator;
use rayon::prelude::*;

/// Compute signals for every symbol.
pub fn precompute_signals(series: &[SymbolSeries], generator: &dyn SignalGenerator) -> Vec<Vec<Signal>> {
    series
        .par_iter()
        .map(|s| {
            let signals = generator.generate(&s.closes());
            debug_assert_eq!(
                signals.len(),
                s.len(),
                "generator '{}' produced {} signals for {} candles (symbol={})",
                generator.name(),
                signals.len(),
                s.len(),
                s.symbol
            );
            signals
        })
        .collect()
}

/// Compute one indicator series per symbol.
pub fn precompute_indicator(series: &[SymbolSeries], indicator: &dyn Indicator) -> Vec<Vec<f64>> {
    series
        .par_iter()
        .map(|s| indicator.compute(&s.closes()))
        .collect()
}
