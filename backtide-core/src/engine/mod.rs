//! Backtesting engine: signal precompute and the trade simulation fold.
//!
//! The engine takes validated per-symbol candle series, computes signals for
//! each symbol independently, then folds every symbol in input order through a
//! single capital pool and position book.

pub mod precompute;
pub mod simulator;
pub mod state;

pub use precompute::{precompute_indicator, precompute_signals};
pub use simulator::{run_simulation, SimulationError, SimulationOutcome, Simulator, SymbolActivity};
pub use state::{
    Matching, PositionBook, PositionScope, SimulationConfig, SimulationState,
    DEFAULT_SHARES_PER_TRADE,
};
