//! Backtest runner: wires together signals, the simulation fold, and metrics.
//!
//! Entry points:
//! - `run_backtest()`: validated config + already-typed series. Used by the CLI.
//! - `run_backtest_from_frame()`: decodes a flat candle frame first.
//! - `run_cir()`: the standalone CIR rate path, seeded.

use backtide_core::data::{decode_frame, FrameError};
use backtide_core::domain::{EquityPoint, Position, Signal, SymbolSeries, Trade};
use backtide_core::engine::{precompute_signals, SimulationError, Simulator};
use backtide_core::rng::RngHierarchy;
use backtide_core::signals::{simulate_cir, CirError, CirParams};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, info_span};

use crate::config::{BacktestConfig, ConfigError, RunId};
use crate::data_loader::{symbol_order, LoadError};
use crate::metrics::{daily_returns, DailyReturn, PerformanceSummary};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Data(#[from] LoadError),
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),
    #[error("simulation error: {0}")]
    Simulation(#[from] SimulationError),
    #[error("CIR error: {0}")]
    Cir(#[from] CirError),
}

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// RNG stream label for CIR paths.
pub const CIR_STREAM: &str = "cir";

/// Complete result of a backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestResult {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub run_id: RunId,
    pub performance: PerformanceSummary,
    pub initial_capital: f64,
    pub final_capital: f64,
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<EquityPoint>,
    pub daily_returns: Vec<DailyReturn>,
    /// Positions never matched by a sell, oldest first.
    pub open_positions: Vec<Position>,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// A simulated CIR rate path with its crossing signals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CirResult {
    pub rates: Vec<f64>,
    pub signals: Vec<Signal>,
}

/// Run a backtest over typed series.
///
/// When `config.backtest.symbols` is non-empty, only those symbols are folded,
/// in that order; otherwise every series is folded in the given order.
pub fn run_backtest(config: &BacktestConfig, series: &[SymbolSeries]) -> Result<BacktestResult, RunError> {
    config.validate()?;
    let selected: Vec<SymbolSeries>;
    let series = if config.backtest.symbols.is_empty() {
        series
    } else {
        selected = symbol_order(series, &config.backtest.symbols)?
            .into_iter()
            .map(|i| series[i].clone())
            .collect();
        &selected[..]
    };
    let run_id = config.run_id();
    let _span = info_span!("run_backtest", run_id = %&run_id[..12], symbols = series.len()).entered();

    let generator = config.strategy.generator();
    let signals = precompute_signals(series, generator);
    debug!(generator = generator.name(), "signals precomputed");

    let mut sim = Simulator::new(config.simulation_config())
        .with_reasons(generator.buy_reason(), generator.sell_reason());
    for (s, sig) in series.iter().zip(&signals) {
        sim.process_symbol(s, sig)?;
    }
    let outcome = sim.finish();

    let performance = PerformanceSummary::compute(
        &outcome.equity,
        &outcome.trades,
        outcome.initial_capital,
        outcome.final_capital,
    );
    let daily = daily_returns(&outcome.equity);

    info!(
        trades = performance.trades_count,
        open = outcome.open_positions.len(),
        final_capital = outcome.final_capital,
        total_return = performance.total_return,
        "backtest complete"
    );

    Ok(BacktestResult {
        schema_version: SCHEMA_VERSION,
        run_id,
        performance,
        initial_capital: outcome.initial_capital,
        final_capital: outcome.final_capital,
        trades: outcome.trades,
        equity_curve: outcome.equity,
        daily_returns: daily,
        open_positions: outcome.open_positions,
    })
}

/// Decode a flat candle frame (six fields per candle) and run a backtest.
pub fn run_backtest_from_frame(
    config: &BacktestConfig,
    buffer: &[f64],
    symbols: &[String],
    counts: &[usize],
) -> Result<BacktestResult, RunError> {
    let series = decode_frame(buffer, symbols, counts)?;
    run_backtest(config, &series)
}

/// Simulate one CIR path from a master seed.
pub fn run_cir(params: &CirParams, seed: u64) -> Result<CirResult, RunError> {
    let _span = info_span!("run_cir", seed).entered();
    let mut rng = RngHierarchy::new(seed).rng_for(CIR_STREAM, 0);
    let path = simulate_cir(params, &mut rng)?;
    info!(points = path.rates.len(), "CIR path simulated");
    Ok(CirResult {
        rates: path.rates,
        signals: path.signals,
    })
}
