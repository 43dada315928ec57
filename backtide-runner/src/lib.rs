//! Backtide Runner: backtest orchestration, configuration, metrics, export.
//!
//! This crate builds on `backtide-core` to provide:
//! - TOML run configuration with content-addressed run ids
//! - CSV candle loading
//! - The single-run backtest pipeline and the seeded CIR runner
//! - Performance metrics and daily returns
//! - JSON and CSV artifact export

pub mod config;
pub mod data_loader;
pub mod export;
pub mod metrics;
pub mod runner;

pub use config::{BacktestConfig, CirConfig, ConfigError, RunId, StrategyConfig};
pub use data_loader::{load_candles_csv, read_candles, symbol_order, LoadError};
pub use export::{export_cir_json, export_json, import_json, load_artifacts, save_artifacts};
pub use metrics::{DailyReturn, PerformanceSummary};
pub use runner::{run_backtest, run_backtest_from_frame, run_cir, BacktestResult, CirResult, RunError};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn performance_summary_is_send_sync() {
        assert_send::<PerformanceSummary>();
        assert_sync::<PerformanceSummary>();
    }

    #[test]
    fn results_are_send_sync() {
        assert_send::<BacktestResult>();
        assert_sync::<BacktestResult>();
        assert_send::<CirResult>();
        assert_sync::<CirResult>();
    }

    #[test]
    fn config_types_are_send_sync() {
        assert_send::<BacktestConfig>();
        assert_sync::<BacktestConfig>();
        assert_send::<CirConfig>();
        assert_sync::<CirConfig>();
    }

    #[test]
    fn errors_are_send_sync() {
        assert_send::<RunError>();
        assert_sync::<RunError>();
    }
}
