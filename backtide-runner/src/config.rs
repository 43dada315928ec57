//! TOML run configuration.
//!
//! A backtest config has three sections, all optional:
//!
//! ```toml
//! [backtest]
//! initial_capital = 10000.0
//! symbols = ["eurusd", "gbpusd"]
//!
//! [strategy]
//! type = "RSI_THRESHOLD"
//! period = 14
//! oversold = 30.0
//! overbought = 70.0
//!
//! [simulation]
//! shares_per_trade = 10
//! matching = "lifo"
//! position_scope = "pooled"
//! ```
//!
//! A CIR config carries a seed and a `[cir]` table of model parameters.

use std::path::{Path, PathBuf};

use backtide_core::engine::{Matching, PositionScope, SimulationConfig, DEFAULT_SHARES_PER_TRADE};
use backtide_core::signals::{CirError, CirParams, RsiThreshold, SignalGenerator};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Content-addressable identifier for a run (BLAKE3 hex digest).
pub type RunId = String;

pub const DEFAULT_INITIAL_CAPITAL: f64 = 10_000.0;
pub const DEFAULT_CIR_SEED: u64 = 42;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error(transparent)]
    Cir(#[from] CirError),
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ─── Backtest config ────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BacktestConfig {
    #[serde(default)]
    pub backtest: BacktestSection,
    #[serde(default)]
    pub strategy: StrategyConfig,
    #[serde(default)]
    pub simulation: SimulationSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestSection {
    pub initial_capital: f64,
    /// Symbols to keep from the input, in this order. Empty keeps all.
    pub symbols: Vec<String>,
}

impl Default for BacktestSection {
    fn default() -> Self {
        Self {
            initial_capital: DEFAULT_INITIAL_CAPITAL,
            symbols: Vec::new(),
        }
    }
}

/// Signal generator selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrategyConfig {
    /// Buy when RSI drops below `oversold`, sell when it rises above `overbought`.
    RsiThreshold(RsiThreshold),
}

impl Default for StrategyConfig {
    fn default() -> Self {
        StrategyConfig::RsiThreshold(RsiThreshold::default())
    }
}

impl StrategyConfig {
    pub fn generator(&self) -> &dyn SignalGenerator {
        match self {
            StrategyConfig::RsiThreshold(g) => g,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self {
            StrategyConfig::RsiThreshold(g) => {
                if g.period == 0 {
                    return Err(invalid("strategy.period", "must be at least 1"));
                }
                for (field, v) in [("strategy.oversold", g.oversold), ("strategy.overbought", g.overbought)] {
                    if !(0.0..=100.0).contains(&v) {
                        return Err(invalid(field, format!("{v} is outside [0, 100]")));
                    }
                }
                if g.oversold >= g.overbought {
                    return Err(invalid(
                        "strategy.oversold",
                        format!("{} must be below overbought {}", g.oversold, g.overbought),
                    ));
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSection {
    pub shares_per_trade: u32,
    pub matching: Matching,
    pub position_scope: PositionScope,
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            shares_per_trade: DEFAULT_SHARES_PER_TRADE,
            matching: Matching::default(),
            position_scope: PositionScope::default(),
        }
    }
}

impl BacktestConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        Self::from_toml(&read_file(path)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let capital = self.backtest.initial_capital;
        if !capital.is_finite() || capital < 0.0 {
            return Err(invalid(
                "backtest.initial_capital",
                format!("{capital} is not a finite non-negative amount"),
            ));
        }
        if self.simulation.shares_per_trade == 0 {
            return Err(invalid("simulation.shares_per_trade", "must be at least 1"));
        }
        self.strategy.validate()
    }

    /// Engine settings: warm-up comes from the selected generator.
    pub fn simulation_config(&self) -> SimulationConfig {
        SimulationConfig {
            initial_capital: self.backtest.initial_capital,
            shares_per_trade: self.simulation.shares_per_trade,
            warmup: self.strategy.generator().warmup(),
            matching: self.simulation.matching,
            position_scope: self.simulation.position_scope,
        }
    }

    /// Deterministic hash of the configuration. Equal configs share an id.
    pub fn run_id(&self) -> RunId {
        let json = serde_json::to_string(self).expect("BacktestConfig serialization failed");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}

// ─── CIR config ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CirConfig {
    #[serde(default = "default_cir_seed")]
    pub seed: u64,
    #[serde(default)]
    pub cir: CirParams,
}

fn default_cir_seed() -> u64 {
    DEFAULT_CIR_SEED
}

impl Default for CirConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_CIR_SEED,
            cir: CirParams::default(),
        }
    }
}

impl CirConfig {
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        Self::from_toml(&read_file(path)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        Ok(self.cir.validate()?)
    }
}
