//! Trade simulation fold.
//!
//! Symbols are folded strictly in input order through one `SimulationState`.
//! Per candle from the warm-up index onward:
//! 1. Buy: open a fixed-size position if capital covers it, else drop the signal
//! 2. Sell: close one open position if the book has a match, else drop the signal
//! 3. Record a capital snapshot, whatever happened

use crate::domain::{Candle, EquityPoint, Position, Signal, SymbolSeries, Trade};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

use super::state::{SimulationConfig, SimulationState};

#[derive(Debug, Error, PartialEq)]
pub enum SimulationError {
    #[error("'{symbol}' has {candles} candles but {signals} signals")]
    SignalLengthMismatch {
        symbol: String,
        candles: usize,
        signals: usize,
    },
    #[error("{series} symbol series but {signals} signal series")]
    SeriesCountMismatch { series: usize, signals: usize },
}

/// Per-symbol activity counters, returned after each `process_symbol` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolActivity {
    pub symbol: String,
    pub candles: usize,
    pub opened: usize,
    pub closed: usize,
    pub dropped_buys: usize,
    pub dropped_sells: usize,
}

/// Everything the fold produced.
#[derive(Debug, Clone)]
pub struct SimulationOutcome {
    pub initial_capital: f64,
    pub final_capital: f64,
    pub trades: Vec<Trade>,
    pub equity: Vec<EquityPoint>,
    /// Positions still open when the run ended, oldest first.
    pub open_positions: Vec<Position>,
}

/// Incremental simulator: feed symbols one at a time, then `finish`.
#[derive(Debug, Clone)]
pub struct Simulator {
    config: SimulationConfig,
    state: SimulationState,
    buy_reason: String,
    sell_reason: String,
}

impl Simulator {
    pub fn new(config: SimulationConfig) -> Self {
        let state = SimulationState::new(config.initial_capital);
        Self {
            config,
            state,
            buy_reason: "RSI BUY".to_string(),
            sell_reason: "RSI SELL".to_string(),
        }
    }

    /// Override the reasons recorded on buy and sell legs.
    pub fn with_reasons(mut self, buy: impl Into<String>, sell: impl Into<String>) -> Self {
        self.buy_reason = buy.into();
        self.sell_reason = sell.into();
        self
    }

    /// Fold one symbol's candles and aligned signals into the shared state.
    pub fn process_symbol(
        &mut self,
        series: &SymbolSeries,
        signals: &[Signal],
    ) -> Result<SymbolActivity, SimulationError> {
        if series.len() != signals.len() {
            return Err(SimulationError::SignalLengthMismatch {
                symbol: series.symbol.clone(),
                candles: series.len(),
                signals: signals.len(),
            });
        }

        let mut activity = SymbolActivity {
            symbol: series.symbol.clone(),
            ..SymbolActivity::default()
        };
        let start = self.config.warmup.min(series.len());
        for (candle, &signal) in series.candles[start..].iter().zip(&signals[start..]) {
            self.step(&series.symbol, candle, signal, &mut activity);
        }

        debug!(
            symbol = %activity.symbol,
            candles = activity.candles,
            opened = activity.opened,
            closed = activity.closed,
            dropped_buys = activity.dropped_buys,
            dropped_sells = activity.dropped_sells,
            capital = self.state.capital,
            "symbol folded"
        );
        Ok(activity)
    }

    fn step(&mut self, symbol: &str, candle: &Candle, signal: Signal, activity: &mut SymbolActivity) {
        let price = candle.close;
        let shares = self.config.shares_per_trade;

        match signal {
            Signal::Buy => {
                let cost = price * shares as f64;
                if self.state.capital >= cost {
                    self.state.book.open(Position {
                        symbol: symbol.to_string(),
                        date: candle.timestamp,
                        price,
                        shares,
                    });
                    self.state.capital -= cost;
                    activity.opened += 1;
                } else {
                    trace!(symbol, ts = candle.timestamp, price, capital = self.state.capital, "buy dropped: insufficient capital");
                    activity.dropped_buys += 1;
                }
            }
            Signal::Sell => {
                let matched = self.state.book.take(
                    symbol,
                    self.config.matching,
                    self.config.position_scope,
                );
                match matched {
                    Some(position) => {
                        let (buy, sell) = Trade::round_trip(
                            position,
                            candle.timestamp,
                            symbol,
                            price,
                            &self.buy_reason,
                            &self.sell_reason,
                        );
                        self.state.capital += sell.price * sell.shares as f64;
                        self.state.trades.push(buy);
                        self.state.trades.push(sell);
                        activity.closed += 1;
                    }
                    None => {
                        trace!(symbol, ts = candle.timestamp, "sell dropped: no open position");
                        activity.dropped_sells += 1;
                    }
                }
            }
            Signal::Hold => {}
        }

        self.state
            .equity
            .push(EquityPoint::new(candle.timestamp, self.state.capital));
        activity.candles += 1;
    }

    pub fn finish(self) -> SimulationOutcome {
        SimulationOutcome {
            initial_capital: self.config.initial_capital,
            final_capital: self.state.capital,
            trades: self.state.trades,
            equity: self.state.equity,
            open_positions: self.state.book.into_vec(),
        }
    }
}

/// One-shot fold over every symbol, in order.
pub fn run_simulation(
    config: &SimulationConfig,
    series: &[SymbolSeries],
    signals: &[Vec<Signal>],
) -> Result<SimulationOutcome, SimulationError> {
    if series.len() != signals.len() {
        return Err(SimulationError::SeriesCountMismatch {
            series: series.len(),
            signals: signals.len(),
        });
    }
    let mut sim = Simulator::new(config.clone());
    for (s, sig) in series.iter().zip(signals) {
        sim.process_symbol(s, sig)?;
    }
    Ok(sim.finish())
}
