//! Simulation configuration and the run-scoped mutable state.

use crate::domain::{EquityPoint, Position, Trade};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default fixed position size, in shares.
pub const DEFAULT_SHARES_PER_TRADE: u32 = 10;

/// Which open position a sell closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Matching {
    /// Most recently opened first.
    #[default]
    Lifo,
    /// Oldest first.
    Fifo,
}

/// Which open positions a sell on a given symbol may close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionScope {
    /// One book across all symbols: a sell on any symbol may close a position
    /// opened on any other.
    #[default]
    Pooled,
    /// A sell only closes positions opened on the same symbol.
    PerSymbol,
}

/// Configuration for a single simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub initial_capital: f64,
    pub shares_per_trade: u32,
    /// First candle index (per symbol) the fold looks at.
    pub warmup: usize,
    pub matching: Matching,
    pub position_scope: PositionScope,
}

impl SimulationConfig {
    pub fn new(initial_capital: f64, warmup: usize) -> Self {
        Self {
            initial_capital,
            shares_per_trade: DEFAULT_SHARES_PER_TRADE,
            warmup,
            matching: Matching::default(),
            position_scope: PositionScope::default(),
        }
    }
}

/// Open positions not yet matched by a sell.
#[derive(Debug, Clone, Default)]
pub struct PositionBook {
    positions: VecDeque<Position>,
}

impl PositionBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, position: Position) {
        self.positions.push_back(position);
    }

    /// Remove and return the position a sell on `symbol` should close, if any.
    pub fn take(&mut self, symbol: &str, matching: Matching, scope: PositionScope) -> Option<Position> {
        let index = match (scope, matching) {
            (PositionScope::Pooled, Matching::Lifo) => self.positions.len().checked_sub(1),
            (PositionScope::Pooled, Matching::Fifo) => (!self.positions.is_empty()).then_some(0),
            (PositionScope::PerSymbol, Matching::Lifo) => {
                self.positions.iter().rposition(|p| p.symbol == symbol)
            }
            (PositionScope::PerSymbol, Matching::Fifo) => {
                self.positions.iter().position(|p| p.symbol == symbol)
            }
        }?;
        self.positions.remove(index)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn into_vec(self) -> Vec<Position> {
        self.positions.into()
    }
}

/// Mutable state threaded through the simulation fold.
///
/// `capital` is only ever changed by opening or closing a position; it is never
/// revalued or corrected after the fact.
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub capital: f64,
    pub book: PositionBook,
    pub trades: Vec<Trade>,
    pub equity: Vec<EquityPoint>,
}

impl SimulationState {
    pub fn new(initial_capital: f64) -> Self {
        Self {
            capital: initial_capital,
            book: PositionBook::new(),
            trades: Vec::new(),
            equity: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(symbol: &str, date: i64) -> Position {
        Position {
            symbol: symbol.into(),
            date,
            price: 10.0,
            shares: 10,
        }
    }

    fn book() -> PositionBook {
        let mut book = PositionBook::new();
        book.open(pos("a", 1));
        book.open(pos("b", 2));
        book.open(pos("a", 3));
        book.open(pos("b", 4));
        book
    }

    #[test]
    fn config_defaults() {
        let config = SimulationConfig::new(10_000.0, 14);
        assert_eq!(config.shares_per_trade, 10);
        assert_eq!(config.matching, Matching::Lifo);
        assert_eq!(config.position_scope, PositionScope::Pooled);
    }

    #[test]
    fn pooled_lifo_takes_most_recent() {
        let mut b = book();
        assert_eq!(b.take("a", Matching::Lifo, PositionScope::Pooled).unwrap().date, 4);
        assert_eq!(b.take("a", Matching::Lifo, PositionScope::Pooled).unwrap().date, 3);
        assert_eq!(b.len(), 2);
    }

    #[test]
    fn pooled_fifo_takes_oldest() {
        let mut b = book();
        assert_eq!(b.take("b", Matching::Fifo, PositionScope::Pooled).unwrap().date, 1);
    }

    #[test]
    fn per_symbol_respects_symbol() {
        let mut b = book();
        assert_eq!(b.take("a", Matching::Lifo, PositionScope::PerSymbol).unwrap().date, 3);
        assert_eq!(b.take("a", Matching::Fifo, PositionScope::PerSymbol).unwrap().date, 1);
        assert!(b.take("a", Matching::Lifo, PositionScope::PerSymbol).is_none());
        assert!(b.take("c", Matching::Fifo, PositionScope::PerSymbol).is_none());
        assert_eq!(b.len(), 2);
    }

    #[test]
    fn empty_book_yields_nothing() {
        let mut b = PositionBook::new();
        assert!(b.take("a", Matching::Lifo, PositionScope::Pooled).is_none());
        assert!(b.take("a", Matching::Fifo, PositionScope::Pooled).is_none());
        assert!(b.is_empty());
    }

    #[test]
    fn state_starts_at_initial_capital() {
        let state = SimulationState::new(5_000.0);
        assert_eq!(state.capital, 5_000.0);
        assert!(state.book.is_empty());
        assert!(state.trades.is_empty());
        assert!(state.equity.is_empty());
    }
}
