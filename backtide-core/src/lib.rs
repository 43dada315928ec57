//! Backtide Core: domain types, indicators, signal generators, trade simulation.
//!
//! This crate contains the algorithmic heart of the backtester:
//! - Domain types (candles, signals, positions, trades, equity points)
//! - Flat candle frame decoding with up-front validation
//! - EMA and RSI indicators
//! - RSI threshold signals and the standalone CIR rate-path generator
//! - The shared-capital trade simulation fold
//! - Deterministic, seedable RNG streams

pub mod data;
pub mod domain;
pub mod engine;
pub mod indicators;
pub mod rng;
pub mod signals;
