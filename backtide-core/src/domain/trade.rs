//! Trade: one leg of a completed round trip.

use super::position::Position;
use serde::{Deserialize, Serialize};

/// Which side of the round trip a trade record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

/// A trade log record.
///
/// Records are only ever emitted in (buy, sell) pairs, at the moment the sell
/// closes a position. The buy leg keeps the date, symbol and price of the
/// position it came from; its `profit` is always zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    #[serde(with = "super::timestamp_string")]
    pub date: i64,
    #[serde(rename = "type")]
    pub side: TradeSide,
    pub symbol: String,
    pub price: f64,
    pub shares: u32,
    pub profit: f64,
    pub reason: String,
}

impl Trade {
    /// Build the (buy, sell) pair that closes `position` at `exit_price`.
    pub fn round_trip(
        position: Position,
        exit_date: i64,
        exit_symbol: &str,
        exit_price: f64,
        buy_reason: &str,
        sell_reason: &str,
    ) -> (Trade, Trade) {
        let profit = position.profit_at(exit_price);
        let shares = position.shares;
        let sell = Trade {
            date: exit_date,
            side: TradeSide::Sell,
            symbol: exit_symbol.to_string(),
            price: exit_price,
            shares,
            profit,
            reason: sell_reason.to_string(),
        };
        let buy = Trade {
            date: position.date,
            side: TradeSide::Buy,
            symbol: position.symbol,
            price: position.price,
            shares,
            profit: 0.0,
            reason: buy_reason.to_string(),
        };
        (buy, sell)
    }

    pub fn is_winning_sell(&self) -> bool {
        self.side == TradeSide::Sell && self.profit > 0.0
    }
}
