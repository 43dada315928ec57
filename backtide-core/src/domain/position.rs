use serde::{Deserialize, Serialize};

/// An opened, not yet matched long position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,
    /// Timestamp of the candle the position was opened on.
    pub date: i64,
    pub price: f64,
    pub shares: u32,
}

impl Position {
    /// Cash spent to open the position.
    pub fn cost(&self) -> f64 {
        self.price * self.shares as f64
    }

    /// Profit from closing the position at `exit_price`.
    pub fn profit_at(&self, exit_price: f64) -> f64 {
        (exit_price - self.price) * self.shares as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_and_profit() {
        let pos = Position {
            symbol: "btcusd".into(),
            date: 0,
            price: 50.0,
            shares: 10,
        };
        assert_eq!(pos.cost(), 500.0);
        assert_eq!(pos.profit_at(60.0), 100.0);
        assert_eq!(pos.profit_at(45.0), -50.0);
    }
}
