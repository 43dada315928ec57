//! Domain types for Backtide

pub mod candle;
pub mod equity;
pub mod position;
pub mod signal;
pub mod trade;

pub use candle::{utc_date_of, Candle, SymbolSeries};
pub use equity::EquityPoint;
pub use position::Position;
pub use signal::Signal;
pub use trade::{Trade, TradeSide};

/// Serde adapter: integer timestamps travel as decimal strings.
pub(crate) mod timestamp_string {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(ts)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}
