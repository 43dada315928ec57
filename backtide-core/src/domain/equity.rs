use serde::{Deserialize, Serialize};

/// Capital snapshot taken after a candle has been processed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    #[serde(with = "super::timestamp_string")]
    pub date: i64,
    pub value: f64,
}

impl EquityPoint {
    pub fn new(date: i64, value: f64) -> Self {
        Self { date, value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equity_point_json_shape() {
        let point = EquityPoint::new(1_704_153_600_000, 10_000.0);
        let json = serde_json::to_string(&point).unwrap();
        assert_eq!(json, r#"{"date":"1704153600000","value":10000.0}"#);
    }
}
