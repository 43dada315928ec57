//! Result export: JSON and CSV artifacts.
//!
//! Persisted results carry a `schemaVersion` field; newer versions than this
//! build understands are rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use backtide_core::domain::{EquityPoint, Trade, TradeSide};

use crate::metrics::DailyReturn;
use crate::runner::{BacktestResult, CirResult, SCHEMA_VERSION};

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a `BacktestResult` to pretty JSON.
pub fn export_json(result: &BacktestResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("failed to serialize BacktestResult to JSON")
}

/// Deserialize a `BacktestResult` from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<BacktestResult> {
    let result: BacktestResult =
        serde_json::from_str(json).context("failed to deserialize BacktestResult from JSON")?;
    if result.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            result.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(result)
}

pub fn export_cir_json(result: &CirResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("failed to serialize CirResult to JSON")
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Trade log as CSV.
///
/// Columns: date, type, symbol, price, shares, profit, reason
pub fn export_trades_csv(trades: &[Trade]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", "type", "symbol", "price", "shares", "profit", "reason"])?;
    for t in trades {
        wtr.write_record([
            t.date.to_string().as_str(),
            side_label(t),
            t.symbol.as_str(),
            format!("{:.6}", t.price).as_str(),
            t.shares.to_string().as_str(),
            format!("{:.2}", t.profit).as_str(),
            t.reason.as_str(),
        ])?;
    }
    finish(wtr)
}

fn side_label(t: &Trade) -> &'static str {
    match t.side {
        TradeSide::Buy => "buy",
        TradeSide::Sell => "sell",
    }
}

/// Capital snapshots as CSV with date and value columns.
pub fn export_equity_csv(equity: &[EquityPoint]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", "value"])?;
    for p in equity {
        wtr.write_record([&p.date.to_string(), &format!("{:.2}", p.value)])?;
    }
    finish(wtr)
}

/// Day-over-day returns as CSV with date and value (percent) columns.
pub fn export_daily_returns_csv(daily: &[DailyReturn]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", "value"])?;
    for d in daily {
        wtr.write_record([&d.date, &format!("{:.6}", d.value)])?;
    }
    finish(wtr)
}

fn finish(wtr: csv::Writer<Vec<u8>>) -> Result<String> {
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the full artifact set for a backtest run.
///
/// Creates `run_{id prefix}_{timestamp}/` under `output_dir` containing:
/// - `result.json`: the full `BacktestResult`
/// - `trades.csv`: trade log
/// - `equity.csv`: capital after each processed candle
/// - `daily_returns.csv`: day-over-day returns
///
/// Returns the path to the created directory.
pub fn save_artifacts(result: &BacktestResult, output_dir: &Path) -> Result<PathBuf> {
    let prefix = result.run_id.get(..12).unwrap_or(&result.run_id);
    let dirname = format!("run_{}_{}", prefix, chrono::Utc::now().format("%Y%m%d_%H%M%S"));
    let run_dir = output_dir.join(dirname);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    write(&run_dir.join("result.json"), &export_json(result)?)?;
    write(&run_dir.join("trades.csv"), &export_trades_csv(&result.trades)?)?;
    write(&run_dir.join("equity.csv"), &export_equity_csv(&result.equity_curve)?)?;
    write(
        &run_dir.join("daily_returns.csv"),
        &export_daily_returns_csv(&result.daily_returns)?,
    )?;

    Ok(run_dir)
}

/// Load a `BacktestResult` from an artifact directory's result.json.
pub fn load_artifacts(dir: &Path) -> Result<BacktestResult> {
    let path = dir.join("result.json");
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_json(&json)
}

fn write(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::PerformanceSummary;
    use backtide_core::domain::{Position, Signal};

    fn sample_result() -> BacktestResult {
        let trades = vec![
            Trade {
                date: 1_704_154_800_000,
                side: TradeSide::Buy,
                symbol: "eurusd".into(),
                price: 50.0,
                shares: 10,
                profit: 0.0,
                reason: "RSI BUY".into(),
            },
            Trade {
                date: 1_704_155_400_000,
                side: TradeSide::Sell,
                symbol: "eurusd".into(),
                price: 60.0,
                shares: 10,
                profit: 100.0,
                reason: "RSI SELL".into(),
            },
        ];
        let equity = vec![
            EquityPoint::new(1_704_154_800_000, 9_500.0),
            EquityPoint::new(1_704_155_400_000, 10_100.0),
        ];
        BacktestResult {
            schema_version: SCHEMA_VERSION,
            run_id: "ab".repeat(32),
            performance: PerformanceSummary::compute(&equity, &trades, 10_000.0, 10_100.0),
            initial_capital: 10_000.0,
            final_capital: 10_100.0,
            trades,
            equity_curve: equity,
            daily_returns: vec![DailyReturn {
                date: "2024-01-03".into(),
                value: 1.5,
            }],
            open_positions: vec![Position {
                symbol: "btcusd".into(),
                date: 1_704_155_400_000,
                price: 42_000.0,
                shares: 10,
            }],
        }
    }

    #[test]
    fn json_shape() {
        let json = export_json(&sample_result()).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        for key in [
            "schemaVersion",
            "runId",
            "performance",
            "initialCapital",
            "finalCapital",
            "trades",
            "equityCurve",
            "dailyReturns",
            "openPositions",
        ] {
            assert!(v.get(key).is_some(), "missing {key}");
        }
        assert_eq!(v["trades"][0]["date"], "1704154800000");
        assert_eq!(v["trades"][0]["type"], "buy");
        assert_eq!(v["trades"][1]["type"], "sell");
        assert_eq!(v["equityCurve"][1]["date"], "1704155400000");
        assert_eq!(v["performance"]["tradesCount"], 1);
    }

    #[test]
    fn json_import_matches_export() {
        let result = sample_result();
        let back = import_json(&export_json(&result).unwrap()).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn json_rejects_future_schema() {
        let mut result = sample_result();
        result.schema_version = SCHEMA_VERSION + 1;
        let json = serde_json::to_string(&result).unwrap();
        let err = import_json(&json).unwrap_err();
        assert!(err.to_string().contains("unsupported schema version"));
    }

    #[test]
    fn json_without_schema_defaults() {
        let mut v = serde_json::to_value(sample_result()).unwrap();
        v.as_object_mut().unwrap().remove("schemaVersion");
        let back = import_json(&v.to_string()).unwrap();
        assert_eq!(back.schema_version, SCHEMA_VERSION);
    }

    #[test]
    fn trades_csv_layout() {
        let csv = export_trades_csv(&sample_result().trades).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "date,type,symbol,price,shares,profit,reason");
        assert_eq!(lines[1], "1704154800000,buy,eurusd,50.000000,10,0.00,RSI BUY");
        assert_eq!(lines[2], "1704155400000,sell,eurusd,60.000000,10,100.00,RSI SELL");
    }

    #[test]
    fn equity_csv_layout() {
        let csv = export_equity_csv(&sample_result().equity_curve).unwrap();
        assert_eq!(csv, "date,value\n1704154800000,9500.00\n1704155400000,10100.00\n");
    }

    #[test]
    fn cir_json_shape() {
        let json = export_cir_json(&CirResult {
            rates: vec![0.01, 0.035],
            signals: vec![Signal::Hold, Signal::Buy],
        })
        .unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["signals"][1], "BUY");
        assert_eq!(v["rates"][0], 0.01);
    }
}
