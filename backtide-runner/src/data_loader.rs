//! Candle loading from CSV.
//!
//! Expected header: `symbol,timestamp,open,high,low,close,volume`, with
//! `timestamp` in epoch milliseconds. Rows are grouped by symbol in order of
//! first appearance; within a symbol, file order is kept.

use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::{Path, PathBuf};

use backtide_core::domain::{Candle, SymbolSeries};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("bad CSV record {record}: {source}")]
    Csv {
        record: usize,
        #[source]
        source: csv::Error,
    },

    #[error("input contains no candles")]
    Empty,

    #[error("symbol '{0}' not found in input")]
    SymbolNotFound(String),
}

#[derive(Debug, Deserialize)]
struct CandleRow {
    symbol: String,
    timestamp: i64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

impl From<CandleRow> for Candle {
    fn from(row: CandleRow) -> Self {
        Candle {
            timestamp: row.timestamp,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
        }
    }
}

/// Load candles from a CSV file. `symbols`, when non-empty, selects and
/// orders the returned series.
pub fn load_candles_csv(path: &Path, symbols: &[String]) -> Result<Vec<SymbolSeries>, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let series = read_candles(file, symbols)?;
    info!(
        path = %path.display(),
        symbols = series.len(),
        candles = series.iter().map(SymbolSeries::len).sum::<usize>(),
        "loaded candles"
    );
    Ok(series)
}

/// Read candles from any CSV source.
pub fn read_candles<R: Read>(reader: R, symbols: &[String]) -> Result<Vec<SymbolSeries>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut series: Vec<SymbolSeries> = Vec::new();
    for (i, row) in rdr.deserialize::<CandleRow>().enumerate() {
        let row = row.map_err(|source| LoadError::Csv { record: i + 1, source })?;
        let slot = match index.get(&row.symbol) {
            Some(&slot) => slot,
            None => {
                index.insert(row.symbol.clone(), series.len());
                series.push(SymbolSeries::new(row.symbol.clone(), Vec::new()));
                series.len() - 1
            }
        };
        series[slot].candles.push(row.into());
    }

    if series.is_empty() {
        return Err(LoadError::Empty);
    }
    if symbols.is_empty() {
        return Ok(series);
    }
    let order = symbol_order(&series, symbols)?;
    let mut slots: Vec<Option<SymbolSeries>> = series.into_iter().map(Some).collect();
    Ok(order.into_iter().filter_map(|i| slots[i].take()).collect())
}

/// Indices into `available` of the named symbols, in the order named.
///
/// A name given twice is kept once. A name with no series is
/// `LoadError::SymbolNotFound`. When `available` repeats a symbol, the first
/// series wins.
pub fn symbol_order(available: &[SymbolSeries], symbols: &[String]) -> Result<Vec<usize>, LoadError> {
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(available.len());
    for (i, s) in available.iter().enumerate() {
        index.entry(s.symbol.as_str()).or_insert(i);
    }
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(symbols.len());
    for name in symbols {
        if !seen.insert(name.as_str()) {
            continue;
        }
        let slot = *index
            .get(name.as_str())
            .ok_or_else(|| LoadError::SymbolNotFound(name.clone()))?;
        out.push(slot);
    }
    Ok(out)
}
