//! Flat candle frame decoding.
//!
//! Upstream fetchers ship candles as one flat `f64` buffer, six fields per
//! candle (timestamp, open, high, low, close, volume), plus a list of symbols
//! and how many leading candles belong to each. The frame is validated in full
//! before any slicing happens, so a bad frame produces no partial output.

use crate::domain::{Candle, SymbolSeries};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum FrameError {
    #[error("got {symbols} symbols but {counts} per-symbol counts")]
    CountListMismatch { symbols: usize, counts: usize },

    #[error("buffer length {len} is not a multiple of {fields} fields per candle")]
    RaggedBuffer { len: usize, fields: usize },

    #[error("buffer holds {actual} candles but per-symbol counts sum to {declared}")]
    CandleCountMismatch { declared: usize, actual: usize },

    #[error("per-symbol counts overflow when summed")]
    CountOverflow,

    #[error("candle {index} of '{symbol}' has a non-finite timestamp")]
    BadTimestamp { symbol: String, index: usize },
}

/// Decode a flat candle buffer into per-symbol series, in symbol order.
pub fn decode_frame(
    buffer: &[f64],
    symbols: &[String],
    counts: &[usize],
) -> Result<Vec<SymbolSeries>, FrameError> {
    if symbols.len() != counts.len() {
        return Err(FrameError::CountListMismatch {
            symbols: symbols.len(),
            counts: counts.len(),
        });
    }
    if buffer.len() % Candle::FIELDS != 0 {
        return Err(FrameError::RaggedBuffer {
            len: buffer.len(),
            fields: Candle::FIELDS,
        });
    }
    let actual = buffer.len() / Candle::FIELDS;
    let declared = counts
        .iter()
        .try_fold(0usize, |acc, &n| acc.checked_add(n))
        .ok_or(FrameError::CountOverflow)?;
    if declared != actual {
        return Err(FrameError::CandleCountMismatch { declared, actual });
    }

    let mut records = buffer.chunks_exact(Candle::FIELDS);
    let mut out = Vec::with_capacity(symbols.len());
    for (symbol, &count) in symbols.iter().zip(counts) {
        let mut candles = Vec::with_capacity(count);
        for (index, rec) in records.by_ref().take(count).enumerate() {
            if !rec[0].is_finite() {
                return Err(FrameError::BadTimestamp {
                    symbol: symbol.clone(),
                    index,
                });
            }
            candles.push(Candle {
                timestamp: rec[0] as i64,
                open: rec[1],
                high: rec[2],
                low: rec[3],
                close: rec[4],
                volume: rec[5],
            });
        }
        out.push(SymbolSeries::new(symbol.clone(), candles));
    }
    Ok(out)
}

/// Encode series back into the flat layout, with symbols and counts.
pub fn encode_frame(series: &[SymbolSeries]) -> (Vec<f64>, Vec<String>, Vec<usize>) {
    let total: usize = series.iter().map(|s| s.len()).sum();
    let mut buffer = Vec::with_capacity(total * Candle::FIELDS);
    let mut symbols = Vec::with_capacity(series.len());
    let mut counts = Vec::with_capacity(series.len());
    for s in series {
        for c in &s.candles {
            buffer.extend_from_slice(&[c.timestamp as f64, c.open, c.high, c.low, c.close, c.volume]);
        }
        symbols.push(s.symbol.clone());
        counts.push(s.len());
    }
    (buffer, symbols, counts)
}
