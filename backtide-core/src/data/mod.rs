//! Candle ingestion at the engine boundary

pub mod frame;

pub use frame::{decode_frame, encode_frame, FrameError};
