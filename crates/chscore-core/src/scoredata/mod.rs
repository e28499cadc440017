//! Decoder for the game's local score history (`scoredata.bin`).
//!
//! The file is a 4-byte opaque magic, a little-endian song count, then one
//! variable-length record per song: a 16-byte chart key, an instrument
//! count, a 24-bit play count and 16 bytes per instrument entry. See
//! [`layout`] for the exact widths.

mod bytes;
mod decoder;
mod encoder;
mod error;
pub mod layout;
mod types;

pub use bytes::{ByteBuffer, ShortRead};
pub use decoder::{decode, decode_header};
pub use encoder::encode;
pub use error::{DecodeError, DecodeFailure};
pub use types::{ChartFingerprint, InstrumentScore, ScoreHeader, SongScoreRecord};
