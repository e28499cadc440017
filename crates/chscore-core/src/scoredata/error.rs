use thiserror::Error;

use super::layout;
use super::types::SongScoreRecord;

/// Reasons a `scoredata.bin` buffer could not be decoded.
///
/// Every field width is valid for any value, so the only way to fail is to run
/// out of bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("header too short: {len} bytes, need at least {}", layout::header::SIZE)]
    HeaderTooShort { len: usize },

    #[error(
        "truncated input at offset {offset:#x} reading {field}: need {needed} bytes, \
         {remaining} remaining ({records_parsed} records parsed)"
    )]
    TruncatedInput {
        offset: usize,
        field: &'static str,
        needed: usize,
        remaining: usize,
        records_parsed: usize,
    },
}

impl DecodeError {
    /// Byte offset at which decoding stopped
    pub fn offset(&self) -> usize {
        match self {
            Self::HeaderTooShort { .. } => 0,
            Self::TruncatedInput { offset, .. } => *offset,
        }
    }

    /// Song records fully decoded before the failure
    pub fn records_parsed(&self) -> usize {
        match self {
            Self::HeaderTooShort { .. } => 0,
            Self::TruncatedInput { records_parsed, .. } => *records_parsed,
        }
    }
}

/// A failed decode together with the records that were complete before it.
///
/// Keeping or discarding `records` is the caller's decision.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{error}")]
pub struct DecodeFailure {
    pub error: DecodeError,
    pub records: Vec<SongScoreRecord>,
}

impl DecodeFailure {
    pub fn into_records(self) -> Vec<SongScoreRecord> {
        self.records
    }
}
