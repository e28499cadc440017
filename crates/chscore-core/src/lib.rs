pub mod chart;
pub mod error;
pub mod export;
pub mod game;
pub mod library;
pub mod scoredata;
pub mod storage;

mod hex;

pub use chart::{
    ChartFingerprintPair, FingerprintHasher, LegacyDigest, ModernDigest, fingerprint,
    fingerprint_reader,
};
pub use error::{Error, Result};
pub use export::{ScoreEntry, flatten};
pub use game::{Difficulty, Instrument};
pub use library::{SongCache, SongEntry, SongInfo, SongLibrary, SongMetadata};
pub use scoredata::{
    ChartFingerprint, DecodeError, DecodeFailure, InstrumentScore, ScoreHeader, SongScoreRecord,
    decode, decode_header,
};
pub use storage::{ChangeKind, ScoreChange, ScoreKey, Snapshot, Tracker};
