//! Binary layout constants for `scoredata.bin`
//!
//! All multi-byte integers are little-endian. There is no alignment padding
//! between fields.

/// File header: opaque magic followed by the song count
pub mod header {
    pub const MAGIC: usize = 4;
    pub const SONG_COUNT: usize = 4;

    pub const SIZE: usize = MAGIC + SONG_COUNT;
}

/// Per-song header preceding its instrument entries
pub mod song {
    pub const CHART_FINGERPRINT: usize = 16;
    pub const INSTRUMENT_COUNT: usize = 1;
    /// 24-bit play count
    pub const PLAY_COUNT: usize = 3;

    pub const SIZE: usize = CHART_FINGERPRINT + INSTRUMENT_COUNT + PLAY_COUNT;
}

/// One instrument/difficulty score entry
pub mod instrument {
    pub const INSTRUMENT_ID: usize = 2;
    pub const DIFFICULTY: usize = 1;
    pub const NOTES_HIT: usize = 2;
    pub const NOTES_TOTAL: usize = 2;
    pub const STARS: usize = 1;
    pub const RESERVED: usize = 4;
    pub const SCORE: usize = 4;

    pub const SIZE: usize =
        INSTRUMENT_ID + DIFFICULTY + NOTES_HIT + NOTES_TOTAL + STARS + RESERVED + SCORE;
}

/// Largest value the 24-bit play count field can hold
pub const MAX_PLAY_COUNT: u32 = 0x00FF_FFFF;
