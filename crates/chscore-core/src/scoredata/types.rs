use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;
use crate::game::{Difficulty, Instrument};
use crate::hex;

use super::layout;

/// Opaque 16-byte chart key as stored in `scoredata.bin`.
///
/// It is compared byte-for-byte and never assumed to be any particular
/// digest; the chart hasher produces a value of this type for lookups.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ChartFingerprint([u8; layout::song::CHART_FINGERPRINT]);

impl ChartFingerprint {
    pub const LEN: usize = layout::song::CHART_FINGERPRINT;

    pub const fn new(bytes: [u8; Self::LEN]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; Self::LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// First 8 hex digits, used for compact display (`[1a2b3c4d]`)
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl From<[u8; ChartFingerprint::LEN]> for ChartFingerprint {
    fn from(bytes: [u8; ChartFingerprint::LEN]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for ChartFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        hex::write(f, &self.0)
    }
}

impl fmt::Debug for ChartFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChartFingerprint({})", self)
    }
}

impl FromStr for ChartFingerprint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hex::decode_array::<{ ChartFingerprint::LEN }>(s.trim())
            .map(Self)
            .ok_or_else(|| Error::InvalidFingerprint(s.to_string()))
    }
}

impl Serialize for ChartFingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ChartFingerprint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// File header fields preceding the song records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreHeader {
    /// Opaque format signature; present but not validated
    pub magic: [u8; 4],
    /// Number of song records the file declares
    pub song_count: u32,
}

/// Best result for one instrument/difficulty combination of a song
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstrumentScore {
    /// Raw instrument enumerator, see [`Instrument`]
    pub instrument_id: u16,
    /// Raw difficulty enumerator, see [`Difficulty`]
    pub difficulty: u8,
    pub notes_hit: u16,
    pub notes_total: u16,
    /// 0-6, where 6 is a gold star. Out-of-range values are kept as-is.
    pub stars: u8,
    /// Format padding, preserved verbatim
    pub reserved: [u8; 4],
    pub score: u32,
}

impl InstrumentScore {
    pub const GOLD_STARS: u8 = 6;

    /// Hit percentage, or `None` when the entry carries no note data
    /// (`notes_total == 0`).
    pub fn completion_percent(&self) -> Option<f64> {
        if self.notes_total == 0 {
            return None;
        }
        Some(f64::from(self.notes_hit) / f64::from(self.notes_total) * 100.0)
    }

    pub fn instrument(&self) -> Option<Instrument> {
        Instrument::from_u16(self.instrument_id)
    }

    pub fn difficulty_level(&self) -> Option<Difficulty> {
        Difficulty::from_u8(self.difficulty)
    }

    pub fn is_gold_star(&self) -> bool {
        self.stars == Self::GOLD_STARS
    }
}

/// All recorded results for a single chart
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SongScoreRecord {
    pub chart_fingerprint: ChartFingerprint,
    /// Plays across every instrument (24-bit on disk)
    pub aggregate_play_count: u32,
    /// Entries in file order
    pub instruments: Vec<InstrumentScore>,
}

impl SongScoreRecord {
    pub fn instrument_count(&self) -> usize {
        self.instruments.len()
    }

    /// Highest score across all instruments of this chart
    pub fn best_score(&self) -> Option<u32> {
        self.instruments.iter().map(|entry| entry.score).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(notes_hit: u16, notes_total: u16) -> InstrumentScore {
        InstrumentScore {
            instrument_id: 0,
            difficulty: 3,
            notes_hit,
            notes_total,
            stars: 5,
            reserved: [1, 0, 0, 0],
            score: 147_392,
        }
    }

    #[test]
    fn test_completion_percent() {
        let pct = entry(197, 200).completion_percent().unwrap();
        assert!((pct - 98.5).abs() < 1e-9);
    }

    #[test]
    fn test_completion_percent_no_data() {
        assert_eq!(entry(0, 0).completion_percent(), None);
        assert_eq!(entry(12, 0).completion_percent(), None);
    }

    #[test]
    fn test_typed_views() {
        let e = entry(1, 1);
        assert_eq!(e.instrument(), Some(Instrument::LeadGuitar));
        assert_eq!(e.difficulty_level(), Some(Difficulty::Expert));

        let unknown = InstrumentScore {
            instrument_id: 42,
            difficulty: 9,
            ..e
        };
        assert_eq!(unknown.instrument(), None);
        assert_eq!(unknown.difficulty_level(), None);
    }

    #[test]
    fn test_gold_star() {
        let mut e = entry(1, 1);
        assert!(!e.is_gold_star());
        e.stars = 6;
        assert!(e.is_gold_star());
        e.stars = 200;
        assert!(!e.is_gold_star());
    }

    #[test]
    fn test_fingerprint_hex_roundtrip() {
        let fp = ChartFingerprint::new([
            0x1a, 0x2b, 0x3c, 0x4d, 0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 0xfe, 0xff,
        ]);
        assert_eq!(fp.to_string(), "1a2b3c4d00010203040506070809feff");
        assert_eq!(fp.short(), "1a2b3c4d");
        assert_eq!(fp.to_string().parse::<ChartFingerprint>().unwrap(), fp);
        assert_eq!(
            fp.to_string().to_uppercase().parse::<ChartFingerprint>().unwrap(),
            fp
        );
    }

    #[test]
    fn test_fingerprint_len_matches_layout() {
        assert_eq!(ChartFingerprint::LEN, layout::song::CHART_FINGERPRINT);
        assert_eq!(ChartFingerprint::default().as_bytes().len(), ChartFingerprint::LEN);
        assert_eq!(ChartFingerprint::default().to_hex().len(), ChartFingerprint::LEN * 2);
    }

    #[test]
    fn test_fingerprint_parse_rejects_bad_input() {
        assert!("abc".parse::<ChartFingerprint>().is_err());
        assert!("ab".repeat(ChartFingerprint::LEN + 1).parse::<ChartFingerprint>().is_err());
        assert!("zz".repeat(16).parse::<ChartFingerprint>().is_err());
    }

    #[test]
    fn test_fingerprint_serde_as_hex_string() {
        let fp = ChartFingerprint::new([0xab; 16]);
        let json = serde_json::to_string(&fp).unwrap();
        assert_eq!(json, format!("\"{}\"", "ab".repeat(16)));
        let back: ChartFingerprint = serde_json::from_str(&json).unwrap();
        assert_eq!(back, fp);
    }

    #[test]
    fn test_best_score() {
        let mut record = SongScoreRecord {
            chart_fingerprint: ChartFingerprint::default(),
            aggregate_play_count: 3,
            instruments: vec![],
        };
        assert_eq!(record.best_score(), None);

        record.instruments.push(entry(1, 1));
        record.instruments.push(InstrumentScore {
            score: 200_000,
            ..entry(1, 1)
        });
        assert_eq!(record.instrument_count(), 2);
        assert_eq!(record.best_score(), Some(200_000));
    }
}
