use crate::error::{Error, Result};

use super::layout;
use super::types::SongScoreRecord;

/// Serialize records into the `scoredata.bin` layout.
///
/// This is the exact inverse of [`decode`](super::decode) and exists for
/// fixtures and round-trip checks; the game's own file is never written.
///
/// # Errors
///
/// Returns [`Error::Encode`] if a record has more than 255 instruments or a
/// play count that does not fit in 24 bits.
pub fn encode(magic: [u8; 4], records: &[SongScoreRecord]) -> Result<Vec<u8>> {
    let song_count = u32::try_from(records.len())
        .map_err(|_| Error::Encode(format!("too many songs: {}", records.len())))?;

    let body: usize = records
        .iter()
        .map(|r| layout::song::SIZE + r.instruments.len() * layout::instrument::SIZE)
        .sum();
    let mut out = Vec::with_capacity(layout::header::SIZE + body);

    out.extend_from_slice(&magic);
    out.extend_from_slice(&song_count.to_le_bytes());

    for (index, record) in records.iter().enumerate() {
        let instrument_count = u8::try_from(record.instruments.len()).map_err(|_| {
            Error::Encode(format!(
                "record {} has {} instruments (max 255)",
                index,
                record.instruments.len()
            ))
        })?;
        if record.aggregate_play_count > layout::MAX_PLAY_COUNT {
            return Err(Error::Encode(format!(
                "record {} play count {} exceeds 24 bits",
                index, record.aggregate_play_count
            )));
        }

        out.extend_from_slice(record.chart_fingerprint.as_bytes());
        out.push(instrument_count);
        out.extend_from_slice(&record.aggregate_play_count.to_le_bytes()[..layout::song::PLAY_COUNT]);

        for entry in &record.instruments {
            out.extend_from_slice(&entry.instrument_id.to_le_bytes());
            out.push(entry.difficulty);
            out.extend_from_slice(&entry.notes_hit.to_le_bytes());
            out.extend_from_slice(&entry.notes_total.to_le_bytes());
            out.push(entry.stars);
            out.extend_from_slice(&entry.reserved);
            out.extend_from_slice(&entry.score.to_le_bytes());
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoredata::{ChartFingerprint, InstrumentScore};

    fn record(instruments: usize, play_count: u32) -> SongScoreRecord {
        SongScoreRecord {
            chart_fingerprint: ChartFingerprint::new([7; 16]),
            aggregate_play_count: play_count,
            instruments: vec![
                InstrumentScore {
                    instrument_id: 4,
                    difficulty: 2,
                    notes_hit: 10,
                    notes_total: 20,
                    stars: 3,
                    reserved: [1, 0, 0, 0],
                    score: 1000,
                };
                instruments
            ],
        }
    }

    #[test]
    fn test_encode_layout() {
        let bytes = encode([0xAA, 0xBB, 0xCC, 0xDD], &[record(1, 0x030201)]).unwrap();
        assert_eq!(bytes.len(), 8 + 20 + 16);
        assert_eq!(&bytes[..8], &[0xAA, 0xBB, 0xCC, 0xDD, 1, 0, 0, 0]);
        assert_eq!(bytes[24], 1); // instrument count
        assert_eq!(&bytes[25..28], &[0x01, 0x02, 0x03]);
        assert_eq!(&bytes[28..30], &[4, 0]); // instrument id
        assert_eq!(&bytes[36..40], &[1, 0, 0, 0]); // reserved
        assert_eq!(&bytes[40..44], &1000u32.to_le_bytes());
    }

    #[test]
    fn test_encode_rejects_too_many_instruments() {
        let err = encode([0; 4], &[record(256, 1)]).unwrap_err();
        assert!(matches!(err, Error::Encode(_)));
    }

    #[test]
    fn test_encode_rejects_wide_play_count() {
        let err = encode([0; 4], &[record(0, 0x0100_0000)]).unwrap_err();
        assert!(matches!(err, Error::Encode(_)));
        assert!(encode([0; 4], &[record(0, layout::MAX_PLAY_COUNT)]).is_ok());
    }
}
