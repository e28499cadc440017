//! Tests for scoredata.bin decoding
//!
//! Covers the header-declared record count, truncation handling and the
//! byte-level layout of each record.

use chscore_core::scoredata::{
    ChartFingerprint, DecodeError, InstrumentScore, SongScoreRecord, decode, decode_header, encode,
};
use proptest::prelude::*;

const MAGIC: [u8; 4] = [0xAA, 0xBB, 0xCC, 0xDD];

fn instrument(instrument_id: u16, difficulty: u8, score: u32) -> InstrumentScore {
    InstrumentScore {
        instrument_id,
        difficulty,
        notes_hit: 100,
        notes_total: 120,
        stars: 4,
        reserved: [0; 4],
        score,
    }
}

fn record(seed: u8, play_count: u32, instruments: Vec<InstrumentScore>) -> SongScoreRecord {
    SongScoreRecord {
        chart_fingerprint: ChartFingerprint::new([seed; 16]),
        aggregate_play_count: play_count,
        instruments,
    }
}

mod header {
    use super::*;

    #[test]
    fn test_single_empty_record() {
        let mut bytes = vec![0xAA, 0xBB, 0xCC, 0xDD, 0x01, 0x00, 0x00, 0x00];
        bytes.extend_from_slice(&[0x11; 16]);
        bytes.push(0x00);
        bytes.extend_from_slice(&[0x05, 0x00, 0x00]);

        let records = decode(&bytes).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].instruments.len(), 0);
        assert_eq!(records[0].aggregate_play_count, 5);
        assert_eq!(records[0].chart_fingerprint, ChartFingerprint::new([0x11; 16]));
    }

    #[test]
    fn test_seven_bytes_is_header_too_short() {
        let failure = decode(&[0u8; 7]).unwrap_err();
        assert_eq!(failure.error, DecodeError::HeaderTooShort { len: 7 });
        assert!(failure.records.is_empty());
    }

    #[test]
    fn test_magic_is_not_validated() {
        let bytes = encode([0, 0, 0, 0], &[record(1, 1, vec![])]).unwrap();
        assert_eq!(decode(&bytes).unwrap().len(), 1);

        let header = decode_header(&bytes).unwrap();
        assert_eq!(header.magic, [0, 0, 0, 0]);
        assert_eq!(header.song_count, 1);
    }

    #[test]
    fn test_zero_songs_ignores_trailing_bytes() {
        let mut bytes = MAGIC.to_vec();
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&[0xFF; 40]);

        assert!(decode(&bytes).unwrap().is_empty());
    }
}

mod records {
    use super::*;

    #[test]
    fn test_declared_count_is_honored() {
        let records: Vec<_> = (0..5u8)
            .map(|i| record(i, i as u32, vec![instrument(0, 3, 1000 * i as u32)]))
            .collect();
        let mut bytes = encode(MAGIC, &records).unwrap();
        // One extra full record beyond the declared count stays unread
        bytes.extend(encode(MAGIC, &[record(9, 9, vec![])]).unwrap()[8..].iter());

        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.len(), 5);
        assert_eq!(decoded, records);
    }

    #[test]
    fn test_field_layout() {
        let mut bytes = MAGIC.to_vec();
        bytes.extend_from_slice(&1u32.to_le_bytes());
        bytes.extend_from_slice(&[0x42; 16]);
        bytes.push(1);
        bytes.extend_from_slice(&[0x34, 0x12, 0x00]);
        // instrument 4 (drums), expert
        bytes.extend_from_slice(&[0x04, 0x00, 0x03]);
        bytes.extend_from_slice(&250u16.to_le_bytes());
        bytes.extend_from_slice(&300u16.to_le_bytes());
        bytes.push(5);
        bytes.extend_from_slice(&[1, 2, 3, 4]);
        bytes.extend_from_slice(&123_456u32.to_le_bytes());

        let records = decode(&bytes).unwrap();
        assert_eq!(records[0].aggregate_play_count, 0x1234);

        let entry = &records[0].instruments[0];
        assert_eq!(entry.instrument_id, 4);
        assert_eq!(entry.difficulty, 3);
        assert_eq!(entry.notes_hit, 250);
        assert_eq!(entry.notes_total, 300);
        assert_eq!(entry.stars, 5);
        assert_eq!(entry.reserved, [1, 2, 3, 4]);
        assert_eq!(entry.score, 123_456);
    }

    #[test]
    fn test_zero_notes_total_has_no_completion() {
        let mut entry = instrument(1, 0, 0);
        entry.notes_hit = 0;
        entry.notes_total = 0;
        let bytes = encode(MAGIC, &[record(3, 0, vec![entry])]).unwrap();

        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded[0].instruments[0].notes_total, 0);
        assert_eq!(decoded[0].instruments[0].completion_percent(), None);
    }

    #[test]
    fn test_max_play_count() {
        let bytes = encode(MAGIC, &[record(3, 0x00FF_FFFF, vec![])]).unwrap();
        assert_eq!(decode(&bytes).unwrap()[0].aggregate_play_count, 0x00FF_FFFF);
    }
}

mod truncation {
    use super::*;

    fn two_records() -> Vec<SongScoreRecord> {
        vec![
            record(1, 2, vec![instrument(0, 3, 500)]),
            record(2, 7, vec![instrument(0, 2, 400), instrument(4, 3, 900)]),
        ]
    }

    #[test]
    fn test_truncated_second_record_keeps_first() {
        let records = two_records();
        let bytes = encode(MAGIC, &records).unwrap();
        // Cut into the last instrument's score
        let cut = &bytes[..bytes.len() - 2];

        let failure = decode(cut).unwrap_err();
        assert_eq!(failure.records, records[..1]);
        assert_eq!(failure.error.records_parsed(), 1);
        match failure.error {
            DecodeError::TruncatedInput {
                offset,
                needed,
                remaining,
                ..
            } => {
                assert_eq!(offset, cut.len() - 2);
                assert_eq!(needed, 4);
                assert_eq!(remaining, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_every_cut_point_fails_with_complete_prefix() {
        let records = two_records();
        let bytes = encode(MAGIC, &records).unwrap();

        for len in 8..bytes.len() {
            let failure = decode(&bytes[..len]).unwrap_err();
            assert!(failure.error.offset() <= len);
            assert_eq!(failure.records, records[..failure.records.len()]);
        }
    }

    #[test]
    fn test_huge_declared_count() {
        let mut bytes = MAGIC.to_vec();
        bytes.extend_from_slice(&u32::MAX.to_le_bytes());

        let failure = decode(&bytes).unwrap_err();
        assert!(failure.records.is_empty());
        assert!(matches!(failure.error, DecodeError::TruncatedInput { offset: 8, .. }));
    }
}

fn arb_instrument() -> impl Strategy<Value = InstrumentScore> {
    (
        any::<u16>(),
        any::<u8>(),
        any::<u16>(),
        any::<u16>(),
        any::<u8>(),
        any::<[u8; 4]>(),
        any::<u32>(),
    )
        .prop_map(
            |(instrument_id, difficulty, notes_hit, notes_total, stars, reserved, score)| {
                InstrumentScore {
                    instrument_id,
                    difficulty,
                    notes_hit,
                    notes_total,
                    stars,
                    reserved,
                    score,
                }
            },
        )
}

fn arb_record() -> impl Strategy<Value = SongScoreRecord> {
    (
        any::<[u8; 16]>(),
        0u32..=0x00FF_FFFF,
        prop::collection::vec(arb_instrument(), 0..6),
    )
        .prop_map(|(fingerprint, play_count, instruments)| SongScoreRecord {
            chart_fingerprint: ChartFingerprint::new(fingerprint),
            aggregate_play_count: play_count,
            instruments,
        })
}

proptest! {
    #[test]
    fn prop_encoded_records_decode_back(
        magic in any::<[u8; 4]>(),
        records in prop::collection::vec(arb_record(), 0..8),
    ) {
        let bytes = encode(magic, &records).unwrap();
        prop_assert_eq!(decode(&bytes).unwrap(), records);
    }

    #[test]
    fn prop_arbitrary_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        match decode(&bytes) {
            Ok(records) => prop_assert!(records.len() <= bytes.len()),
            Err(failure) => prop_assert!(failure.error.offset() <= bytes.len()),
        }
    }
}
