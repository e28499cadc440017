//! Tests for reading the game's songcache.bin
//!
//! Cached titles stand in for charts the songs folder scan did not find.

use std::fs;

use chscore_core::chart::fingerprint;
use chscore_core::export::flatten;
use chscore_core::library::{SONG_CACHE_FILE, SongCache, SongLibrary};
use chscore_core::scoredata::{ChartFingerprint, InstrumentScore, SongScoreRecord};
use proptest::prelude::*;
use tempfile::TempDir;

const MARKER: &[u8] = b"\x0aClone Hero\x00";

fn cache_bytes(entries: &[(ChartFingerprint, &str)]) -> Vec<u8> {
    let mut bytes = b"header junk".to_vec();
    for (fp, path) in entries {
        bytes.extend_from_slice(MARKER);
        bytes.extend_from_slice(fp.as_bytes());
        bytes.extend_from_slice(&[0x02, 0x00]);
        bytes.extend_from_slice(path.as_bytes());
        bytes.extend_from_slice(&[0x00, 0x10, 0x20, 0x30]);
    }
    bytes
}

fn record(fp: ChartFingerprint, score: u32) -> SongScoreRecord {
    SongScoreRecord {
        chart_fingerprint: fp,
        aggregate_play_count: 1,
        instruments: vec![InstrumentScore {
            instrument_id: 0,
            difficulty: 3,
            notes_hit: 10,
            notes_total: 10,
            stars: 5,
            reserved: [0; 4],
            score,
        }],
    }
}

#[test]
fn test_load_from_game_folder() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(SONG_CACHE_FILE);
    let fp = ChartFingerprint::new([0x31; 16]);
    fs::write(&path, cache_bytes(&[(fp, "E:\\CH\\Songs\\Pack\\Tune\\notes.mid")])).unwrap();

    let cache = SongCache::load(&path).unwrap();
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get(&fp).unwrap().title.as_deref(), Some("Tune"));
}

#[test]
fn test_load_missing_file_is_not_found() {
    let dir = TempDir::new().unwrap();
    let err = SongCache::load(dir.path().join(SONG_CACHE_FILE)).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_flatten_falls_back_to_cached_title() {
    let scanned = fingerprint(b"scanned chart").chart_fingerprint();
    let cached = ChartFingerprint::new([0x77; 16]);
    let unknown = ChartFingerprint::new([0x99; 16]);

    let songs = TempDir::new().unwrap();
    let folder = songs.path().join("Scanned Song");
    fs::create_dir_all(&folder).unwrap();
    fs::write(folder.join("notes.chart"), b"scanned chart").unwrap();

    let cache = SongCache::parse(&cache_bytes(&[
        (scanned, "C:\\Songs\\Stale Name\\notes.chart"),
        (cached, "C:\\Songs\\Removed Song.sng"),
    ]));
    let library = SongLibrary::scan(songs.path()).unwrap().with_cache(cache);

    let entries = flatten(
        &[record(scanned, 10), record(cached, 20), record(unknown, 30)],
        Some(&library),
    );
    assert_eq!(entries[0].title.as_deref(), Some("Scanned Song"));
    assert_eq!(entries[1].title.as_deref(), Some("Removed Song"));
    assert_eq!(entries[1].artist, None);
    assert_eq!(entries[2].title, None);
}

proptest! {
    #[test]
    fn prop_arbitrary_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        let cache = SongCache::parse(&bytes);
        prop_assert!(cache.len() <= bytes.len() / (MARKER.len() + ChartFingerprint::LEN));
    }

    #[test]
    fn prop_marker_with_short_tail_never_panics(
        prefix in prop::collection::vec(any::<u8>(), 0..64),
        tail in prop::collection::vec(any::<u8>(), 0..ChartFingerprint::LEN),
    ) {
        let mut bytes = prefix;
        bytes.extend_from_slice(MARKER);
        bytes.extend_from_slice(&tail);
        let _ = SongCache::parse(&bytes);
    }
}
