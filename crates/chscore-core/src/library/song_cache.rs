//! Reader for the game's `songcache.bin`.
//!
//! The cache has no published layout. Each cached chart starts with the
//! game-name marker, followed by the 16-byte chart fingerprint used in
//! `scoredata.bin` and, somewhere in the bytes after it, the chart's path on
//! disk. Entries are located by scanning for the marker, so a damaged or
//! unfamiliar file yields fewer titles instead of an error.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use memchr::memmem;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;
use crate::scoredata::{ByteBuffer, ChartFingerprint};

pub const SONG_CACHE_FILE: &str = "songcache.bin";

/// Bytes preceding every cached chart's fingerprint
const ENTRY_MARKER: &[u8] = b"\x0aClone Hero\x00";

/// How far past the fingerprint the chart path may start
const PATH_WINDOW: usize = 500;

/// Where a chart path begins: a drive separator, or the songs folder
const PATH_STARTS: [&[u8]; 5] = [b":\\", b"Songs\\", b"songs\\", b"/Songs/", b"/songs/"];

/// Chart file extensions that end a path
const PATH_ENDS: [&[u8]; 3] = [b".sng", b".chart", b".mid"];

const TITLE_EXTENSIONS: [&str; 5] = [".sng", ".chart", ".mid", ".midi", ".ini"];

/// One chart known to the game's cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CachedSong {
    pub chart_fingerprint: ChartFingerprint,
    /// Chart path as the game stored it, when one was found
    pub chart_path: Option<String>,
    pub title: Option<String>,
}

impl CachedSong {
    fn new(chart_fingerprint: ChartFingerprint, chart_path: Option<String>) -> Self {
        let title = chart_path.as_deref().and_then(title_from_path);
        Self {
            chart_fingerprint,
            chart_path,
            title,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SongCache {
    entries: HashMap<ChartFingerprint, CachedSong>,
}

impl SongCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan a cache buffer for chart entries.
    ///
    /// Never fails: a marker too close to the end to hold a fingerprint ends
    /// the scan. When a fingerprint appears more than once the later entry
    /// wins, unless it carries no path.
    pub fn parse(bytes: &[u8]) -> Self {
        let mut cache = Self::new();
        let mut next = 0;

        for marker in memmem::find_iter(bytes, ENTRY_MARKER) {
            if marker < next {
                continue;
            }
            let start = marker + ENTRY_MARKER.len();
            let mut buf = ByteBuffer::new(&bytes[start..]);
            let fingerprint = match buf.read_array::<{ ChartFingerprint::LEN }>() {
                Ok(fingerprint) => ChartFingerprint::new(fingerprint),
                Err(e) => {
                    debug!("Song cache ends inside an entry: {:?}", e);
                    break;
                }
            };
            let window = buf.read_bytes(buf.remaining().min(PATH_WINDOW)).unwrap_or_default();

            cache.insert(CachedSong::new(fingerprint, find_chart_path(window)));
            next = start + ChartFingerprint::LEN;
        }

        cache
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let cache = Self::parse(&fs::read(path)?);
        info!("Read {} cached charts from {}", cache.len(), path.display());
        Ok(cache)
    }

    fn insert(&mut self, song: CachedSong) {
        match self.entries.get(&song.chart_fingerprint) {
            Some(existing) if song.chart_path.is_none() && existing.chart_path.is_some() => {}
            _ => {
                self.entries.insert(song.chart_fingerprint, song);
            }
        }
    }

    pub fn get(&self, fingerprint: &ChartFingerprint) -> Option<&CachedSong> {
        self.entries.get(fingerprint)
    }

    /// Entries whose fingerprint hex starts with `prefix` (case-insensitive),
    /// sorted by fingerprint.
    pub fn resolve_prefix(&self, prefix: &str) -> Vec<&CachedSong> {
        let prefix = prefix.trim().to_ascii_lowercase();
        let mut matches: Vec<&CachedSong> = self
            .entries
            .values()
            .filter(|song| song.chart_fingerprint.to_hex().starts_with(&prefix))
            .collect();
        matches.sort_by_key(|song| song.chart_fingerprint);
        matches
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CachedSong> {
        self.entries.values()
    }
}

/// First chart path in `window`, cut at a chart extension or a NUL.
fn find_chart_path(window: &[u8]) -> Option<String> {
    let start = PATH_STARTS.iter().find_map(|pattern| {
        memmem::find(window, pattern).map(|pos| {
            // Keep the drive letter in front of `:\`
            if pattern.starts_with(b":") {
                pos.saturating_sub(1)
            } else {
                pos
            }
        })
    })?;
    let tail = &window[start..];

    let mut end = PATH_ENDS
        .iter()
        .find_map(|ext| memmem::find(tail, ext).map(|pos| pos + ext.len()))
        .unwrap_or(tail.len());
    if let Some(nul) = memchr::memchr(0, &tail[..end]) {
        end = nul;
    }

    let path: String = String::from_utf8_lossy(&tail[..end])
        .chars()
        .filter(|&c| c != char::REPLACEMENT_CHARACTER)
        .collect();
    let path = path.trim();
    (!path.is_empty()).then(|| path.to_string())
}

/// Readable title for a cached path: the file stem of a `.sng` package, or
/// the folder name when the file is a generic `notes.*` chart.
fn title_from_path(path: &str) -> Option<String> {
    let mut parts = path.rsplit(['\\', '/']).filter(|part| !part.is_empty());
    let file = parts.next()?;

    let lower = file.to_ascii_lowercase();
    let stem = TITLE_EXTENSIONS
        .iter()
        .find(|ext| lower.ends_with(*ext))
        .map_or(file, |ext| &file[..file.len() - ext.len()]);

    let title = if stem.eq_ignore_ascii_case("notes") {
        parts.next()?
    } else {
        stem
    };
    let title = title.trim();
    (!title.is_empty()).then(|| title.to_string())
}
