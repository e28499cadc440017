//! Installed-song catalog keyed by chart fingerprint.
//!
//! Decoded score records only carry a 16-byte chart key. Scanning the songs
//! folder and hashing each chart file gives the join back to a folder and its
//! `song.ini` metadata. The game's own `songcache.bin` fills in titles for
//! charts the scan did not find.

mod song_cache;
mod song_ini;

pub use song_cache::{CachedSong, SONG_CACHE_FILE, SongCache};
pub use song_ini::{SONG_INI, SongMetadata};

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::chart::{ChartFingerprintPair, chart_file_rank, fingerprint_reader};
use crate::error::Result;
use crate::scoredata::ChartFingerprint;

/// One installed chart
#[derive(Debug, Clone, Serialize)]
pub struct SongEntry {
    pub chart_path: PathBuf,
    /// Name of the folder holding the chart
    pub folder: String,
    pub fingerprints: ChartFingerprintPair,
    pub metadata: Option<SongMetadata>,
}

impl SongEntry {
    /// Build an entry for a chart file, reading its bytes and nearby `song.ini`.
    pub fn from_chart_file<P: AsRef<Path>>(chart_path: P) -> Result<Self> {
        let chart_path = chart_path.as_ref();
        let fingerprints = fingerprint_reader(File::open(chart_path)?)?;

        let folder = chart_path
            .parent()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            chart_path: chart_path.to_path_buf(),
            folder,
            fingerprints,
            metadata: find_song_metadata(chart_path),
        })
    }

    pub fn chart_fingerprint(&self) -> ChartFingerprint {
        self.fingerprints.chart_fingerprint()
    }

    /// Song name from `song.ini`, falling back to the folder name
    pub fn display_title(&self) -> &str {
        self.metadata
            .as_ref()
            .and_then(|m| m.name.as_deref())
            .unwrap_or(&self.folder)
    }

    pub fn artist(&self) -> Option<&str> {
        self.metadata.as_ref().and_then(|m| m.artist.as_deref())
    }

    pub fn charter(&self) -> Option<&str> {
        self.metadata.as_ref().and_then(|m| m.charter.as_deref())
    }
}

/// Look for `song.ini` next to the chart, then one folder up for nested charts.
fn find_song_metadata(chart_path: &Path) -> Option<SongMetadata> {
    let song_dir = chart_path.parent()?;
    let candidates = [Some(song_dir), song_dir.parent()];

    for dir in candidates.into_iter().flatten() {
        let ini_path = dir.join(SONG_INI);
        if !ini_path.is_file() {
            continue;
        }
        match SongMetadata::load(&ini_path) {
            Ok(metadata) => return metadata,
            Err(e) => {
                warn!("Failed to read {}: {}", ini_path.display(), e);
                return None;
            }
        }
    }
    None
}

/// Display fields for one chart, from a scanned entry or the song cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SongInfo<'a> {
    pub title: &'a str,
    pub artist: Option<&'a str>,
    pub charter: Option<&'a str>,
}

impl<'a> From<&'a SongEntry> for SongInfo<'a> {
    fn from(entry: &'a SongEntry) -> Self {
        Self {
            title: entry.display_title(),
            artist: entry.artist(),
            charter: entry.charter(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SongLibrary {
    entries: HashMap<ChartFingerprint, SongEntry>,
    cache: SongCache,
}

impl SongLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk `root` recursively and fingerprint one chart file per folder.
    ///
    /// Charts that cannot be read are skipped with a warning. A `root` that is
    /// missing or is not a directory is an error.
    pub fn scan<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref();
        if !fs::metadata(root)?.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotADirectory,
                format!("{} is not a directory", root.display()),
            )
            .into());
        }

        // Best-ranked chart file per song folder
        let mut charts: HashMap<PathBuf, (usize, PathBuf)> = HashMap::new();
        for entry in WalkDir::new(root) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable path: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(rank) = entry.file_name().to_str().and_then(chart_file_rank) else {
                continue;
            };
            let Some(dir) = entry.path().parent() else {
                continue;
            };

            match charts.entry(dir.to_path_buf()) {
                Entry::Occupied(mut slot) if rank < slot.get().0 => {
                    slot.insert((rank, entry.into_path()));
                }
                Entry::Occupied(_) => {}
                Entry::Vacant(slot) => {
                    slot.insert((rank, entry.into_path()));
                }
            }
        }

        let mut chart_paths: Vec<PathBuf> = charts.into_values().map(|(_, path)| path).collect();
        chart_paths.sort();

        let mut library = Self::new();
        for chart_path in chart_paths {
            match SongEntry::from_chart_file(&chart_path) {
                Ok(entry) => library.insert(entry),
                Err(e) => warn!("Skipping chart {}: {}", chart_path.display(), e),
            }
        }

        info!("Indexed {} charts under {}", library.len(), root.display());
        Ok(library)
    }

    /// Add an entry. The first entry for a fingerprint wins; byte-identical
    /// charts in other folders are dropped.
    pub fn insert(&mut self, entry: SongEntry) {
        match self.entries.entry(entry.chart_fingerprint()) {
            Entry::Occupied(existing) => {
                debug!(
                    "Duplicate chart {} (already indexed from {})",
                    entry.chart_path.display(),
                    existing.get().chart_path.display()
                );
            }
            Entry::Vacant(slot) => {
                slot.insert(entry);
            }
        }
    }

    pub fn resolve(&self, fingerprint: &ChartFingerprint) -> Option<&SongEntry> {
        self.entries.get(fingerprint)
    }

    /// Use `cache` for charts missing from the scanned entries
    pub fn set_cache(&mut self, cache: SongCache) {
        self.cache = cache;
    }

    pub fn with_cache(mut self, cache: SongCache) -> Self {
        self.set_cache(cache);
        self
    }

    pub fn cache(&self) -> &SongCache {
        &self.cache
    }

    /// Display fields for a chart. Scanned entries take precedence over
    /// cached titles.
    pub fn lookup(&self, fingerprint: &ChartFingerprint) -> Option<SongInfo<'_>> {
        if let Some(entry) = self.resolve(fingerprint) {
            return Some(entry.into());
        }
        let title = self.cache.get(fingerprint)?.title.as_deref()?;
        Some(SongInfo {
            title,
            artist: None,
            charter: None,
        })
    }

    /// Entries whose fingerprint hex starts with `prefix` (case-insensitive),
    /// sorted by chart path.
    pub fn resolve_prefix(&self, prefix: &str) -> Vec<&SongEntry> {
        let prefix = prefix.trim().to_ascii_lowercase();
        let mut matches: Vec<&SongEntry> = self
            .entries
            .iter()
            .filter(|(fingerprint, _)| fingerprint.to_hex().starts_with(&prefix))
            .map(|(_, entry)| entry)
            .collect();
        matches.sort_by(|a, b| a.chart_path.cmp(&b.chart_path));
        matches
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SongEntry> {
        self.entries.values()
    }
}
