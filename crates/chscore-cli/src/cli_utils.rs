//! Helpers shared by several commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chscore_core::{SongCache, SongLibrary, SongScoreRecord, decode};
use tracing::{debug, warn};

/// Read and decode a score file.
///
/// With `partial`, a truncated file yields the records decoded before the
/// break and a warning instead of an error.
pub fn read_scoredata(path: &Path, partial: bool) -> Result<Vec<SongScoreRecord>> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;

    match decode(&bytes) {
        Ok(records) => Ok(records),
        Err(failure) if partial => {
            warn!(
                "{}: {}, keeping {} complete records",
                path.display(),
                failure.error,
                failure.records.len()
            );
            Ok(failure.into_records())
        }
        Err(failure) => Err(failure).with_context(|| format!("Failed to decode {}", path.display())),
    }
}

/// Scan the songs folder and read the game's song cache, whichever are
/// available. `None` when neither is.
pub fn load_library(
    songs: Option<&Path>,
    song_cache: Option<&Path>,
) -> Result<Option<SongLibrary>> {
    let cache = song_cache.and_then(load_song_cache);

    let library = match songs {
        Some(songs) => {
            eprintln!("Scanning songs in {}...", songs.display());
            let library = SongLibrary::scan(songs)
                .with_context(|| format!("Failed to scan songs folder {}", songs.display()))?;
            eprintln!("Indexed {} charts", library.len());
            Some(library)
        }
        None => None,
    };

    Ok(match (library, cache) {
        (Some(library), Some(cache)) => Some(library.with_cache(cache)),
        (Some(library), None) => Some(library),
        (None, Some(cache)) => Some(SongLibrary::new().with_cache(cache)),
        (None, None) => None,
    })
}

/// A missing or unreadable cache only costs titles
fn load_song_cache(path: &Path) -> Option<SongCache> {
    match SongCache::load(path) {
        Ok(cache) => Some(cache),
        Err(e) if e.is_not_found() => {
            debug!("No song cache at {}", path.display());
            None
        }
        Err(e) => {
            warn!("Failed to read {}: {}", path.display(), e);
            None
        }
    }
}
