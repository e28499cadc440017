//! Resolve command: map chart hashes back to installed songs.

use std::path::Path;

use anyhow::{Result, bail};
use chscore_core::SongEntry;
use chscore_core::library::CachedSong;
use serde::Serialize;

use crate::cli_utils;

#[derive(Serialize)]
struct ResolveOutput<'a> {
    query: &'a str,
    matches: Vec<&'a SongEntry>,
    /// Song cache entries, only looked up when the scan found nothing
    cached: Vec<&'a CachedSong>,
}

pub fn run(
    hashes: &[String],
    songs: Option<&Path>,
    song_cache: Option<&Path>,
    json: bool,
) -> Result<()> {
    for hash in hashes {
        if hash.is_empty() || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
            bail!("Not a hex chart hash: {:?}", hash);
        }
    }

    let Some(library) = cli_utils::load_library(songs, song_cache)? else {
        bail!(
            "No songs folder or song cache found, pass --songs or set songs_path in config.toml"
        );
    };

    let outputs: Vec<ResolveOutput> = hashes
        .iter()
        .map(|hash| {
            let matches = library.resolve_prefix(hash);
            let cached = if matches.is_empty() {
                library.cache().resolve_prefix(hash)
            } else {
                Vec::new()
            };
            ResolveOutput {
                query: hash,
                matches,
                cached,
            }
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&outputs)?);
        return Ok(());
    }

    for output in &outputs {
        if output.matches.is_empty() && output.cached.is_empty() {
            println!("{}: not found", output.query);
            continue;
        }
        for song in &output.cached {
            println!(
                "{}: {} (song cache: {})",
                song.chart_fingerprint,
                song.title.as_deref().unwrap_or("Unknown Title"),
                song.chart_path.as_deref().unwrap_or("no path")
            );
        }
        for song in &output.matches {
            println!(
                "{}: {} - {} ({})",
                song.chart_fingerprint(),
                song.artist().unwrap_or("Unknown Artist"),
                song.display_title(),
                song.chart_path.display()
            );
        }
    }
    Ok(())
}
