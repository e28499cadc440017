//! `song.ini` metadata parsing.

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use encoding_rs::WINDOWS_1252;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

pub const SONG_INI: &str = "song.ini";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Display metadata read from the `[song]` section of `song.ini`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongMetadata {
    pub name: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub year: Option<String>,
    pub charter: Option<String>,
    pub song_length_ms: Option<u64>,
}

impl SongMetadata {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Parse `song.ini` content. Returns `None` when there is no `[song]`
    /// section or it carries none of the known keys.
    pub fn parse(content: &str) -> Option<Self> {
        let mut in_song = false;
        let mut found_section = false;
        let mut values: Vec<(String, String)> = Vec::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }

            if let Some(section) = line.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
                in_song = section.trim().eq_ignore_ascii_case("song");
                found_section |= in_song;
                continue;
            }

            if !in_song {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let value = value.trim();
                if !value.is_empty() {
                    values.push((key.trim().to_ascii_lowercase(), value.to_string()));
                }
            }
        }

        if !found_section {
            return None;
        }

        let lookup = |aliases: &[&str]| -> Option<String> {
            aliases.iter().find_map(|alias| {
                values
                    .iter()
                    .find(|(key, _)| key == alias)
                    .map(|(_, value)| value.clone())
            })
        };

        let metadata = Self {
            name: lookup(&["name", "title", "song"]),
            artist: lookup(&["artist", "frets"]),
            album: lookup(&["album"]),
            genre: lookup(&["genre"]),
            year: lookup(&["year"]),
            charter: lookup(&["charter", "frets", "modchart"]),
            song_length_ms: lookup(&["song_length"]).and_then(|v| v.parse().ok()),
        };

        (!metadata.is_empty()).then_some(metadata)
    }

    /// Read and parse a `song.ini` file.
    ///
    /// Files that are not valid UTF-8 are decoded as Windows-1252, which is
    /// what older chart editors write.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        let bytes = fs::read(path.as_ref())?;
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);

        let content = match std::str::from_utf8(bytes) {
            Ok(s) => Cow::Borrowed(s),
            Err(_) => {
                debug!(
                    "{} is not UTF-8, decoding as Windows-1252",
                    path.as_ref().display()
                );
                let (decoded, _, _) = WINDOWS_1252.decode(bytes);
                decoded
            }
        };

        Ok(Self::parse(&content))
    }
}
