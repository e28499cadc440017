//! Export formats for decoded score data.

mod console;

pub use console::{format_change_console, format_console_summary, format_number};

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::game::{Difficulty, Instrument};
use crate::library::SongLibrary;
use crate::scoredata::{InstrumentScore, SongScoreRecord};

/// One row per chart and instrument, with names resolved for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreEntry {
    pub chart_hash: String,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub charter: Option<String>,
    pub instrument_id: u16,
    pub instrument: String,
    pub difficulty: u8,
    pub difficulty_name: String,
    pub score: u32,
    pub stars: u8,
    pub notes_hit: u16,
    pub notes_total: u16,
    /// Rounded to two decimals; `None` when no note data was recorded
    pub completion_percent: Option<f64>,
    pub play_count: u32,
}

impl ScoreEntry {
    pub fn new(
        record: &SongScoreRecord,
        entry: &InstrumentScore,
        library: Option<&SongLibrary>,
    ) -> Self {
        let song = library.and_then(|lib| lib.lookup(&record.chart_fingerprint));

        Self {
            chart_hash: record.chart_fingerprint.to_hex(),
            title: song.map(|s| s.title.to_string()),
            artist: song.and_then(|s| s.artist).map(str::to_string),
            charter: song.and_then(|s| s.charter).map(str::to_string),
            instrument_id: entry.instrument_id,
            instrument: Instrument::label(entry.instrument_id),
            difficulty: entry.difficulty,
            difficulty_name: Difficulty::label(entry.difficulty),
            score: entry.score,
            stars: entry.stars,
            notes_hit: entry.notes_hit,
            notes_total: entry.notes_total,
            completion_percent: entry
                .completion_percent()
                .map(|pct| (pct * 100.0).round() / 100.0),
            play_count: record.aggregate_play_count,
        }
    }

    /// Short hash, as shown when the song isn't in the library
    pub fn short_hash(&self) -> &str {
        &self.chart_hash[..self.chart_hash.len().min(8)]
    }
}

/// Expand records into one entry per instrument, in file order.
pub fn flatten(records: &[SongScoreRecord], library: Option<&SongLibrary>) -> Vec<ScoreEntry> {
    records
        .iter()
        .flat_map(|record| {
            record
                .instruments
                .iter()
                .map(move |entry| ScoreEntry::new(record, entry, library))
        })
        .collect()
}

pub fn format_tsv_header() -> String {
    [
        "chart_hash",
        "title",
        "artist",
        "charter",
        "instrument",
        "difficulty",
        "score",
        "stars",
        "notes_hit",
        "notes_total",
        "completion",
        "play_count",
    ]
    .join("\t")
}

pub fn format_tsv_row(entry: &ScoreEntry) -> String {
    let text = |value: &Option<String>| value.as_deref().map(sanitize_tsv).unwrap_or_default();

    [
        entry.chart_hash.clone(),
        text(&entry.title),
        text(&entry.artist),
        text(&entry.charter),
        entry.instrument.clone(),
        entry.difficulty_name.clone(),
        entry.score.to_string(),
        entry.stars.to_string(),
        entry.notes_hit.to_string(),
        entry.notes_total.to_string(),
        entry
            .completion_percent
            .map(|pct| format!("{:.2}", pct))
            .unwrap_or_else(|| "-".to_string()),
        entry.play_count.to_string(),
    ]
    .join("\t")
}

/// Tabs and line breaks in metadata would break the column layout
fn sanitize_tsv(value: &str) -> String {
    value.replace(['\t', '\r', '\n'], " ")
}

pub fn generate_tsv(entries: &[ScoreEntry]) -> String {
    let mut lines = Vec::with_capacity(entries.len() + 1);
    lines.push(format_tsv_header());
    lines.extend(entries.iter().map(format_tsv_row));
    lines.join("\n")
}

pub fn generate_json(entries: &[ScoreEntry]) -> Result<String> {
    Ok(serde_json::to_string_pretty(entries)?)
}

pub fn export_tsv<P: AsRef<Path>>(path: P, entries: &[ScoreEntry]) -> Result<()> {
    fs::write(path, generate_tsv(entries))?;
    Ok(())
}

pub fn export_json<P: AsRef<Path>>(path: P, entries: &[ScoreEntry]) -> Result<()> {
    fs::write(path, generate_json(entries)?)?;
    Ok(())
}
