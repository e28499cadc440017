//! Console output formatting with colored display

use std::fmt::Write as _;

use owo_colors::OwoColorize;

use crate::game::{Difficulty, Instrument};
use crate::library::SongLibrary;
use crate::scoredata::InstrumentScore;
use crate::storage::{ChangeKind, ScoreChange};

use super::ScoreEntry;

/// One-line colored summary of a flattened entry
///
/// `Title [X Lead Guitar] 147,392 ★★★★★ 66.67% (12 plays)`
pub fn format_console_summary(entry: &ScoreEntry) -> String {
    let title = entry.title.as_deref().unwrap_or(entry.short_hash());
    let completion = entry
        .completion_percent
        .map(|pct| format!("{:.2}%", pct))
        .unwrap_or_else(|| "-".to_string());

    format!(
        "{} [{} {}] {} {} {} ({} plays)",
        title.bold(),
        format_colored_difficulty(entry.difficulty),
        entry.instrument,
        format_number(entry.score),
        format_stars(entry.stars),
        completion,
        entry.play_count
    )
}

/// Boxed report for a new or improved score seen by `watch`
pub fn format_change_console(change: &ScoreChange, library: Option<&SongLibrary>) -> String {
    let mut output = String::new();

    let song = library.and_then(|lib| lib.lookup(&change.key.chart));
    let title = song
        .map(|s| s.title.to_string())
        .unwrap_or_else(|| change.key.chart.short());
    let entry = &change.entry;

    let title_content = format!(
        "  {} [{} {}]",
        title.bold(),
        format_colored_difficulty(entry.difficulty),
        Instrument::label(entry.instrument_id)
    );
    let border_width = (title.chars().count() + 20).max(50);
    let border = "━".repeat(border_width);
    let border_dim = border.dimmed();

    let score_str = match change.kind {
        ChangeKind::New => format!("{} ({})", format_number(entry.score), "NEW".cyan()),
        ChangeKind::Improved { previous } => format!(
            "{} ({})",
            format_number(entry.score),
            format!("+{}", format_number(entry.score.saturating_sub(previous))).green()
        ),
        ChangeKind::NotImproved { best } => format!(
            "{} ({})",
            format_number(entry.score),
            format!("best {}", format_number(best)).dimmed()
        ),
    };

    let _ = writeln!(output, "{}", border_dim);
    let _ = writeln!(output, "{}", title_content);
    if let Some(artist) = song.and_then(|s| s.artist) {
        let _ = writeln!(output, "  {}", artist.dimmed());
    }
    let _ = writeln!(output, "{}", border_dim);
    let _ = writeln!(output, "  SCORE  : {}", score_str);
    let _ = writeln!(output, "  STARS  : {}", format_stars(entry.stars));
    let _ = writeln!(output, "  NOTES  : {}", format_notes(entry));
    let _ = writeln!(output, "  PLAYS  : {}", change.play_count);
    let _ = write!(output, "{}", border_dim);

    output
}

/// Group digits with commas: `1234567` -> `1,234,567`
pub fn format_number(value: u32) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn format_notes(entry: &InstrumentScore) -> String {
    match entry.completion_percent() {
        Some(pct) => format!("{}/{} ({:.2}%)", entry.notes_hit, entry.notes_total, pct),
        None => "-".to_string(),
    }
}

fn format_colored_difficulty(difficulty: u8) -> String {
    match Difficulty::from_u8(difficulty) {
        Some(d) => {
            let name = d.short_name();
            match d {
                Difficulty::Easy => name.green().to_string(),
                Difficulty::Medium => name.yellow().to_string(),
                Difficulty::Hard => name.red().to_string(),
                Difficulty::Expert => name.purple().to_string(),
            }
        }
        None => difficulty.to_string().dimmed().to_string(),
    }
}

fn format_stars(stars: u8) -> String {
    if stars >= InstrumentScore::GOLD_STARS {
        "★".repeat(stars as usize).truecolor(255, 200, 0).bold().to_string()
    } else {
        format!("{}{}", "★".repeat(stars as usize), "☆".repeat(5 - stars as usize).dimmed())
    }
}
