//! Export command: write every score as TSV or JSON.

use std::path::Path;

use anyhow::Result;
use chscore_core::export::{export_json, export_tsv, flatten, generate_json, generate_tsv};

use crate::cli::ExportFormat;
use crate::cli_utils;

pub fn run(
    scoredata: &Path,
    songs: Option<&Path>,
    song_cache: Option<&Path>,
    output: Option<&Path>,
    format: ExportFormat,
    partial: bool,
) -> Result<()> {
    let records = cli_utils::read_scoredata(scoredata, partial)?;
    eprintln!("Loaded {} songs from {}", records.len(), scoredata.display());

    let library = cli_utils::load_library(songs, song_cache)?;
    let entries = flatten(&records, library.as_ref());

    match (output, format) {
        (Some(path), ExportFormat::Tsv) => export_tsv(path, &entries)?,
        (Some(path), ExportFormat::Json) => export_json(path, &entries)?,
        (None, ExportFormat::Tsv) => println!("{}", generate_tsv(&entries)),
        (None, ExportFormat::Json) => println!("{}", generate_json(&entries)?),
    }
    if let Some(path) = output {
        eprintln!("Exported {} entries to: {}", entries.len(), path.display());
    }

    Ok(())
}
