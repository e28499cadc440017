//! Dump command: decode scoredata.bin and print it.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chscore_core::export::{flatten, format_console_summary};
use chscore_core::scoredata::decode_header;
use serde_json::json;

use crate::cli_utils;

pub fn run(scoredata: &Path, json: bool, header_only: bool, partial: bool) -> Result<()> {
    if header_only {
        let bytes =
            fs::read(scoredata).with_context(|| format!("Failed to read {}", scoredata.display()))?;
        let header = decode_header(&bytes)?;
        if json {
            let value = json!({
                "magic": header.magic.iter().map(|b| format!("{:02x}", b)).collect::<String>(),
                "song_count": header.song_count,
                "file_size": bytes.len(),
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        } else {
            println!("Magic      : {:02X?}", header.magic);
            println!("Song count : {}", header.song_count);
            println!("File size  : {} bytes", bytes.len());
        }
        return Ok(());
    }

    let records = cli_utils::read_scoredata(scoredata, partial)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    let entries = flatten(&records, None);
    for entry in &entries {
        println!("{}", format_console_summary(entry));
    }
    eprintln!(
        "{} songs, {} instrument entries",
        records.len(),
        entries.len()
    );

    Ok(())
}
