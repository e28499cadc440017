//! CLI argument definitions for chscore.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "chscore")]
#[command(about = "Clone Hero score data reader", version)]
pub struct Args {
    /// Settings file (default: <config dir>/chscore/config.toml)
    #[arg(long, env = "CHSCORE_CONFIG", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Show progress logs
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Decode scoredata.bin and print every record
    Dump {
        /// Path to scoredata.bin
        #[arg(long, env = "CHSCORE_SCOREDATA", value_name = "FILE")]
        scoredata: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Only print the file header
        #[arg(long)]
        header_only: bool,
        /// Keep records decoded before a truncation instead of failing
        #[arg(long)]
        partial: bool,
    },
    /// Fingerprint chart files
    Hash {
        /// Chart files (notes.chart / notes.mid)
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Find installed songs by chart hash or hash prefix
    Resolve {
        /// Hex chart hashes or prefixes
        #[arg(required = true)]
        hashes: Vec<String>,
        /// Songs folder to scan
        #[arg(long, env = "CHSCORE_SONGS", value_name = "DIR")]
        songs: Option<PathBuf>,
        /// Game's songcache.bin, used for titles the songs folder lacks
        /// (default: next to scoredata.bin)
        #[arg(long, env = "CHSCORE_SONG_CACHE", value_name = "FILE")]
        song_cache: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Export all scores
    Export {
        /// Path to scoredata.bin
        #[arg(long, env = "CHSCORE_SCOREDATA", value_name = "FILE")]
        scoredata: Option<PathBuf>,
        /// Songs folder used to resolve titles
        #[arg(long, env = "CHSCORE_SONGS", value_name = "DIR")]
        songs: Option<PathBuf>,
        /// Game's songcache.bin, used for titles the songs folder lacks
        /// (default: next to scoredata.bin)
        #[arg(long, env = "CHSCORE_SONG_CACHE", value_name = "FILE")]
        song_cache: Option<PathBuf>,
        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Output format
        #[arg(short, long, value_enum, default_value = "tsv")]
        format: ExportFormat,
        /// Keep records decoded before a truncation instead of failing
        #[arg(long)]
        partial: bool,
    },
    /// Watch scoredata.bin and report new personal bests
    Watch {
        /// Path to scoredata.bin
        #[arg(long, env = "CHSCORE_SCOREDATA", value_name = "FILE")]
        scoredata: Option<PathBuf>,
        /// Songs folder used to resolve titles
        #[arg(long, env = "CHSCORE_SONGS", value_name = "DIR")]
        songs: Option<PathBuf>,
        /// Game's songcache.bin, used for titles the songs folder lacks
        /// (default: next to scoredata.bin)
        #[arg(long, env = "CHSCORE_SONG_CACHE", value_name = "FILE")]
        song_cache: Option<PathBuf>,
        /// Personal-best state file
        #[arg(long, env = "CHSCORE_STATE", value_name = "FILE")]
        state: Option<PathBuf>,
        /// Poll interval in seconds
        #[arg(long, env = "CHSCORE_POLL_INTERVAL")]
        interval: Option<u64>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Tsv,
    Json,
}
