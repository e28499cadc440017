mod cli;
mod cli_utils;
mod commands;
mod config;
mod shutdown;

use anyhow::Result;
use clap::Parser;
use cli::{Args, Command};
use config::Settings;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();

    // RUST_LOG wins; otherwise warn, or info with -v
    let default_filter = if args.verbose {
        "chscore_cli=info,chscore_core=info"
    } else {
        "chscore_cli=warn,chscore_core=warn"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let settings = Settings::load(args.config.as_deref())?;

    match args.command {
        Command::Dump {
            scoredata,
            json,
            header_only,
            partial,
        } => commands::dump::run(&settings.scoredata_path(scoredata)?, json, header_only, partial),
        Command::Hash { files, json } => commands::hash::run(&files, json),
        Command::Resolve {
            hashes,
            songs,
            song_cache,
            json,
        } => commands::resolve::run(
            &hashes,
            settings.songs_path(songs).as_deref(),
            settings.song_cache_path(song_cache, None).as_deref(),
            json,
        ),
        Command::Export {
            scoredata,
            songs,
            song_cache,
            output,
            format,
            partial,
        } => {
            let scoredata = settings.scoredata_path(scoredata)?;
            commands::export::run(
                &scoredata,
                settings.songs_path(songs).as_deref(),
                settings.song_cache_path(song_cache, Some(&scoredata)).as_deref(),
                output.as_deref(),
                format,
                partial,
            )
        }
        Command::Watch {
            scoredata,
            songs,
            song_cache,
            state,
            interval,
        } => {
            let scoredata = settings.scoredata_path(scoredata)?;
            commands::watch::run(&commands::watch::WatchOptions {
                song_cache: settings.song_cache_path(song_cache, Some(&scoredata)),
                scoredata,
                songs: settings.songs_path(songs),
                state: settings.state_path(state)?,
                interval: settings.poll_interval(interval),
            })
        }
    }
}
