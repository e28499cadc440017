//! Watch command: follow scoredata.bin and report new personal bests.
//!
//! The game rewrites the whole file after each song. Each time the
//! modification time moves, the file is decoded again and compared with the
//! previous pass; entries whose score changed are checked against the tracker.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};
use chscore_core::export::format_change_console;
use chscore_core::{ScoreChange, Snapshot, SongScoreRecord, Tracker};
use tracing::{debug, info, warn};

use crate::cli_utils;
use crate::shutdown::ShutdownSignal;

/// Time given to the game to finish writing before the file is read
const SETTLE_DELAY: Duration = Duration::from_millis(500);

pub struct WatchOptions {
    pub scoredata: PathBuf,
    pub songs: Option<PathBuf>,
    pub song_cache: Option<PathBuf>,
    pub state: PathBuf,
    pub interval: Duration,
}

pub fn run(options: &WatchOptions) -> Result<()> {
    let shutdown = ShutdownSignal::install_ctrlc()?;

    let current_version = env!("CARGO_PKG_VERSION");
    println!("chscore v{}", current_version);

    let library =
        cli_utils::load_library(options.songs.as_deref(), options.song_cache.as_deref())?;
    let tracker = Tracker::load(&options.state)
        .with_context(|| format!("Failed to load {}", options.state.display()))?;
    let mut watcher = Watcher::new(&options.scoredata, tracker);

    watcher.start();
    watcher.save_if_dirty(&options.state)?;

    println!(
        "Watching {} (Press Ctrl+C to stop)",
        options.scoredata.display()
    );

    while !shutdown.wait(options.interval) {
        if !watcher.has_changed() {
            continue;
        }
        if shutdown.wait(SETTLE_DELAY) {
            break;
        }

        let changes = match watcher.poll() {
            Ok(changes) => changes,
            Err(e) => {
                warn!("{:#}", e);
                continue;
            }
        };

        for change in &changes {
            println!("{}", format_change_console(change, library.as_ref()));
        }
        watcher.save_if_dirty(&options.state)?;
    }

    watcher.save(&options.state)?;
    info!("Stopped watching");
    Ok(())
}

/// Decode state carried between polls
struct Watcher<'a> {
    path: &'a Path,
    tracker: Tracker,
    /// Scores from the last complete decode; `None` until one succeeds
    snapshot: Option<Snapshot>,
    last_modified: Option<SystemTime>,
    /// Tracker holds scores not yet written to the state file
    dirty: bool,
}

impl<'a> Watcher<'a> {
    fn new(path: &'a Path, tracker: Tracker) -> Self {
        Self {
            path,
            tracker,
            snapshot: None,
            last_modified: None,
            dirty: false,
        }
    }

    fn modified(&self) -> Option<SystemTime> {
        fs::metadata(self.path).and_then(|m| m.modified()).ok()
    }

    /// Take the current file as the baseline if it exists and decodes fully.
    ///
    /// Otherwise the baseline is taken by the first poll that decodes the
    /// whole file.
    fn start(&mut self) {
        if !self.path.is_file() {
            warn!("{} does not exist yet", self.path.display());
            return;
        }
        if let Err(e) = self.poll() {
            warn!("{:#}, waiting for a complete file", e);
        }
    }

    fn has_changed(&self) -> bool {
        match self.modified() {
            Some(modified) => self.last_modified != Some(modified),
            None => false,
        }
    }

    /// Decode the file and report entries that changed since the last pass.
    ///
    /// The first complete decode only seeds the tracker and reports nothing.
    /// A failed decode leaves the baseline untouched so the next poll retries.
    fn poll(&mut self) -> Result<Vec<ScoreChange>> {
        let modified = self.modified();
        let records = cli_utils::read_scoredata(self.path, false)?;

        let changes = match self.snapshot.take() {
            Some(previous) => self.tracker.apply(&records, &previous),
            None => {
                self.seed(&records);
                Vec::new()
            }
        };
        if changes.iter().any(|c| c.kind.is_personal_best()) {
            self.dirty = true;
        }

        self.snapshot = Some(Snapshot::from_records(&records));
        self.last_modified = modified;
        debug!("{} changed entries", changes.len());
        Ok(changes)
    }

    /// Fold the baseline into the tracker without reporting it.
    fn seed(&mut self, records: &[SongScoreRecord]) {
        let stored = self.tracker.initialize_from(records);
        if stored > 0 {
            info!("Recorded {} scores from the existing file", stored);
            self.dirty = true;
        }
    }

    fn save_if_dirty(&mut self, path: &Path) -> Result<()> {
        if self.dirty {
            self.save(path)?;
            self.dirty = false;
        }
        Ok(())
    }

    fn save(&self, path: &Path) -> Result<()> {
        self.tracker
            .save(path)
            .with_context(|| format!("Failed to save {}", path.display()))
    }
}
