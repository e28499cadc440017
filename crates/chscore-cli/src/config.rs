//! Settings file and default locations.
//!
//! Resolution order for every path is: command-line flag (or its `CHSCORE_*`
//! env var), then `config.toml`, then the platform default.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use chscore_core::library::SONG_CACHE_FILE;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const SCOREDATA_FILE: &str = "scoredata.bin";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 2;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub scoredata_path: Option<PathBuf>,
    pub songs_path: Option<PathBuf>,
    pub song_cache_path: Option<PathBuf>,
    pub state_path: Option<PathBuf>,
    pub poll_interval_secs: Option<u64>,
}

impl Settings {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("chscore").join("config.toml"))
    }

    /// Load settings from `path`, or from [`Settings::default_path`].
    ///
    /// A missing default file yields defaults; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => match Self::default_path() {
                Some(path) => (path, false),
                None => return Ok(Self::default()),
            },
        };

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if !explicit && e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No settings file at {}", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()));
            }
        };

        let settings =
            Self::parse(&content).with_context(|| format!("Invalid settings in {}", path.display()))?;
        info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn scoredata_path(&self, flag: Option<PathBuf>) -> Result<PathBuf> {
        if let Some(path) = flag.or_else(|| self.scoredata_path.clone()) {
            return Ok(path);
        }
        match game_data_dir() {
            Some(dir) => Ok(dir.join(SCOREDATA_FILE)),
            None => bail!("Cannot locate the game data folder, pass --scoredata"),
        }
    }

    /// Songs folder, if one is configured; there is no platform default.
    pub fn songs_path(&self, flag: Option<PathBuf>) -> Option<PathBuf> {
        flag.or_else(|| self.songs_path.clone())
    }

    /// Game's song cache: flag, then `config.toml`, then the folder holding
    /// `scoredata`, then the game data folder.
    pub fn song_cache_path(
        &self,
        flag: Option<PathBuf>,
        scoredata: Option<&Path>,
    ) -> Option<PathBuf> {
        flag.or_else(|| self.song_cache_path.clone()).or_else(|| {
            scoredata
                .and_then(Path::parent)
                .map(Path::to_path_buf)
                .or_else(game_data_dir)
                .map(|dir| dir.join(SONG_CACHE_FILE))
        })
    }

    pub fn state_path(&self, flag: Option<PathBuf>) -> Result<PathBuf> {
        if let Some(path) = flag.or_else(|| self.state_path.clone()) {
            return Ok(path);
        }
        let data_dir = dirs::data_dir().context("Failed to determine data directory")?;
        Ok(data_dir.join("chscore").join("tracker.json"))
    }

    /// Poll interval, at least one second
    pub fn poll_interval(&self, flag: Option<u64>) -> Duration {
        let secs = flag
            .or(self.poll_interval_secs)
            .unwrap_or(DEFAULT_POLL_INTERVAL_SECS);
        Duration::from_secs(secs.max(1))
    }
}

/// Folder the game writes `scoredata.bin` into on this platform
pub fn game_data_dir() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    let dir = if cfg!(target_os = "windows") {
        home.join("AppData")
            .join("LocalLow")
            .join("srylain Inc_")
            .join("Clone Hero")
    } else if cfg!(target_os = "macos") {
        home.join("Library")
            .join("Application Support")
            .join("com.srylain.CloneHero")
    } else {
        home.join(".config")
            .join("unity3d")
            .join("srylain Inc_")
            .join("Clone Hero")
    };
    Some(dir)
}
