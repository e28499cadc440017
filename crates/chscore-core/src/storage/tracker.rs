use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::scoredata::{ChartFingerprint, InstrumentScore, SongScoreRecord};

/// Identity of one personal best: chart + instrument + difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScoreKey {
    pub chart: ChartFingerprint,
    pub instrument_id: u16,
    pub difficulty: u8,
}

impl ScoreKey {
    pub fn new(record: &SongScoreRecord, entry: &InstrumentScore) -> Self {
        Self {
            chart: record.chart_fingerprint,
            instrument_id: entry.instrument_id,
            difficulty: entry.difficulty,
        }
    }
}

impl fmt::Display for ScoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.chart, self.instrument_id, self.difficulty)
    }
}

impl FromStr for ScoreKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidScoreKey(s.to_string());
        let mut parts = s.split(':');
        let (Some(chart), Some(instrument), Some(difficulty), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        Ok(Self {
            chart: chart.parse().map_err(|_| invalid())?,
            instrument_id: instrument.parse().map_err(|_| invalid())?,
            difficulty: difficulty.parse().map_err(|_| invalid())?,
        })
    }
}

/// Iterate every (key, entry) pair of a decoded file in file order
pub fn score_entries(
    records: &[SongScoreRecord],
) -> impl Iterator<Item = (ScoreKey, &SongScoreRecord, &InstrumentScore)> {
    records.iter().flat_map(|record| {
        record
            .instruments
            .iter()
            .map(move |entry| (ScoreKey::new(record, entry), record, entry))
    })
}

/// Scores seen in one decode pass, used to spot entries that changed since
/// the previous pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    scores: HashMap<ScoreKey, u32>,
}

impl Snapshot {
    pub fn from_records(records: &[SongScoreRecord]) -> Self {
        let mut scores = HashMap::new();
        for (key, _, entry) in score_entries(records) {
            scores
                .entry(key)
                .and_modify(|s: &mut u32| *s = (*s).max(entry.score))
                .or_insert(entry.score);
        }
        Self { scores }
    }

    pub fn get(&self, key: &ScoreKey) -> Option<u32> {
        self.scores.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChangeKind {
    /// First score ever seen for this key
    New,
    /// Beat the stored personal best
    Improved { previous: u32 },
    /// Changed since the last pass without beating the best
    NotImproved { best: u32 },
}

impl ChangeKind {
    pub fn is_personal_best(&self) -> bool {
        matches!(self, Self::New | Self::Improved { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreChange {
    pub key: ScoreKey,
    pub entry: InstrumentScore,
    pub play_count: u32,
    pub kind: ChangeKind,
}

impl ScoreChange {
    pub fn score(&self) -> u32 {
        self.entry.score
    }
}

#[derive(Serialize, Deserialize)]
struct TrackerFile {
    score_values: BTreeMap<String, u32>,
    #[serde(default)]
    last_updated: Option<DateTime<Utc>>,
}

/// Personal-best store, persisted as JSON between runs.
#[derive(Debug, Clone, Default)]
pub struct Tracker {
    db: HashMap<ScoreKey, u32>,
}

impl Tracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a tracker state file. A missing file yields an empty tracker;
    /// entries with malformed keys are skipped.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No tracker state at {}, starting fresh", path.display());
                return Ok(Self::new());
            }
            Err(e) => return Err(e.into()),
        };

        let file: TrackerFile = serde_json::from_str(&content)?;
        let mut tracker = Self::new();
        for (key, score) in file.score_values {
            match key.parse::<ScoreKey>() {
                Ok(key) => {
                    tracker.db.insert(key, score);
                }
                Err(e) => warn!("Skipping tracker entry: {}", e),
            }
        }

        info!("Loaded {} known scores from {}", tracker.len(), path.display());
        Ok(tracker)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = TrackerFile {
            score_values: self
                .db
                .iter()
                .map(|(key, score)| (key.to_string(), *score))
                .collect(),
            last_updated: Some(Utc::now()),
        };
        fs::write(path, serde_json::to_string_pretty(&file)?)?;
        debug!("Saved {} scores to {}", self.len(), path.display());
        Ok(())
    }

    pub fn best(&self, key: &ScoreKey) -> Option<u32> {
        self.db.get(key).copied()
    }

    pub fn is_new_or_improved(&self, key: &ScoreKey, score: u32) -> bool {
        self.best(key).is_none_or(|best| score > best)
    }

    /// Store `score` if it beats the current best. Returns whether it did.
    pub fn record(&mut self, key: ScoreKey, score: u32) -> bool {
        if !self.is_new_or_improved(&key, score) {
            return false;
        }
        self.db.insert(key, score);
        true
    }

    /// Seed the tracker from an existing file so old scores aren't reported
    /// as new on the first run. Keeps whichever score is higher and returns
    /// how many entries were stored.
    pub fn initialize_from(&mut self, records: &[SongScoreRecord]) -> usize {
        score_entries(records)
            .filter(|(key, _, entry)| self.record(*key, entry.score))
            .count()
    }

    /// Compare a fresh decode against the previous pass and the stored bests.
    ///
    /// Only entries whose score differs from `previous` are reported. New
    /// and improved scores are recorded as the new best.
    pub fn apply(&mut self, records: &[SongScoreRecord], previous: &Snapshot) -> Vec<ScoreChange> {
        let mut changes = Vec::new();

        for (key, record, entry) in score_entries(records) {
            if previous.get(&key) == Some(entry.score) {
                continue;
            }

            let kind = match self.best(&key) {
                None => ChangeKind::New,
                Some(best) if entry.score > best => ChangeKind::Improved { previous: best },
                Some(best) => ChangeKind::NotImproved { best },
            };
            if kind.is_personal_best() {
                self.db.insert(key, entry.score);
            }

            changes.push(ScoreChange {
                key,
                entry: *entry,
                play_count: record.aggregate_play_count,
                kind,
            });
        }

        changes
    }

    pub fn len(&self) -> usize {
        self.db.len()
    }

    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ScoreKey, &u32)> {
        self.db.iter()
    }
}
