mod tracker;

pub use tracker::{ChangeKind, ScoreChange, ScoreKey, Snapshot, Tracker, score_entries};
