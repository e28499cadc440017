//! Chart identity hashing.
//!
//! A chart is identified two ways: by the legacy 128-bit digest the game keys
//! its score file with, and by the BLAKE3 digest of the online chart catalog.
//! Both are computed over the file's raw bytes.

mod digest;

pub use digest::*;

/// Chart file names the game loads from a song folder, in preference order.
pub const CHART_FILE_NAMES: [&str; 3] = ["notes.chart", "notes.mid", "notes.midi"];

/// Preference rank of a file name among [`CHART_FILE_NAMES`] (lower wins),
/// or `None` if it is not a chart file. Matching ignores ASCII case.
pub fn chart_file_rank(file_name: &str) -> Option<usize> {
    CHART_FILE_NAMES
        .iter()
        .position(|name| name.eq_ignore_ascii_case(file_name))
}

pub fn is_chart_file(file_name: &str) -> bool {
    chart_file_rank(file_name).is_some()
}
