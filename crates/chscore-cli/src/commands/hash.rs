//! Hash command: fingerprint chart files.

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chscore_core::chart::{ChartFingerprintPair, fingerprint_reader};
use serde::Serialize;

#[derive(Serialize)]
struct HashOutput<'a> {
    path: &'a PathBuf,
    #[serde(flatten)]
    fingerprints: ChartFingerprintPair,
    modern_digest_base64: String,
}

pub fn run(files: &[PathBuf], json: bool) -> Result<()> {
    let mut outputs = Vec::with_capacity(files.len());
    for path in files {
        let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        let fingerprints =
            fingerprint_reader(file).with_context(|| format!("Failed to read {}", path.display()))?;
        outputs.push(HashOutput {
            path,
            fingerprints,
            modern_digest_base64: fingerprints.modern_digest.to_base64_url(),
        });
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&outputs)?);
        return Ok(());
    }

    for output in &outputs {
        println!("{}", output.path.display());
        println!("  legacy : {}", output.fingerprints.legacy_digest);
        println!("  modern : {}", output.fingerprints.modern_digest);
        println!("  base64 : {}", output.modern_digest_base64);
    }
    Ok(())
}
