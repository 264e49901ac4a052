//! Timed benchmark execution and statistics extraction
//!
//! Runs the listing binary in benchmark mode and scans whatever it printed
//! for `<name>: <value> ms` pairs. The binary is free to surround its
//! summary with diagnostic output; anything that does not match the pattern
//! is ignored.

use std::path::Path;
use std::process::Command;
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::{Context, Result};
use regex::Regex;

use crate::record::{StatsRecord, Variant};

/// Matches one reported statistic, e.g. `AVG: 1.234 ms`.
fn stats_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"([A-Za-z_]+):\s*([0-9]+(?:\.[0-9]+)?(?:[eE][+-]?[0-9]+)?)\s*ms")
            .expect("stats pattern is a valid regex")
    })
}

/// Run one candidate in timed mode under `budget` and extract its
/// self-reported statistics.
///
/// The binary's stderr is merged into its stdout before scanning: the
/// summary line goes to stderr while listing output goes to stdout, and the
/// scanner does not care which stream a statistic arrived on. Malformed or
/// empty output degrades to an empty record, never a harness failure.
pub fn run_timed(
    binary: &Path,
    variant: Variant,
    dir: &Path,
    budget: Duration,
) -> Result<StatsRecord> {
    let mut cmd = Command::new(binary);
    if let Some(flag) = variant.flag() {
        cmd.arg(flag);
    }
    cmd.arg("-d").arg(budget.as_secs().to_string()).arg(dir);

    let output = cmd
        .output()
        .with_context(|| format!("failed to run listing binary {}", binary.display()))?;

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));

    let stats = scan_stats(&combined);
    tracing::debug!(variant = variant.key(), count = stats.len(), "timed run complete");
    Ok(stats)
}

/// Scan free-form benchmark output for `<name>: <value> ms` pairs.
///
/// Statistic names are lowercased so the binary's `AVG:`/`MAX:`/`MIN:`
/// summary lands on the report's `avg`/`max`/`min` sections; values are kept
/// exactly as reported, in milliseconds. A repeated name keeps the last
/// occurrence.
pub fn scan_stats(text: &str) -> StatsRecord {
    let mut stats = StatsRecord::new();
    for capture in stats_pattern().captures_iter(text) {
        if let Ok(value) = capture[2].parse::<f64>() {
            stats.insert(capture[1].to_lowercase(), value);
        }
    }
    stats
}
