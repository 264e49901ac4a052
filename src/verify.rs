//! Correctness verification gate
//!
//! Before any timing run, both candidate listings are checked against a
//! trusted `ls -A` capture of the fixture directory. Timing numbers from an
//! implementation that lists the wrong entries are meaningless, so the first
//! mismatch aborts the whole harness. The gate reruns at every fixture size:
//! growing the directory can expose size-dependent bugs that a single check
//! against a small directory would miss.

use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result};
use thiserror::Error;

use crate::record::Variant;

/// A candidate listing that disagreed with the reference capture.
#[derive(Debug, Error)]
#[error("listing mismatch: output of `{command}` differs from the reference listing")]
pub struct ListingMismatch {
    /// The exact candidate invocation that failed verification
    pub command: String,
}

/// Capture the trusted reference listing of `dir`: one basename per line,
/// `.` and `..` excluded, sorted for order-insensitive comparison.
pub fn reference_listing(dir: &Path) -> Result<Vec<Vec<u8>>> {
    let output = Command::new("ls")
        .arg("-A")
        .arg(dir)
        .output()
        .context("failed to run reference listing command `ls`")?;
    if !output.status.success() {
        anyhow::bail!(
            "reference listing command `ls -A {}` failed: {}",
            dir.display(),
            output.status
        );
    }
    Ok(split_listing(&output.stdout))
}

/// Verify both candidates against a single reference capture of `dir`.
///
/// The reference is captured once per fixture size, not once per candidate.
pub fn verify_all(binary: &Path, dir: &Path) -> Result<()> {
    let reference = reference_listing(dir)?;
    for variant in Variant::ALL {
        let candidate = candidate_listing(binary, variant, dir)?;
        if candidate != reference {
            return Err(ListingMismatch {
                command: render_command(binary, variant, dir),
            }
            .into());
        }
    }
    Ok(())
}

/// Run one candidate in print-listing mode and return its sorted lines.
fn candidate_listing(binary: &Path, variant: Variant, dir: &Path) -> Result<Vec<Vec<u8>>> {
    let mut cmd = Command::new(binary);
    cmd.arg("-p");
    if let Some(flag) = variant.flag() {
        cmd.arg(flag);
    }
    cmd.arg(dir);
    let output = cmd
        .output()
        .with_context(|| format!("failed to run listing binary {}", binary.display()))?;
    Ok(split_listing(&output.stdout))
}

/// Render a candidate invocation for mismatch diagnostics.
fn render_command(binary: &Path, variant: Variant, dir: &Path) -> String {
    let mut parts = vec![binary.display().to_string(), "-p".to_string()];
    if let Some(flag) = variant.flag() {
        parts.push(flag.to_string());
    }
    parts.push(dir.display().to_string());
    parts.join(" ")
}

/// Split raw listing output into sorted lines.
///
/// Neither the reference command nor the candidates guarantee an ordering,
/// only that every entry appears on its own line, so comparison happens on
/// the sorted multiset of lines, byte for byte.
fn split_listing(raw: &[u8]) -> Vec<Vec<u8>> {
    let mut lines: Vec<Vec<u8>> = raw
        .split(|&b| b == b'\n')
        .filter(|line| !line.is_empty())
        .map(|line| line.to_vec())
        .collect();
    lines.sort_unstable();
    lines
}
