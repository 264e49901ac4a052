//! Run driver: the populate, verify, execute, emit loop
//!
//! One pass per fixture size, strictly sequential so measurements do not
//! contend for CPU caches or disk bandwidth. The record stream is the only
//! thing written to `out`; all progress goes to stderr, so stdout can be
//! redirected to a file and stream-parsed later.

use std::collections::BTreeMap;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};

use crate::executor;
use crate::fixture;
use crate::record::{BenchmarkResult, Variant};
use crate::verify;

/// Static configuration for one harness run, threaded through all stages.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Listing binary under test
    pub binary: PathBuf,
    /// Fixture directory, owned exclusively by the harness for the run
    pub fixture_dir: PathBuf,
    /// Ascending target entry counts
    pub sizes: Vec<u64>,
    /// Wall-clock budget handed to the binary per timed run
    pub budget: Duration,
}

/// Probe for the listing binary.
///
/// Runs before any fixture work so a missing binary fails with a clear
/// diagnostic instead of surfacing mid-sweep.
pub fn check_binary(binary: &Path) -> Result<()> {
    match Command::new(binary)
        .arg("-h")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
    {
        Ok(_) => Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            anyhow::bail!("listing binary not found: {}", binary.display())
        }
        Err(err) => Err(err)
            .with_context(|| format!("failed to probe listing binary {}", binary.display())),
    }
}

/// Execute the full benchmark sweep, writing one record line per fixture
/// size to `out`.
///
/// Verification gates every size: no record is emitted for a size whose
/// candidates were not first validated against the reference listing, and a
/// mismatch aborts the remaining sweep entirely.
pub fn run(config: &RunConfig, out: &mut impl Write) -> Result<()> {
    for &target in &config.sizes {
        let files = fixture::populate(&config.fixture_dir, target)
            .with_context(|| format!("failed to grow fixture directory to {target} entries"))?;
        eprintln!("[dirbench: {files} files] verifying listings");
        verify::verify_all(&config.binary, &config.fixture_dir)?;

        let mut stats = BTreeMap::new();
        for variant in Variant::ALL {
            eprintln!("[dirbench: {files} files] benchmarking {}", variant.label());
            let record =
                executor::run_timed(&config.binary, variant, &config.fixture_dir, config.budget)?;
            stats.insert(variant.key().to_string(), record);
        }

        let result = BenchmarkResult { files, stats };
        writeln!(out, "{}", result.to_json()?).context("failed to write record stream")?;
    }

    Ok(())
}
