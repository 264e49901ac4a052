use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use dirbench::cli::{Cli, Commands};
use dirbench::{report, runner};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Execute the benchmark sweep and stream records to stdout.
fn run_command(
    fixture_dir: Option<PathBuf>,
    binary: PathBuf,
    sizes: Vec<u64>,
    duration: u64,
) -> Result<()> {
    if !sizes.windows(2).all(|pair| pair[0] < pair[1]) {
        anyhow::bail!("--sizes must be strictly increasing, got {sizes:?}");
    }

    // Missing binary is a startup failure, before any fixture work.
    runner::check_binary(&binary)?;

    // A caller-supplied fixture directory is left in place after the run;
    // the fallback tempdir lives until the guard drops at process exit.
    let mut tempdir_guard: Option<tempfile::TempDir> = None;
    let fixture_dir = match fixture_dir {
        Some(dir) => {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create fixture directory {}", dir.display()))?;
            dir
        }
        None => {
            let dir =
                tempfile::tempdir().context("failed to create temporary fixture directory")?;
            let path = dir.path().to_path_buf();
            tempdir_guard = Some(dir);
            path
        }
    };

    let config = runner::RunConfig {
        binary,
        fixture_dir,
        sizes,
        budget: Duration::from_secs(duration),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    runner::run(&config, &mut out)?;
    out.flush().context("failed to flush record stream")?;

    drop(tempdir_guard);
    Ok(())
}

/// Render a Markdown report from a record stream file or stdin.
fn report_command(file: Option<PathBuf>) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match file {
        Some(path) => {
            let file = File::open(&path)
                .with_context(|| format!("failed to open record stream {}", path.display()))?;
            report::render(BufReader::new(file), &mut out)
        }
        None => report::render(io::stdin().lock(), &mut out),
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.debug);

    match args.command {
        Commands::Run {
            fixture_dir,
            binary,
            sizes,
            duration,
        } => run_command(fixture_dir, binary, sizes, duration),
        Commands::Report { file } => report_command(file),
    }
}
