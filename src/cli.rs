//! CLI argument parsing for dirbench

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Default benchmark sweep, ascending entry counts.
pub const DEFAULT_SIZES: &str = "0,16,256,4096,10000,1000000,2000000";

#[derive(Parser, Debug)]
#[command(name = "dirbench")]
#[command(version)]
#[command(about = "Benchmark harness comparing directory-listing implementations", long_about = None)]
pub struct Cli {
    /// Enable debug logging to stderr
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the benchmark sweep, one record line per fixture size on stdout
    Run {
        /// Fixture directory (defaults to a temporary directory destroyed at exit)
        fixture_dir: Option<PathBuf>,

        /// Listing binary under test
        #[arg(long, value_name = "PATH", default_value = "test-getdents64")]
        binary: PathBuf,

        /// Ascending target entry counts
        #[arg(long, value_name = "N,N,..", value_delimiter = ',', default_value = DEFAULT_SIZES)]
        sizes: Vec<u64>,

        /// Benchmark duration per timed run, in seconds
        #[arg(long, value_name = "SECS", default_value = "10")]
        duration: u64,
    },

    /// Render a Markdown report from a record stream
    Report {
        /// Record stream file (defaults to standard input)
        file: Option<PathBuf>,
    },
}
