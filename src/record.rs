//! Data model for the benchmark record stream

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Statistics self-reported by one candidate for one timed run, keyed by the
/// lowercased statistic name (`avg`, `max`, `min` at minimum). Values are
/// milliseconds, exactly as the binary printed them.
pub type StatsRecord = BTreeMap<String, f64>;

/// The two directory-listing implementations under comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// `std::fs::read_dir`, selected with the binary's `-s` flag
    Std,
    /// Direct `getdents64` syscalls, the binary's default
    Getdents,
}

impl Variant {
    /// Both variants, in report order (`Std` is the ratio numerator).
    pub const ALL: [Variant; 2] = [Variant::Std, Variant::Getdents];

    /// Key for this variant in the record stream.
    pub fn key(self) -> &'static str {
        match self {
            Variant::Std => "std",
            Variant::Getdents => "getdents",
        }
    }

    /// Implementation name shown in reports.
    pub fn label(self) -> &'static str {
        match self {
            Variant::Std => "std::fs::read_dir",
            Variant::Getdents => "getdents64",
        }
    }

    /// Extra flag passed to the listing binary to select this variant.
    pub fn flag(self) -> Option<&'static str> {
        match self {
            Variant::Std => Some("-s"),
            Variant::Getdents => None,
        }
    }
}

/// One line of the record stream: the realized entry count of the fixture
/// directory plus every candidate's statistics for that size.
///
/// Each record is self-contained, so a stream of them can be redirected to a
/// file and decoded line by line with no cross-record state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkResult {
    /// Number of entries actually present in the fixture directory
    pub files: u64,
    /// Per-variant statistics, keyed by [`Variant::key`]
    pub stats: BTreeMap<String, StatsRecord>,
}

impl BenchmarkResult {
    /// Serialize to a single self-contained record line.
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
