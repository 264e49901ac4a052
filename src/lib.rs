//! Dirbench - benchmark harness for directory-listing implementations
//!
//! This library drives an external listing binary that implements directory
//! traversal two ways (direct `getdents64` syscalls, and `std::fs::read_dir`),
//! validates both against a trusted reference listing, and collects the
//! latency statistics the binary self-reports across a sweep of fixture
//! directory sizes.

pub mod cli;
pub mod executor;
pub mod fixture;
pub mod record;
pub mod report;
pub mod runner;
pub mod verify;
