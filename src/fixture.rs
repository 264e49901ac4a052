//! Fixture directory population
//!
//! Grows the benchmark's working directory to a target entry count with
//! uniquely named empty files. Growth is monotonic: entries are never
//! deleted, and an interrupted run resumes from whatever count is already
//! on disk.

use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};
use rand::rngs::OsRng;
use rand::Rng;

/// URL-safe alphabet for fixture file names.
const NAME_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Count the entries currently present in `dir`.
pub fn count_entries(dir: &Path) -> Result<u64> {
    let mut count = 0;
    for entry in fs::read_dir(dir)
        .with_context(|| format!("failed to read fixture directory {}", dir.display()))?
    {
        entry.with_context(|| format!("failed to read fixture directory {}", dir.display()))?;
        count += 1;
    }
    Ok(count)
}

/// Grow `dir` to `target` entries and return the realized entry count.
///
/// Exactly `target - existing` files are created; a directory already at or
/// above the target is left untouched and reported at its real size. A name
/// collision is retried with a fresh name; any other filesystem error is
/// fatal.
pub fn populate(dir: &Path, target: u64) -> Result<u64> {
    let existing = count_entries(dir)?;
    if existing >= target {
        return Ok(existing);
    }

    let mut rng = OsRng;
    for _ in existing..target {
        loop {
            let name = random_name(&mut rng);
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(dir.join(&name))
            {
                Ok(_) => break,
                Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                    tracing::debug!(name = %name, "fixture name collision, retrying");
                }
                Err(err) => {
                    return Err(err).with_context(|| {
                        format!("failed to create fixture file {name} in {}", dir.display())
                    });
                }
            }
        }
    }

    Ok(target)
}

/// Generate a random URL-safe file name.
///
/// Length matches the URL-safe encoding of an 8-16 byte random token
/// (11-22 characters), so name lengths spread out instead of clustering on
/// a single value.
fn random_name(rng: &mut impl Rng) -> String {
    let token_bytes: usize = rng.gen_range(8..=16);
    let len = token_bytes * 4 / 3 + usize::from(token_bytes % 3 != 0);
    (0..len)
        .map(|_| NAME_ALPHABET[rng.gen_range(0..NAME_ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn entry_names(dir: &Path) -> HashSet<String> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_populate_creates_exact_count() {
        let dir = tempfile::tempdir().unwrap();
        let realized = populate(dir.path(), 10).unwrap();
        assert_eq!(realized, 10);
        assert_eq!(count_entries(dir.path()).unwrap(), 10);
    }

    #[test]
    fn test_populate_grows_monotonically() {
        let dir = tempfile::tempdir().unwrap();
        populate(dir.path(), 10).unwrap();
        let first = entry_names(dir.path());

        let realized = populate(dir.path(), 25).unwrap();
        assert_eq!(realized, 25);
        assert_eq!(count_entries(dir.path()).unwrap(), 25);

        // nothing from the first round was deleted or renamed
        let second = entry_names(dir.path());
        assert!(first.is_subset(&second));
    }

    #[test]
    fn test_populate_to_zero_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(populate(dir.path(), 0).unwrap(), 0);
        assert_eq!(count_entries(dir.path()).unwrap(), 0);
    }

    #[test]
    fn test_populate_below_existing_reports_real_count() {
        let dir = tempfile::tempdir().unwrap();
        populate(dir.path(), 8).unwrap();
        let realized = populate(dir.path(), 3).unwrap();
        assert_eq!(realized, 8);
        assert_eq!(count_entries(dir.path()).unwrap(), 8);
    }

    #[test]
    fn test_populate_missing_directory_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-such-subdir");
        assert!(populate(&missing, 5).is_err());
    }

    #[test]
    fn test_random_name_charset_and_length() {
        let mut rng = OsRng;
        for _ in 0..100 {
            let name = random_name(&mut rng);
            assert!((11..=22).contains(&name.len()), "bad length: {name}");
            assert!(name.bytes().all(|b| NAME_ALPHABET.contains(&b)));
        }
    }
}
