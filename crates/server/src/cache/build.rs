//! Startup cache build.
//!
//! Walks the asset root once, before the server accepts requests, and caches
//! every regular file. Directories are traversed, symlinks are skipped, and a
//! file that cannot be read is left out of the cache rather than failing the
//! build. Only an unreadable root aborts.

use std::path::Path;
use std::time::{Duration, Instant};

use minserve_core::cache::canonical_path;
use minserve_core::{CacheStore, Error};
use minserve_transform::Transformer;
use walkdir::WalkDir;

use super::compute::{Outcome, compute_entry};

/// Counters for one walk over (part of) the asset root.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub files: usize,
    pub transformed: usize,
    pub fallbacks: usize,
    pub skipped: usize,
    pub elapsed: Duration,
}

/// Build a fresh cache of every regular file under `root`.
///
/// # Errors
///
/// Returns `Error::RootUnreadable` if `root` is missing, not a directory, or
/// cannot be listed.
pub fn build(root: &Path, transformer: &dyn Transformer) -> Result<CacheStore, Error> {
    let store = CacheStore::new();
    let stats = build_into(root, root, &store, transformer)?;

    tracing::info!(
        files = stats.files,
        transformed = stats.transformed,
        fallbacks = stats.fallbacks,
        skipped = stats.skipped,
        elapsed_ms = stats.elapsed.as_millis() as u64,
        "asset cache built"
    );

    Ok(store)
}

/// Cache every regular file under `dir` into `store`, keyed relative to `root`.
///
/// Existing entries for the same keys are replaced; nothing is removed.
pub(crate) fn build_into(
    root: &Path, dir: &Path, store: &CacheStore, transformer: &dyn Transformer,
) -> Result<BuildStats, Error> {
    let start = Instant::now();
    ensure_readable_dir(dir)?;

    let mut stats = BuildStats::default();

    for item in WalkDir::new(dir).follow_links(false) {
        let item = match item {
            Ok(item) => item,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable path during walk");
                stats.skipped += 1;
                continue;
            }
        };

        let file_type = item.file_type();
        if file_type.is_dir() {
            continue;
        }
        if !file_type.is_file() {
            tracing::debug!(path = %item.path().display(), "skipping non-regular file");
            stats.skipped += 1;
            continue;
        }

        let Some(key) = canonical_path(root, item.path()) else {
            tracing::warn!(path = %item.path().display(), "skipping file without a request path");
            stats.skipped += 1;
            continue;
        };

        match compute_entry(item.path(), &key, transformer) {
            Ok((entry, outcome)) => {
                stats.files += 1;
                match outcome {
                    Outcome::Transformed => stats.transformed += 1,
                    Outcome::Fallback => stats.fallbacks += 1,
                    Outcome::Passthrough => {}
                }
                store.set(key, entry);
            }
            Err(e) => {
                tracing::warn!(path = %key, error = %e, "skipping file");
                stats.skipped += 1;
            }
        }
    }

    stats.elapsed = start.elapsed();
    Ok(stats)
}

fn ensure_readable_dir(dir: &Path) -> Result<(), Error> {
    let unreadable = |reason: String| Error::RootUnreadable { path: dir.to_path_buf(), reason };

    let meta = std::fs::metadata(dir).map_err(|e| unreadable(e.to_string()))?;
    if !meta.is_dir() {
        return Err(unreadable("not a directory".into()));
    }
    std::fs::read_dir(dir).map_err(|e| unreadable(e.to_string()))?;

    Ok(())
}
