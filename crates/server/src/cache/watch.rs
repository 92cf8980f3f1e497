//! Filesystem-driven cache maintenance.
//!
//! ### Event flow
//! - The notify callback forwards raw events into an unbounded channel.
//! - One task drains the channel in arrival order. Each event's blocking work
//!   (stat, read, transform) runs on the blocking pool and is awaited before
//!   the next event, so updates to the same path never interleave and
//!   request handling is never blocked.
//!
//! ### Per-path update
//! - A regular file is re-read and its entry replaced, with the same
//!   raw-bytes fallback as the startup build.
//! - A missing path, or anything that is not a regular file, is removed
//!   along with every cached key beneath it.
//! - A directory that appears (e.g. moved in) has its files cached.
//!
//! ### Rescan
//! - When the backend reports dropped events or an error, the whole root is
//!   re-read and keys whose file is gone are dropped.
//! - If the root itself is gone, every entry is dropped.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use minserve_core::cache::{canonical_path, is_within};
use minserve_core::{CacheStore, Error};
use minserve_transform::Transformer;
use notify::event::{AccessKind, AccessMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::build::build_into;
use super::compute::compute_entry;

/// What a single path update did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Updated,
    Removed,
    /// Directory contents were (re)cached.
    Ingested,
    /// Nothing to do: outside the root, or nothing cached there.
    Ignored,
}

/// Live subscription keeping a [`CacheStore`] in sync with the asset root.
///
/// Dropping the handle stops the notify backend, which closes the channel and
/// ends the update task.
pub struct WatchHandle {
    _watcher: RecommendedWatcher,
    task: JoinHandle<()>,
}

impl WatchHandle {
    /// Stop watching immediately, abandoning queued events.
    pub fn shutdown(self) {
        self.task.abort();
    }
}

enum Job {
    Paths(Vec<PathBuf>),
    Rescan,
}

/// Subscribe to changes under `root` and apply them to `store`.
///
/// Must be called from within a tokio runtime. `root` should be canonical so
/// event paths reported by the OS can be matched against it.
///
/// # Errors
///
/// Returns `Error::WatchFailed` if the subscription cannot be created.
pub fn watch(root: PathBuf, store: CacheStore, transformer: Arc<dyn Transformer>) -> Result<WatchHandle, Error> {
    let (tx, rx) = mpsc::unbounded_channel();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        let _ = tx.send(res);
    })
    .map_err(|e| Error::WatchFailed(e.to_string()))?;

    watcher
        .watch(&root, RecursiveMode::Recursive)
        .map_err(|e| Error::WatchFailed(format!("{}: {e}", root.display())))?;

    tracing::info!(root = %root.display(), "watching asset root");

    let task = tokio::spawn(run(root, store, transformer, rx));

    Ok(WatchHandle { _watcher: watcher, task })
}

async fn run(
    root: PathBuf, store: CacheStore, transformer: Arc<dyn Transformer>,
    mut rx: mpsc::UnboundedReceiver<notify::Result<Event>>,
) {
    while let Some(res) = rx.recv().await {
        let job = match res {
            Ok(event) if event.need_rescan() => Job::Rescan,
            Ok(event) if !is_relevant(&event.kind) => continue,
            Ok(event) => Job::Paths(event.paths),
            Err(e) => {
                tracing::warn!(error = %e, "watch backend error, rescanning");
                Job::Rescan
            }
        };

        let root = root.clone();
        let store = store.clone();
        let transformer = Arc::clone(&transformer);

        let result = tokio::task::spawn_blocking(move || match job {
            Job::Paths(paths) => {
                for path in paths {
                    apply_change(&root, &store, transformer.as_ref(), &path);
                }
            }
            Job::Rescan => resync(&root, &store, transformer.as_ref()),
        })
        .await;

        if let Err(e) = result {
            tracing::warn!(error = %e, "cache update task failed");
        }
    }

    tracing::debug!("watch channel closed");
}

/// Our own reads open files under the root; only completed writes matter
/// among access events.
fn is_relevant(kind: &EventKind) -> bool {
    match kind {
        EventKind::Access(AccessKind::Close(AccessMode::Write)) => true,
        EventKind::Access(_) => false,
        _ => true,
    }
}

/// Bring the cache entry for `path` in line with what is on disk now.
///
/// Idempotent: the result depends only on the current filesystem state.
pub fn apply_change(root: &Path, store: &CacheStore, transformer: &dyn Transformer, path: &Path) -> Change {
    if path == root {
        return match std::fs::symlink_metadata(root) {
            Ok(_) => Change::Ignored,
            Err(e) => clear_all(store, &e),
        };
    }

    let Some(key) = canonical_path(root, path) else {
        return Change::Ignored;
    };

    let meta = match std::fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %key, error = %e, "stat failed, dropping cached entry");
            }
            return remove_tree(store, &key);
        }
    };

    if meta.is_file() {
        return match compute_entry(path, &key, transformer) {
            Ok((entry, _)) => {
                tracing::debug!(path = %key, bytes = entry.len(), "cache entry updated");
                store.set(key, entry);
                Change::Updated
            }
            Err(e) => {
                tracing::warn!(path = %key, error = %e, "read failed, dropping cached entry");
                remove_tree(store, &key)
            }
        };
    }

    let removed = remove_tree(store, &key);

    if meta.is_dir() {
        return match build_into(root, path, store, transformer) {
            Ok(stats) if stats.files > 0 => Change::Ingested,
            Ok(_) => removed,
            Err(e) => {
                tracing::warn!(path = %key, error = %e, "could not cache directory contents");
                removed
            }
        };
    }

    removed
}

/// Drop `key` and every key beneath it.
fn remove_tree(store: &CacheStore, key: &str) -> Change {
    let before = store.size();
    store.retain(|path| !is_within(path, key));

    if store.size() < before {
        tracing::debug!(path = %key, removed = before - store.size(), "cache entries removed");
        Change::Removed
    } else {
        Change::Ignored
    }
}

/// Drop every entry once the root can no longer be read.
fn clear_all(store: &CacheStore, reason: &dyn std::fmt::Display) -> Change {
    let dropped = store.size();
    store.retain(|_| false);
    tracing::warn!(error = %reason, dropped, "asset root unavailable, cache cleared");

    if dropped > 0 { Change::Removed } else { Change::Ignored }
}

/// Re-read the whole root and drop keys whose file no longer exists.
pub fn resync(root: &Path, store: &CacheStore, transformer: &dyn Transformer) {
    match build_into(root, root, store, transformer) {
        Ok(stats) => {
            store.retain(|key| {
                std::fs::symlink_metadata(root.join(key.trim_start_matches('/')))
                    .map(|meta| meta.is_file())
                    .unwrap_or(false)
            });
            tracing::info!(files = stats.files, cached = store.size(), "asset cache resynced");
        }
        Err(e) if e.is_fatal() => {
            clear_all(store, &e);
        }
        Err(e) => tracing::warn!(error = %e, "resync failed, keeping current cache"),
    }
}
