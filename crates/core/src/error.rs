//! Unified error types for minserve.
//!
//! [`Error::RootUnreadable`] and [`Error::WatchFailed`] are fatal: they abort startup, and a
//! root that becomes unreadable later empties the cache. Everything else is logged by the
//! caller and recovered from per entry.

use std::path::PathBuf;

/// Unified error types for the asset cache.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The asset root could not be walked at all.
    #[error("ROOT_UNREADABLE: {path}: {reason}")]
    RootUnreadable { path: PathBuf, reason: String },

    /// A single file vanished or could not be read during a walk or watch update.
    #[error("READ_FAILED: {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The filesystem change subscription could not be created.
    #[error("WATCH_FAILED: {0}")]
    WatchFailed(String),
}

impl Error {
    /// Build a [`Error::ReadFailed`] for `path`.
    pub fn read_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::ReadFailed { path: path.into(), source }
    }

    /// Whether the error concerns the asset root or the watch as a whole, not a single entry.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::RootUnreadable { .. } | Error::WatchFailed(_))
    }
}
