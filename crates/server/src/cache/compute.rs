//! Entry computation shared by the builder and the watcher.
//!
//! A transform failure never loses the asset: the raw bytes are cached under
//! the same key and content type, and a warning is logged.

use std::path::Path;

use bytes::Bytes;
use minserve_core::{CacheEntry, Error};
use minserve_transform::{Transformer, content_type_for};

/// How an entry's content was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Transformed,
    Passthrough,
    /// The transform failed and the raw bytes were cached instead.
    Fallback,
}

/// Read `file` and build the entry cached under `key`.
///
/// # Errors
///
/// Returns `Error::ReadFailed` if the file cannot be read. Transform errors
/// are handled here and never returned.
pub fn compute_entry(file: &Path, key: &str, transformer: &dyn Transformer) -> Result<(CacheEntry, Outcome), Error> {
    let raw = Bytes::from(std::fs::read(file).map_err(|e| Error::read_failed(file, e))?);
    let extension = file.extension().and_then(|ext| ext.to_str()).unwrap_or("");

    match transformer.transform(raw.clone(), extension) {
        Ok(output) if output.transformed => {
            Ok((CacheEntry::transformed(output.content, output.content_type), Outcome::Transformed))
        }
        Ok(output) => Ok((CacheEntry::raw(output.content, output.content_type), Outcome::Passthrough)),
        Err(e) => {
            tracing::warn!(path = key, kind = %e.kind(), error = %e, "transform failed, caching raw bytes");
            Ok((CacheEntry::raw(raw, content_type_for(extension)), Outcome::Fallback))
        }
    }
}
