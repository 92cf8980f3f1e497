//! Cached asset entries.

use bytes::Bytes;
use chrono::{DateTime, Utc};

use super::hash::compute_etag;

/// One servable asset.
///
/// Entries are never mutated after construction. Updates replace the whole
/// entry in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    content: Bytes,
    content_type: &'static str,
    etag: String,
    cached_at: DateTime<Utc>,
    transformed: bool,
}

impl CacheEntry {
    /// Entry holding transform output.
    pub fn transformed(content: impl Into<Bytes>, content_type: &'static str) -> Self {
        Self::new(content.into(), content_type, true)
    }

    /// Entry holding the file bytes as read from disk.
    pub fn raw(content: impl Into<Bytes>, content_type: &'static str) -> Self {
        Self::new(content.into(), content_type, false)
    }

    fn new(content: Bytes, content_type: &'static str, transformed: bool) -> Self {
        let etag = compute_etag(&content);
        Self { content, content_type, etag, cached_at: Utc::now(), transformed }
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }

    pub fn content_type(&self) -> &'static str {
        self.content_type
    }

    /// Quoted strong validator derived from the content.
    pub fn etag(&self) -> &str {
        &self.etag
    }

    pub fn cached_at(&self) -> DateTime<Utc> {
        self.cached_at
    }

    /// Whether `content` came out of a transform rather than straight from disk.
    pub fn is_transformed(&self) -> bool {
        self.transformed
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Same bytes and content type, ignoring when the entry was produced.
    pub fn same_content(&self, other: &CacheEntry) -> bool {
        self.content == other.content && self.content_type == other.content_type
    }
}
