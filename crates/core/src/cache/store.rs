//! Concurrent in-memory store of cached assets.

use std::sync::Arc;

use dashmap::DashMap;

use super::entry::CacheEntry;

/// Map from canonical request path to cached entry.
///
/// Cloning the store yields another handle to the same map. Values are
/// `Arc`s so a reader keeps the entry it looked up even if a writer
/// replaces the key a moment later.
#[derive(Debug, Clone, Default)]
pub struct CacheStore {
    entries: Arc<DashMap<String, Arc<CacheEntry>>>,
}

impl CacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &str) -> Option<Arc<CacheEntry>> {
        self.entries.get(path).map(|e| Arc::clone(e.value()))
    }

    /// Replace the entry at `path`.
    pub fn set(&self, path: impl Into<String>, entry: CacheEntry) {
        self.entries.insert(path.into(), Arc::new(entry));
    }

    /// Remove `path`, returning whether it was present.
    pub fn delete(&self, path: &str) -> bool {
        self.entries.remove(path).is_some()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of every cached path, in no particular order.
    pub fn paths(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.key().clone()).collect()
    }

    /// Keep only the paths for which `keep` returns true.
    pub fn retain(&self, mut keep: impl FnMut(&str) -> bool) {
        self.entries.retain(|path, _| keep(path));
    }
}
