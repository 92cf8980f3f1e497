//! In-memory cache of served assets.
//!
//! This module provides the concurrent path → entry map shared by the cache
//! builder, the watcher, and the serving layer. It supports:
//!
//! - Whole-entry replacement, so readers never see a torn entry
//! - Canonical `/`-separated keys independent of the host OS
//! - Content-derived `ETag` validators

pub mod entry;
pub mod hash;
pub mod path;
pub mod store;

pub use crate::Error;

pub use entry::CacheEntry;
pub use path::{INDEX_PATH, canonical_path, is_within, request_key};
pub use store::CacheStore;
