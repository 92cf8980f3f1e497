//! Canonical cache keys.
//!
//! A canonical path always starts with `/` and uses `/` between components,
//! whatever the host separator is.

use std::path::{Component, Path};

/// Cache key of the index document, served for `/`.
pub const INDEX_PATH: &str = "/index.html";

/// Canonical path of `file` relative to `root`.
///
/// Returns `None` when `file` is not under `root`, is `root` itself, or
/// contains components that cannot be expressed as a request path.
pub fn canonical_path(root: &Path, file: &Path) -> Option<String> {
    let relative = file.strip_prefix(root).ok()?;
    let mut key = String::new();

    for component in relative.components() {
        match component {
            Component::Normal(part) => {
                key.push('/');
                key.push_str(part.to_str()?);
            }
            Component::CurDir => {}
            _ => return None,
        }
    }

    if key.is_empty() { None } else { Some(key) }
}

/// Map a request path onto the cache key it should be looked up under.
pub fn request_key(request_path: &str) -> &str {
    if request_path == "/" { INDEX_PATH } else { request_path }
}

/// Whether `path` is `dir` or a descendant of it, compared as canonical paths.
pub fn is_within(path: &str, dir: &str) -> bool {
    path.strip_prefix(dir).is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}
