//! Serving layer: answer requests from the asset cache.
//!
//! A cache hit is sent as stored, with no further transformation. A miss
//! falls through to the next layer (the filesystem fallback, then 404).

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, header};
use axum::middleware::Next;
use axum::response::Response;
use minserve_core::cache::request_key;
use minserve_core::{CacheEntry, CacheStore};
use percent_encoding::percent_decode_str;

use crate::handler::AppState;

/// Outcome of a cache lookup for one request path.
#[derive(Debug, Clone)]
pub enum Served {
    Hit(Arc<CacheEntry>),
    NotHandled,
}

/// Look up `request_path` in `store`, mapping `/` to the index document.
pub fn serve(store: &CacheStore, request_path: &str) -> Served {
    match store.get(request_key(request_path)) {
        Some(entry) => Served::Hit(entry),
        None => Served::NotHandled,
    }
}

/// Middleware serving `GET`/`HEAD` requests from the cache.
pub async fn serve_cached(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if !matches!(*request.method(), Method::GET | Method::HEAD) {
        return next.run(request).await;
    }

    let served = match percent_decode_str(request.uri().path()).decode_utf8() {
        Ok(path) => serve(&state.store, &path),
        Err(_) => Served::NotHandled,
    };

    match served {
        Served::Hit(entry) => cached_response(&entry, request.headers()),
        Served::NotHandled => next.run(request).await,
    }
}

fn cached_response(entry: &CacheEntry, request_headers: &HeaderMap) -> Response {
    let etag = HeaderValue::from_str(entry.etag()).ok();
    let not_modified = etag.as_ref().is_some_and(|etag| etag_matches(request_headers, etag));

    let mut response = if not_modified {
        Response::new(Body::empty())
    } else {
        Response::new(Body::from(entry.content().clone()))
    };

    if not_modified {
        *response.status_mut() = StatusCode::NOT_MODIFIED;
    }

    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, content_type_header(entry.content_type()));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    if let Some(etag) = etag {
        headers.insert(header::ETAG, etag);
    }
    let last_modified = entry.cached_at().format("%a, %d %b %Y %H:%M:%S GMT").to_string();
    if let Ok(value) = HeaderValue::from_str(&last_modified) {
        headers.insert(header::LAST_MODIFIED, value);
    }

    response
}

/// Whether `If-None-Match` names `etag` (or is `*`).
fn etag_matches(request_headers: &HeaderMap, etag: &HeaderValue) -> bool {
    let Some(expected) = etag.to_str().ok() else {
        return false;
    };

    request_headers
        .get_all(header::IF_NONE_MATCH)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(|tag| tag.trim().trim_start_matches("W/"))
        .any(|tag| tag == "*" || tag == expected)
}

fn content_type_header(content_type: &'static str) -> HeaderValue {
    let textual = content_type.starts_with("text/")
        || matches!(content_type, "application/javascript" | "application/json" | "image/svg+xml" | "application/xml");

    if textual {
        HeaderValue::from_str(&format!("{content_type}; charset=utf-8"))
            .unwrap_or_else(|_| HeaderValue::from_static(content_type))
    } else {
        HeaderValue::from_static(content_type)
    }
}
