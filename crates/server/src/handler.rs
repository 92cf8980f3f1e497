//! HTTP handler assembly.
//!
//! Every request passes, in order, through:
//! 1. the trusted-transport gate (426 on failure)
//! 2. the asset cache
//! 3. raw files under the asset root
//! 4. a plain 404
use std::path::Path;

use axum::Router;
use axum::handler::HandlerWithoutStateExt;
use axum::middleware;
use minserve_core::CacheStore;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::error::RequestError;
use crate::gate::{TransportGate, require_trusted_transport};
use crate::serve::serve_cached;

/// State shared by the request middleware.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: CacheStore,
    pub gate: TransportGate,
}

impl AppState {
    pub fn new(store: CacheStore, gate: TransportGate) -> Self {
        Self { store, gate }
    }
}

/// Build the router serving `root`, cache first.
pub fn router(state: AppState, root: &Path) -> Router {
    let files = ServeDir::new(root).not_found_service(not_found.into_service());

    Router::new()
        .fallback_service(files)
        .layer(middleware::from_fn_with_state(state.clone(), serve_cached))
        .layer(middleware::from_fn_with_state(state, require_trusted_transport))
        .layer(TraceLayer::new_for_http())
}

async fn not_found() -> RequestError {
    RequestError::NotFound
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use minserve_core::CacheEntry;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn app(dir: &TempDir, store: CacheStore) -> Router {
        router(AppState::new(store, TransportGate::new(["https"])), dir.path())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).header("x-forwarded-proto", "https").body(Body::empty()).unwrap()
    }

    async fn body_of(response: axum::response::Response) -> Vec<u8> {
        to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
    }

    #[tokio::test]
    async fn test_serves_cached_entry() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("app.js"), "function f(){ return 1; }").unwrap();
        let store = CacheStore::new();
        store.set("/app.js", CacheEntry::transformed("function f(){return 1}", "application/javascript"));

        let response = app(&dir, store).oneshot(get("/app.js")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/javascript; charset=utf-8");
        assert_eq!(body_of(response).await, b"function f(){return 1}");
    }

    #[tokio::test]
    async fn test_root_serves_index() {
        let dir = TempDir::new().unwrap();
        let store = CacheStore::new();
        store.set("/index.html", CacheEntry::transformed("<p>home</p>", "text/html"));

        let response = app(&dir, store).oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_of(response).await, b"<p>home</p>");
    }

    #[tokio::test]
    async fn test_missing_signal_rejected() {
        let dir = TempDir::new().unwrap();
        let store = CacheStore::new();
        store.set("/index.html", CacheEntry::transformed("<p>home</p>", "text/html"));

        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app(&dir, store).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UPGRADE_REQUIRED);
        assert_eq!(body_of(response).await, b"HTTPS (via HTTP/3) required.");
    }

    #[tokio::test]
    async fn test_plain_http_rejected() {
        let dir = TempDir::new().unwrap();
        let request = Request::builder().uri("/").header("x-forwarded-proto", "http").body(Body::empty()).unwrap();
        let response = app(&dir, CacheStore::new()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UPGRADE_REQUIRED);
    }

    #[tokio::test]
    async fn test_cache_miss_falls_back_to_disk() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("late.txt"), "raw from disk").unwrap();

        let response = app(&dir, CacheStore::new()).oneshot(get("/late.txt")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_of(response).await, b"raw from disk");
    }

    #[tokio::test]
    async fn test_not_found() {
        let dir = TempDir::new().unwrap();
        let response = app(&dir, CacheStore::new()).oneshot(get("/missing.css")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_of(response).await, b"Not found");
    }

    #[tokio::test]
    async fn test_percent_encoded_path() {
        let dir = TempDir::new().unwrap();
        let store = CacheStore::new();
        store.set("/my file.txt", CacheEntry::raw("spaced", "text/plain"));

        let response = app(&dir, store).oneshot(get("/my%20file.txt")).await.unwrap();
        assert_eq!(body_of(response).await, b"spaced");
    }

    #[tokio::test]
    async fn test_if_none_match_returns_not_modified() {
        let dir = TempDir::new().unwrap();
        let store = CacheStore::new();
        let entry = CacheEntry::transformed("a{}", "text/css");
        let etag = entry.etag().to_string();
        store.set("/a.css", entry);

        let request = Request::builder()
            .uri("/a.css")
            .header("x-forwarded-proto", "https")
            .header(header::IF_NONE_MATCH, etag)
            .body(Body::empty())
            .unwrap();
        let response = app(&dir, store).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
        assert!(body_of(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_post_is_not_served_from_cache() {
        let dir = TempDir::new().unwrap();
        let store = CacheStore::new();
        store.set("/index.html", CacheEntry::transformed("<p>home</p>", "text/html"));

        let request = Request::builder()
            .method("POST")
            .uri("/index.html")
            .header("x-forwarded-proto", "https")
            .body(Body::empty())
            .unwrap();
        let response = app(&dir, store).oneshot(request).await.unwrap();
        assert_ne!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_disabled_gate_admits_plain_requests() {
        let dir = TempDir::new().unwrap();
        let store = CacheStore::new();
        store.set("/index.html", CacheEntry::transformed("<p>home</p>", "text/html"));

        let app = router(AppState::new(store, TransportGate::disabled()), dir.path());
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
