//! minserve server entry point.
//!
//! Builds the asset cache, starts the watcher, and serves HTTP behind a
//! TLS-terminating proxy. Logging goes to stderr as JSON.

use std::sync::Arc;

use anyhow::{Context, Result};
use minserve_core::{AppConfig, Error};
use minserve_transform::{AssetTransformer, Transformer};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

mod cache;
mod error;
mod gate;
mod handler;
mod serve;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;

    let root = std::fs::canonicalize(&config.root_dir)
        .map_err(|e| Error::RootUnreadable { path: config.root_dir.clone(), reason: e.to_string() })?;

    let mut transformer = AssetTransformer::new().with_minify(config.minify);
    if let Some(fragment) = config.load_inject_fragment()? {
        transformer = transformer.with_fragment(fragment);
    }
    let transformer: Arc<dyn Transformer> = Arc::new(transformer);

    tracing::info!(root = %root.display(), minify = config.minify, "building asset cache");

    let store = {
        let root = root.clone();
        let transformer = Arc::clone(&transformer);
        tokio::task::spawn_blocking(move || cache::build(&root, transformer.as_ref()))
            .await
            .context("cache build task failed")??
    };

    tracing::info!(cached = store.size(), "cache ready");

    let watcher = if config.watch { Some(cache::watch(root.clone(), store.clone(), transformer)?) } else { None };

    let state = handler::AppState::new(store, gate::TransportGate::from_config(&config));
    let app = handler::router(state, &root);

    let addr = config.listen_addr();
    let listener = TcpListener::bind(addr).await.with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "server running");

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    if let Some(watcher) = watcher {
        watcher.shutdown();
    }
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
