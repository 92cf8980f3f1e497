//! Core types and shared functionality for minserve.
//!
//! This crate provides:
//! - In-memory asset cache and canonical path handling
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{CacheEntry, CacheStore};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
