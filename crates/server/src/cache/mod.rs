//! Cache population and maintenance.
//!
//! This module builds the asset cache at startup and keeps it in sync with
//! the filesystem afterwards.

pub mod build;
pub mod compute;
pub mod watch;

pub use build::build;
pub use watch::watch;
