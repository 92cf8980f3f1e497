//! Asset transforms for minserve.
//!
//! This crate provides the minification and HTML injection pipeline that the
//! server applies to text assets before caching them.

pub mod adapter;
pub mod error;
pub mod inject;
pub mod kind;
pub mod minify;

pub use adapter::{AssetTransformer, TransformOutput, Transformer};
pub use error::{BoxError, MarkupError, TransformError};
pub use kind::{AssetKind, OCTET_STREAM, content_type_for};
