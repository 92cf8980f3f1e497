//! Transform error types.

use crate::AssetKind;

/// Boxed error from an underlying minifier.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors from the transform pipeline.
///
/// Callers recover from every variant by caching the untransformed bytes.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// A text asset was not valid UTF-8.
    #[error("{kind} transform failed: invalid UTF-8: {source}")]
    InvalidUtf8 {
        kind: AssetKind,
        #[source]
        source: std::str::Utf8Error,
    },

    /// The minifier rejected the input.
    #[error("{kind} transform failed: {source}")]
    Failed {
        kind: AssetKind,
        #[source]
        source: BoxError,
    },
}

impl TransformError {
    pub fn failed(kind: AssetKind, source: impl Into<BoxError>) -> Self {
        TransformError::Failed { kind, source: source.into() }
    }

    /// Kind of asset the failing transform was applied to.
    pub fn kind(&self) -> AssetKind {
        match self {
            TransformError::InvalidUtf8 { kind, .. } | TransformError::Failed { kind, .. } => *kind,
        }
    }
}

/// Structural problems found by the markup minifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarkupError {
    #[error("unterminated comment")]
    UnterminatedComment,

    #[error("unterminated <{0}> element")]
    UnterminatedElement(&'static str),

    #[error("unterminated attribute value")]
    UnterminatedAttribute,
}
