//! Request-level errors for the minserve server.
//!
//! These map to the fixed responses at the end of the serving chain.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Responses that end a request without serving an asset.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// The request did not arrive over a trusted transport.
    #[error("HTTPS (via HTTP/3) required.")]
    UpgradeRequired,

    /// Neither the cache nor the filesystem had the asset.
    #[error("Not found")]
    NotFound,
}

impl RequestError {
    pub fn status(&self) -> StatusCode {
        match self {
            RequestError::UpgradeRequired => StatusCode::UPGRADE_REQUIRED,
            RequestError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
