//! Trusted-transport admission.
//!
//! TLS is terminated upstream; the proxy asserts the original scheme in
//! `X-Forwarded-Proto`. Requests without an accepted value are refused with
//! `426 Upgrade Required` before any asset lookup.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use minserve_core::AppConfig;

use crate::error::RequestError;
use crate::handler::AppState;

pub const FORWARDED_PROTO: &str = "x-forwarded-proto";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Allow,
    Reject,
}

/// Admission policy for the trusted-transport signal.
#[derive(Debug, Clone)]
pub struct TransportGate {
    enabled: bool,
    accepted: Arc<[String]>,
}

impl TransportGate {
    /// Gate accepting the given protocol names, compared case-insensitively.
    pub fn new<I, S>(accepted: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let accepted = accepted.into_iter().map(|p| p.as_ref().trim().to_ascii_lowercase()).collect();
        Self { enabled: true, accepted }
    }

    /// Gate that admits every request.
    pub fn disabled() -> Self {
        Self { enabled: false, accepted: Arc::from([]) }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        if config.require_https { Self::new(&config.trusted_protos) } else { Self::disabled() }
    }

    /// Decide on a request carrying `signal` as its forwarded protocol.
    pub fn admit(&self, signal: Option<&str>) -> Admission {
        if !self.enabled {
            return Admission::Allow;
        }

        match signal {
            Some(value) if self.accepted.iter().any(|p| value.trim().eq_ignore_ascii_case(p)) => Admission::Allow,
            _ => Admission::Reject,
        }
    }
}

/// Middleware rejecting requests that did not arrive over a trusted transport.
pub async fn require_trusted_transport(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let signal = request.headers().get(FORWARDED_PROTO).and_then(|v| v.to_str().ok());

    match state.gate.admit(signal) {
        Admission::Allow => next.run(request).await,
        Admission::Reject => {
            tracing::debug!(path = request.uri().path(), proto = ?signal, "rejected untrusted transport");
            RequestError::UpgradeRequired.into_response()
        }
    }
}
