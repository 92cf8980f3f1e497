//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `port` is 0
    /// - `root_dir` is empty
    /// - `trusted_protos` is empty or contains a blank value while `require_https` is set
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::Invalid { field: "port".into(), reason: "must be greater than 0".into() });
        }

        if self.root_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid { field: "root_dir".into(), reason: "must not be empty".into() });
        }

        if self.require_https {
            if self.trusted_protos.is_empty() {
                return Err(ConfigError::Invalid {
                    field: "trusted_protos".into(),
                    reason: "must not be empty while require_https is enabled".into(),
                });
            }
            if self.trusted_protos.iter().any(|p| p.trim().is_empty()) {
                return Err(ConfigError::Invalid {
                    field: "trusted_protos".into(),
                    reason: "must not contain blank values".into(),
                });
            }
        } else {
            tracing::warn!("require_https is disabled; requests are admitted without X-Forwarded-Proto");
        }

        Ok(())
    }
}
