//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (MINSERVE_*)
//! 2. `PORT` environment variable
//! 3. TOML config file (if MINSERVE_CONFIG_FILE set)
//! 4. Built-in defaults

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use bytes::Bytes;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (MINSERVE_*)
/// 2. `PORT`
/// 3. TOML config file (if MINSERVE_CONFIG_FILE set)
/// 4. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Port to listen on.
    ///
    /// Set via PORT or MINSERVE_PORT environment variable.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Address to bind.
    ///
    /// Set via MINSERVE_HOST environment variable.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Directory tree served and cached.
    ///
    /// Set via MINSERVE_ROOT_DIR environment variable.
    #[serde(default = "default_root_dir")]
    pub root_dir: PathBuf,

    /// File whose contents are injected into every HTML document.
    ///
    /// Set via MINSERVE_INJECT_FILE environment variable.
    #[serde(default)]
    pub inject_file: Option<PathBuf>,

    /// Whether HTML, CSS, and JS are minified before caching.
    ///
    /// Set via MINSERVE_MINIFY environment variable.
    #[serde(default = "default_true")]
    pub minify: bool,

    /// Whether the cache follows filesystem changes after startup.
    ///
    /// Set via MINSERVE_WATCH environment variable.
    #[serde(default = "default_true")]
    pub watch: bool,

    /// Whether requests must carry a trusted `X-Forwarded-Proto`.
    ///
    /// Set via MINSERVE_REQUIRE_HTTPS environment variable.
    #[serde(default = "default_true")]
    pub require_https: bool,

    /// Accepted `X-Forwarded-Proto` values, compared case-insensitively.
    ///
    /// Set via MINSERVE_TRUSTED_PROTOS environment variable, written as a
    /// bracketed list: `MINSERVE_TRUSTED_PROTOS=[https,h3]`. A bare
    /// comma-separated value is not split.
    #[serde(default = "default_trusted_protos")]
    pub trusted_protos: Vec<String>,
}

fn default_port() -> u16 {
    8080
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_root_dir() -> PathBuf {
    PathBuf::from("./public")
}

fn default_trusted_protos() -> Vec<String> {
    vec!["https".into()]
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            root_dir: default_root_dir(),
            inject_file: None,
            minify: true,
            watch: true,
            require_https: true,
            trusted_protos: default_trusted_protos(),
        }
    }
}

impl AppConfig {
    /// Socket address to bind the listener to.
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment()
            .extract()
            .map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("MINSERVE_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment
            .merge(Env::raw().only(&["port"]))
            .merge(
                Env::prefixed("MINSERVE_")
                    .ignore(&["config_file"])
                    .map(|key| key.as_str().to_lowercase().into())
                    .split("__"),
            )
    }

    /// Read the HTML injection fragment, if one is configured.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::LoadFailed` if the configured file cannot be read.
    pub fn load_inject_fragment(&self) -> Result<Option<Bytes>, ConfigError> {
        let Some(path) = &self.inject_file else {
            return Ok(None);
        };

        std::fs::read(path)
            .map(|bytes| Some(Bytes::from(bytes)))
            .map_err(|e| ConfigError::LoadFailed(format!("inject_file {}: {e}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.root_dir, PathBuf::from("./public"));
        assert!(config.inject_file.is_none());
        assert!(config.minify);
        assert!(config.watch);
        assert!(config.require_https);
        assert_eq!(config.trusted_protos, vec!["https".to_string()]);
    }

    #[test]
    fn test_listen_addr() {
        let config = AppConfig { port: 9000, ..Default::default() };
        assert_eq!(config.listen_addr().to_string(), "0.0.0.0:9000");
    }

    #[test]
    fn test_port_env_override() {
        Jail::expect_with(|jail| {
            jail.set_env("PORT", "3000");
            let config = AppConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.port, 3000);
            Ok(())
        });
    }

    #[test]
    fn test_prefixed_env_wins_over_port() {
        Jail::expect_with(|jail| {
            jail.set_env("PORT", "3000");
            jail.set_env("MINSERVE_PORT", "4000");
            jail.set_env("MINSERVE_MINIFY", "false");
            let config = AppConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.port, 4000);
            assert!(!config.minify);
            Ok(())
        });
    }

    #[test]
    fn test_trusted_protos_env_list() {
        Jail::expect_with(|jail| {
            jail.set_env("MINSERVE_TRUSTED_PROTOS", "[https,h3]");
            let config = AppConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.trusted_protos, vec!["https".to_string(), "h3".to_string()]);
            Ok(())
        });
    }

    #[test]
    fn test_toml_file_layer() {
        Jail::expect_with(|jail| {
            jail.create_file("minserve.toml", "root_dir = \"site\"\nrequire_https = false\n")?;
            jail.set_env("MINSERVE_CONFIG_FILE", "minserve.toml");
            let config = AppConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.root_dir, PathBuf::from("site"));
            assert!(!config.require_https);
            Ok(())
        });
    }

    #[test]
    fn test_load_inject_fragment_none() {
        let config = AppConfig::default();
        assert!(config.load_inject_fragment().unwrap().is_none());
    }

    #[test]
    fn test_load_inject_fragment_reads_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("inject.html");
        std::fs::write(&path, "<script>1</script>").unwrap();

        let config = AppConfig { inject_file: Some(path), ..Default::default() };
        let fragment = config.load_inject_fragment().unwrap().unwrap();
        assert_eq!(&fragment[..], b"<script>1</script>");
    }

    #[test]
    fn test_load_inject_fragment_missing_file() {
        let config = AppConfig { inject_file: Some(PathBuf::from("/nonexistent/inject.html")), ..Default::default() };
        assert!(matches!(config.load_inject_fragment(), Err(ConfigError::LoadFailed(_))));
    }
}
