//! Configuration loading for Orrery.
//!
//! Configuration is read from a TOML document. Every field has a default, so an empty file (or
//! no file at all) yields a working setup pointed at the public JPL Horizons API.
//!
//! ```toml
//! [horizons]
//! endpoint = "https://ssd.jpl.nasa.gov/api/horizons.api"
//! center = "500@10"
//! timeout_secs = 30
//!
//! [cache]
//! ttl_secs = 3600
//!
//! [catalog]
//! path = "data/catalog.csv"
//!
//! [logging]
//! level = "info"
//! json = false
//! ```
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use tracing::debug;

use crate::{
    constants::{CACHE_TTL, FETCH_TIMEOUT},
    orrery_errors::OrreryError,
};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct OrreryConfig {
    pub horizons: HorizonsConfig,
    pub cache: CacheConfig,
    pub catalog: CatalogConfig,
    pub logging: LoggingConfig,
}

/// Ephemeris provider settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HorizonsConfig {
    /// URL of the Horizons API endpoint.
    pub endpoint: String,
    /// Horizons `CENTER` code positions are expressed relative to.
    pub center: String,
    /// Hard limit for a single request, in seconds.
    pub timeout_secs: u64,
}

impl Default for HorizonsConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://ssd.jpl.nasa.gov/api/horizons.api".into(),
            center: "500@10".into(),
            timeout_secs: FETCH_TIMEOUT.as_secs(),
        }
    }
}

impl HorizonsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Position cache settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Validity window of a cached position, in seconds.
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: CACHE_TTL.as_secs(),
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Static catalog source.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// CSV file with `name,kind,ra,dec,parallax,magnitude,spectral_type` rows. The built-in
    /// bright star sample is used when unset.
    pub path: Option<PathBuf>,
}

/// Logging settings, see [`init_tracing`](crate::init_tracing).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON lines instead of compact human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
        }
    }
}

impl OrreryConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, OrreryError> {
        Ok(toml::from_str(content)?)
    }

    /// Read the configuration file at `path`.
    pub fn load(path: &Path) -> Result<Self, OrreryError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Like [`OrreryConfig::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, OrreryError> {
        if path.exists() {
            Self::load(path)
        } else {
            debug!(path = %path.display(), "no configuration file, using defaults");
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod config_test {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OrreryConfig::from_toml_str("").unwrap();
        assert_eq!(config, OrreryConfig::default());
        assert_eq!(config.horizons.timeout(), Duration::from_secs(30));
        assert_eq!(config.cache.ttl(), Duration::from_secs(3600));
        assert_eq!(config.horizons.center, "500@10");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.catalog.path, None);
    }

    #[test]
    fn test_partial_override() {
        let config = OrreryConfig::from_toml_str(
            r#"
            [horizons]
            endpoint = "http://localhost:8080/api/horizons.api"

            [cache]
            ttl_secs = 120

            [catalog]
            path = "data/catalog.csv"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.horizons.endpoint,
            "http://localhost:8080/api/horizons.api"
        );
        assert_eq!(config.horizons.timeout_secs, 30);
        assert_eq!(config.cache.ttl(), Duration::from_secs(120));
        assert!(!config.logging.json);
        assert_eq!(config.catalog.path, Some(PathBuf::from("data/catalog.csv")));
    }

    #[test]
    fn test_invalid_document() {
        assert!(matches!(
            OrreryConfig::from_toml_str("[cache]\nttl_secs = \"soon\""),
            Err(OrreryError::Config(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let path = Path::new("/nonexistent/orrery.toml");
        assert!(matches!(
            OrreryConfig::load(path),
            Err(OrreryError::ConfigIo(_))
        ));
        assert_eq!(
            OrreryConfig::load_or_default(path).unwrap(),
            OrreryConfig::default()
        );
    }
}
