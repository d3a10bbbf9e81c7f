//! Application configuration
//!
//! Layered: built-in defaults, then an optional TOML file, then
//! `DERMALYZE__SECTION__KEY` environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use api_client::ApiConfig;
use camera_capture::CameraConfig;
use capture_guidance::GuidanceConfig;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::Level;

use crate::AppError;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "DERMALYZE";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Plain,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// trace, debug, info, warn or error
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Plain,
        }
    }
}

impl LoggingConfig {
    pub fn level(&self) -> Result<Level, AppError> {
        self.level
            .trim()
            .parse()
            .map_err(|_| AppError::InvalidConfig(format!("unknown log level {:?}", self.level)))
    }
}

/// Cache lifetimes (seconds) and sizes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub history_ttl_secs: u64,
    /// Age limit for stale history served when the backend is down
    pub history_fallback_ttl_secs: u64,
    pub products_ttl_secs: u64,
    pub products_fallback_ttl_secs: u64,
    pub recent_ttl_secs: u64,
    /// Recent analyses kept for offline viewing
    pub recent_limit: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            history_ttl_secs: 5 * 60,
            history_fallback_ttl_secs: 24 * 60 * 60,
            products_ttl_secs: 5 * 60,
            products_fallback_ttl_secs: 24 * 60 * 60,
            recent_ttl_secs: 24 * 60 * 60,
            recent_limit: 10,
        }
    }
}

impl CacheConfig {
    pub fn history_ttl(&self) -> Duration {
        Duration::from_secs(self.history_ttl_secs)
    }

    pub fn history_fallback_ttl(&self) -> Duration {
        Duration::from_secs(self.history_fallback_ttl_secs)
    }

    pub fn products_ttl(&self) -> Duration {
        Duration::from_secs(self.products_ttl_secs)
    }

    pub fn products_fallback_ttl(&self) -> Duration {
        Duration::from_secs(self.products_fallback_ttl_secs)
    }

    pub fn recent_ttl(&self) -> Duration {
        Duration::from_secs(self.recent_ttl_secs)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Backing file for persisted state; in-memory when unset
    pub path: Option<PathBuf>,
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub camera: CameraConfig,
    pub guidance: GuidanceConfig,
    pub cache: CacheConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load from an optional TOML file plus the environment
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
        }
        let config: AppConfig = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Parse TOML text, without the environment layer
    pub fn from_toml(text: &str) -> Result<Self, AppError> {
        let config: AppConfig = Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.api.base_url.trim().is_empty() {
            return Err(AppError::InvalidConfig("api.base_url is empty".to_string()));
        }
        if self.cache.recent_limit == 0 {
            return Err(AppError::InvalidConfig(
                "cache.recent_limit must be at least 1".to_string(),
            ));
        }
        if !(1..=100).contains(&self.camera.jpeg_quality) {
            return Err(AppError::InvalidConfig(format!(
                "camera.jpeg_quality {} outside 1-100",
                self.camera.jpeg_quality
            )));
        }
        self.guidance.validate()?;
        self.logging.level()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_client::Environment as Deployment;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.guidance.center_threshold_px, 40.0);
        assert_eq!(config.cache.recent_limit, 10);
    }

    #[test]
    fn test_partial_toml() {
        let config = AppConfig::from_toml(
            r#"
            [api]
            base_url = "/api"
            environment = "production"

            [guidance]
            rotation_threshold_deg = 20.0

            [logging]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "/api");
        assert_eq!(config.api.environment, Deployment::Production);
        assert_eq!(config.guidance.rotation_threshold_deg, 20.0);
        assert_eq!(config.guidance.tilt_threshold_deg, 10.0);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.cache.history_ttl(), Duration::from_secs(300));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            AppConfig::from_toml("[logging]\nlevel = \"loud\""),
            Err(AppError::InvalidConfig(_))
        ));
        assert!(matches!(
            AppConfig::from_toml("[guidance]\ncenter_threshold_px = -1.0"),
            Err(AppError::Guidance(_))
        ));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = AppConfig::load(Some(Path::new("/nonexistent/dermalyze.toml"))).unwrap();
        assert_eq!(config.api.timeout_secs, ApiConfig::default().timeout_secs);
    }
}
