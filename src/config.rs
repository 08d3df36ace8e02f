//! Configuration management for weatherdash
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::DashboardError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Forecast API configuration
    #[serde(default)]
    pub api: ApiConfig,
    /// In-memory cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Default selections
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Forecast API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Forecast endpoint, queried with `?adm1=<code>`
    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,
    /// Province (ADM1) listing endpoint
    #[serde(default = "default_adm_list_url")]
    pub adm_list_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Cache configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// How long a fetched forecast stays valid
    #[serde(default = "default_forecast_ttl")]
    pub forecast_ttl_seconds: u64,
    /// How long the province table stays valid
    #[serde(default = "default_adm_list_ttl")]
    pub adm_list_ttl_seconds: u64,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Default application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Region used when `--region` is not given
    #[serde(default = "default_region")]
    pub region: String,
}

// Default value functions
fn default_forecast_url() -> String {
    "https://cuaca.bmkg.go.id/api/df/v1/forecast/adm".to_string()
}

fn default_adm_list_url() -> String {
    "https://cuaca.bmkg.go.id/api/df/v1/adm/list".to_string()
}

fn default_timeout() -> u32 {
    10
}

fn default_user_agent() -> String {
    format!("weatherdash/{}", env!("CARGO_PKG_VERSION"))
}

fn default_forecast_ttl() -> u64 {
    300
}

fn default_adm_list_ttl() -> u64 {
    3600
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_region() -> String {
    "32".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            forecast_url: default_forecast_url(),
            adm_list_url: default_adm_list_url(),
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            forecast_ttl_seconds: default_forecast_ttl(),
            adm_list_ttl_seconds: default_adm_list_ttl(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
        }
    }
}

impl ApiConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.into())
    }
}

impl CacheConfig {
    #[must_use]
    pub fn forecast_ttl(&self) -> Duration {
        Duration::from_secs(self.forecast_ttl_seconds)
    }

    #[must_use]
    pub fn adm_list_ttl(&self) -> Duration {
        Duration::from_secs(self.adm_list_ttl_seconds)
    }
}

impl DashboardConfig {
    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("weatherdash.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // WEATHERDASH_API__TIMEOUT_SECONDS=5 etc.
        builder = builder.add_source(
            Environment::with_prefix("WEATHERDASH")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: DashboardConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("weatherdash").join("config.toml"))
    }

    /// Apply default values to empty or zero configuration fields
    pub fn apply_defaults(&mut self) {
        if self.api.forecast_url.is_empty() {
            self.api.forecast_url = default_forecast_url();
        }
        if self.api.adm_list_url.is_empty() {
            self.api.adm_list_url = default_adm_list_url();
        }
        if self.api.timeout_seconds == 0 {
            self.api.timeout_seconds = default_timeout();
        }
        if self.api.user_agent.is_empty() {
            self.api.user_agent = default_user_agent();
        }
        if self.cache.forecast_ttl_seconds == 0 {
            self.cache.forecast_ttl_seconds = default_forecast_ttl();
        }
        if self.cache.adm_list_ttl_seconds == 0 {
            self.cache.adm_list_ttl_seconds = default_adm_list_ttl();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.defaults.region.trim().is_empty() {
            self.defaults.region = default_region();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.api.timeout_seconds > 120 {
            return Err(DashboardError::config("API timeout cannot exceed 120 seconds").into());
        }

        if self.cache.forecast_ttl_seconds > 24 * 3600 {
            return Err(DashboardError::config("Forecast cache TTL cannot exceed 24 hours").into());
        }

        if self.cache.adm_list_ttl_seconds > 7 * 24 * 3600 {
            return Err(
                DashboardError::config("Province table cache TTL cannot exceed 7 days").into(),
            );
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(DashboardError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(DashboardError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("forecast_url", &self.api.forecast_url),
            ("adm_list_url", &self.api.adm_list_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(DashboardError::config(format!(
                    "api.{name} must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}
