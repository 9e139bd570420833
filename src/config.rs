//! Configuration management for the `AirDash` application
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::AirDashError;
use crate::models::{Coordinates, Location};
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `AirDash` application
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AirDashConfig {
    /// Upstream API configuration
    #[serde(default)]
    pub api: ApiConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Default application settings
    #[serde(default)]
    pub defaults: DefaultsConfig,
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// Open-Meteo endpoints and HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the geocoding API
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,
    /// Base URL of the air quality API
    #[serde(default = "default_air_quality_url")]
    pub air_quality_url: String,
    /// Base URL of the weather forecast API
    #[serde(default = "default_weather_url")]
    pub weather_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_api_timeout")]
    pub timeout_seconds: u32,
    /// Maximum number of retries for transient failures
    #[serde(default = "default_api_max_retries")]
    pub max_retries: u32,
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

/// Location used when neither geolocation nor a previous refresh is available
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    #[serde(default = "default_longitude")]
    pub longitude: f64,
    #[serde(default = "default_location_name")]
    pub location_name: String,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

// Default value functions
fn default_geocoding_url() -> String {
    "https://geocoding-api.open-meteo.com/v1".to_string()
}

fn default_air_quality_url() -> String {
    "https://air-quality-api.open-meteo.com/v1".to_string()
}

fn default_weather_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_api_timeout() -> u32 {
    30
}

fn default_api_max_retries() -> u32 {
    3
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_latitude() -> f64 {
    52.52
}

fn default_longitude() -> f64 {
    13.41
}

fn default_location_name() -> String {
    "Berlin".to_string()
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            geocoding_url: default_geocoding_url(),
            air_quality_url: default_air_quality_url(),
            weather_url: default_weather_url(),
            timeout_seconds: default_api_timeout(),
            max_retries: default_api_max_retries(),
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
            latitude: default_latitude(),
            longitude: default_longitude(),
            location_name: default_location_name(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

impl DefaultsConfig {
    /// The configured fallback location
    #[must_use]
    pub fn location(&self) -> Location {
        Location::new(self.latitude, self.longitude, self.location_name.clone())
    }
}

impl AirDashConfig {
    /// Load configuration from file and environment variables.
    ///
    /// An explicit `config_path` must exist; the default location is optional.
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = match config_path {
            Some(path) if !path.exists() => {
                return Err(AirDashError::config(format!(
                    "Config file not found: {}",
                    path.display()
                ))
                .into());
            }
            Some(path) => path,
            None => Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml")),
        };

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. AIRDASH_API__TIMEOUT_SECONDS=10
        builder = builder.add_source(
            Environment::with_prefix("AIRDASH")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: AirDashConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        // Apply defaults for missing values
        config.apply_defaults();

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("airdash").join("config.toml"))
    }

    /// Apply default values to empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.api.geocoding_url.is_empty() {
            self.api.geocoding_url = default_geocoding_url();
        }
        if self.api.air_quality_url.is_empty() {
            self.api.air_quality_url = default_air_quality_url();
        }
        if self.api.weather_url.is_empty() {
            self.api.weather_url = default_weather_url();
        }
        if self.api.timeout_seconds == 0 {
            self.api.timeout_seconds = default_api_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.defaults.location_name.is_empty() {
            self.defaults.location_name = default_location_name();
        }
        if self.server.bind_address.is_empty() {
            self.server.bind_address = default_bind_address();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.api.timeout_seconds > 300 {
            return Err(AirDashError::config("API timeout cannot exceed 300 seconds").into());
        }

        if self.api.max_retries > 10 {
            return Err(AirDashError::config("API max retries cannot exceed 10").into());
        }

        let fallback = Coordinates::new(self.defaults.latitude, self.defaults.longitude);
        if !fallback.is_valid() {
            return Err(AirDashError::config(format!(
                "Default coordinates out of range: {}",
                fallback.format()
            ))
            .into());
        }

        if self.server.port == 0 {
            return Err(AirDashError::config("Server port cannot be 0").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(AirDashError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(AirDashError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("geocoding_url", &self.api.geocoding_url),
            ("air_quality_url", &self.api.air_quality_url),
            ("weather_url", &self.api.weather_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(AirDashError::config(format!(
                    "API {name} must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}
