//! Configuration management for the site potential engine
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::SitePotentialError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SitePotentialConfig {
    /// NREL solar resource API configuration
    #[serde(default)]
    pub nrel: NrelConfig,
    /// Weather fetch cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Batch analysis settings
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// NREL API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NrelConfig {
    /// API key; the public demo key is heavily rate limited
    #[serde(default = "default_nrel_api_key")]
    pub api_key: String,
    /// Solar resource endpoint
    #[serde(default = "default_nrel_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_nrel_timeout")]
    pub timeout_seconds: u64,
    /// Retries for transient failures, 0 disables retrying
    #[serde(default = "default_nrel_max_retries")]
    pub max_retries: u32,
}

/// Cache configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    /// Cache TTL in hours
    #[serde(default = "default_cache_ttl")]
    pub ttl_hours: u64,
    /// Cache directory location
    #[serde(default = "default_cache_location")]
    pub location: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty, compact or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Sites analysed concurrently
    #[serde(default = "default_max_concurrent_sites")]
    pub max_concurrent_sites: usize,
}

// Default value functions
fn default_nrel_api_key() -> String {
    "DEMO_KEY".to_string()
}

fn default_nrel_base_url() -> String {
    "https://developer.nrel.gov/api/solar/solar_resource/v1.json".to_string()
}

fn default_nrel_timeout() -> u64 {
    30
}

fn default_nrel_max_retries() -> u32 {
    3
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_ttl() -> u64 {
    24
}

fn default_cache_location() -> String {
    "~/.cache/site-potential".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_max_concurrent_sites() -> usize {
    crate::analysis::DEFAULT_MAX_CONCURRENT_SITES
}

impl Default for NrelConfig {
    fn default() -> Self {
        Self {
            api_key: default_nrel_api_key(),
            base_url: default_nrel_base_url(),
            timeout_seconds: default_nrel_timeout(),
            max_retries: default_nrel_max_retries(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            ttl_hours: default_cache_ttl(),
            location: default_cache_location(),
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

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_concurrent_sites: default_max_concurrent_sites(),
        }
    }
}

impl CacheConfig {
    /// Cache directory with a leading `~` expanded to the home directory
    #[must_use]
    pub fn cache_dir(&self) -> PathBuf {
        match self.location.strip_prefix("~/") {
            Some(rest) => dirs::home_dir()
                .map(|home| home.join(rest))
                .unwrap_or_else(|| PathBuf::from(&self.location)),
            None => PathBuf::from(&self.location),
        }
    }
}

impl SitePotentialConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // e.g. SITE_POTENTIAL_NREL__API_KEY
        builder = builder.add_source(
            Environment::with_prefix("SITE_POTENTIAL")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: SitePotentialConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("site-potential").join("config.toml"))
    }

    /// Apply default values to empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.nrel.api_key.is_empty() {
            self.nrel.api_key = default_nrel_api_key();
        }
        if self.nrel.base_url.is_empty() {
            self.nrel.base_url = default_nrel_base_url();
        }
        if self.nrel.timeout_seconds == 0 {
            self.nrel.timeout_seconds = default_nrel_timeout();
        }
        if self.cache.ttl_hours == 0 {
            self.cache.ttl_hours = default_cache_ttl();
        }
        if self.cache.location.is_empty() {
            self.cache.location = default_cache_location();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.nrel.timeout_seconds > 300 {
            return Err(SitePotentialError::config("NREL API timeout cannot exceed 300 seconds").into());
        }

        if self.nrel.max_retries > 10 {
            return Err(SitePotentialError::config("NREL API max retries cannot exceed 10").into());
        }

        if self.cache.ttl_hours > 168 {
            return Err(SitePotentialError::config("Cache TTL cannot exceed 168 hours (1 week)").into());
        }

        if !(1..=64).contains(&self.analysis.max_concurrent_sites) {
            return Err(SitePotentialError::config(
                "Concurrent site analysis must be between 1 and 64",
            )
            .into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(SitePotentialError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        if let Err(e) = self.logging.format.parse::<crate::logging::LogFormat>() {
            return Err(e.into());
        }

        if !self.nrel.base_url.starts_with("http://") && !self.nrel.base_url.starts_with("https://") {
            return Err(
                SitePotentialError::config("NREL API base URL must be a valid HTTP or HTTPS URL").into(),
            );
        }

        Ok(())
    }
}
