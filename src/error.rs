//! Error types for the site potential collaborators and application glue
//!
//! The scoring core itself is total and never produces these; they surface
//! only where inputs are obtained (configuration, HTTP, cache, files).

use thiserror::Error;

/// Main error type for the `site-potential` crate
#[derive(Error, Debug)]
pub enum SitePotentialError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Remote data provider errors
    #[error("API error: {message}")]
    Api { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Weather cache errors
    #[error("Cache error: {message}")]
    Cache { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// JSON decoding errors
    #[error("Parse error: {source}")]
    Parse {
        #[from]
        source: serde_json::Error,
    },
}

impl SitePotentialError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new cache error
    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            SitePotentialError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            SitePotentialError::Api { .. } => {
                "Unable to reach the solar resource service. Please check your internet connection."
                    .to_string()
            }
            SitePotentialError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            SitePotentialError::Cache { .. } => {
                "Weather cache operation failed. You may need to clear your cache.".to_string()
            }
            SitePotentialError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            SitePotentialError::Parse { .. } => {
                "Input file is not valid JSON for a site list.".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for SitePotentialError {
    fn from(err: reqwest::Error) -> Self {
        SitePotentialError::api(err.to_string())
    }
}

impl From<reqwest_middleware::Error> for SitePotentialError {
    fn from(err: reqwest_middleware::Error) -> Self {
        SitePotentialError::api(err.to_string())
    }
}
