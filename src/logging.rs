//! Tracing subscriber setup
//!
//! Logs go to stderr so command output on stdout stays machine readable.

use std::env;
use std::fmt;
use std::io;
use std::str::FromStr;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::SitePotentialError;
use crate::config::LoggingConfig;

/// Output format of the fmt layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = SitePotentialError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(SitePotentialError::config(format!(
                "Invalid log format '{other}'. Must be one of: pretty, compact, json"
            ))),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pretty => "pretty",
            Self::Compact => "compact",
            Self::Json => "json",
        };
        f.write_str(name)
    }
}

/// Filter directive in effect: `verbose` beats `RUST_LOG`, which beats `level`
fn filter_directive(level: &str, rust_log: Option<&str>, verbose: bool) -> String {
    if verbose {
        return "debug".to_string();
    }
    rust_log
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(level)
        .to_string()
}

fn env_filter(level: &str, verbose: bool) -> EnvFilter {
    // HTTP and storage noise stays at warn
    let rust_log = env::var("RUST_LOG").ok();
    EnvFilter::new(filter_directive(level, rust_log.as_deref(), verbose))
        .add_directive(
            "hyper=warn"
                .parse()
                .unwrap_or_else(|_| tracing::Level::WARN.into()),
        )
        .add_directive(
            "reqwest=warn"
                .parse()
                .unwrap_or_else(|_| tracing::Level::WARN.into()),
        )
        .add_directive(
            "fjall=warn"
                .parse()
                .unwrap_or_else(|_| tracing::Level::WARN.into()),
        )
}

/// Install the global subscriber
///
/// `verbose` forces debug level regardless of `RUST_LOG` and `config.level`.
///
/// # Errors
///
/// Returns an error if the format is unknown or a subscriber is already installed
pub fn init(config: &LoggingConfig, verbose: bool) -> Result<()> {
    let format: LogFormat = config.format.parse()?;
    let registry = tracing_subscriber::registry().with(env_filter(&config.level, verbose));

    match format {
        LogFormat::Json => {
            let layer = tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(io::stderr)
                .json();
            registry.with(layer).try_init()?;
        }
        LogFormat::Pretty => {
            let layer = tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(io::stderr);
            registry.with(layer).try_init()?;
        }
        LogFormat::Compact => {
            let layer = tracing_subscriber::fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(io::stderr);
            registry.with(layer).try_init()?;
        }
    }

    info!(version = crate::VERSION, log.level = %config.level, log.format = %format, verbose, "Logging initialised");
    Ok(())
}
