//! `site-potential` command line interface
//!
//! ```bash
//! # Score every active site of an input file for June 2024
//! site-potential analyze --input sites.json --start 2024-06-01 --end 2024-06-30 --pretty
//!
//! # Score without contacting the solar resource API
//! site-potential analyze --input sites.json --start 2024-06-01 --end 2024-06-30 --offline
//!
//! # Monthly irradiance climatology for each active site
//! site-potential monthly --input sites.json
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};

use site_potential::analysis::{SiteAnalyzer, SolarResourceSource, WeatherSource};
use site_potential::cache::{CachedWeatherSource, MemoryWeatherCache, PersistentWeatherCache, WeatherCache};
use site_potential::config::{CacheConfig, SitePotentialConfig};
use site_potential::models::DateRange;
use site_potential::sources::{InlineSiteData, NrelClient, Offline};
use site_potential::{SitePotentialError, logging};

#[derive(Parser)]
#[command(
    name = "site-potential",
    version,
    about = "Score candidate sites for solar and wind energy potential"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging (overrides RUST_LOG and the configured level)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Score all active sites of an input file
    Analyze {
        /// JSON file with sites and their observations
        #[arg(long, short = 'i')]
        input: PathBuf,

        /// First day of the observation window (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,

        /// Last day of the observation window (YYYY-MM-DD)
        #[arg(long)]
        end: NaiveDate,

        /// Skip the solar resource API; solar results are zeroed
        #[arg(long)]
        offline: bool,

        /// Bypass the weather fetch cache
        #[arg(long)]
        no_cache: bool,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Print monthly GHI/DNI climatology for all active sites
    Monthly {
        #[arg(long, short = 'i')]
        input: PathBuf,

        #[arg(long)]
        pretty: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli).await.inspect_err(|e| {
        if let Some(err) = e.downcast_ref::<SitePotentialError>() {
            eprintln!("{}", err.user_message());
        }
    })
}

async fn run(cli: Cli) -> Result<()> {
    let config = SitePotentialConfig::load_from_path(cli.config.clone())?;
    logging::init(&config.logging, cli.verbose)?;

    match cli.command {
        Command::Analyze {
            input,
            start,
            end,
            offline,
            no_cache,
            pretty,
        } => {
            let range = DateRange::new(start, end)?;
            let data = Arc::new(InlineSiteData::from_path(&input)?);
            let sites = data.active_sites();

            let weather: Arc<dyn WeatherSource> = if config.cache.enabled && !no_cache {
                Arc::new(
                    CachedWeatherSource::new(data.clone(), open_cache(&config.cache))
                        .with_namespace(data.fingerprint()),
                )
            } else {
                data.clone()
            };
            let resource = resource_source(&config, offline)?;

            let analyzer = SiteAnalyzer::new(weather, data, resource)
                .with_max_concurrency(config.analysis.max_concurrent_sites);
            let results = analyzer.analyze(&sites, &range).await;

            print_json(&results, pretty)?;
        }
        Command::Monthly { input, pretty } => {
            let data = InlineSiteData::from_path(&input)?;
            let analyzer = SiteAnalyzer::new(Offline, Offline, resource_source(&config, false)?);

            let mut monthly = Vec::new();
            for site in data.active_sites() {
                match analyzer.monthly_data(&site).await {
                    Ok(Some(entry)) => monthly.push(entry),
                    Ok(None) => warn!(site = %site.name, "No monthly solar data available"),
                    Err(e) => warn!(site = %site.name, error = %e, "Monthly solar data lookup failed"),
                }
            }

            print_json(&monthly, pretty)?;
        }
    }

    Ok(())
}

fn resource_source(config: &SitePotentialConfig, offline: bool) -> Result<Arc<dyn SolarResourceSource>> {
    if offline {
        info!("Offline mode, solar resource lookups disabled");
        return Ok(Arc::new(Offline));
    }
    let client = NrelClient::new(&config.nrel).context("Failed to create NREL client")?;
    Ok(Arc::new(client))
}

fn open_cache(config: &CacheConfig) -> Arc<dyn WeatherCache> {
    let path = config.cache_dir();
    let ttl = Duration::from_secs(config.ttl_hours * 3600);

    match PersistentWeatherCache::open(&path, ttl) {
        Ok(cache) => {
            info!(path = %path.display(), ttl_hours = config.ttl_hours, "Using persistent weather cache");
            Arc::new(cache)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Persistent cache unavailable, using in-memory cache");
            Arc::new(MemoryWeatherCache::new())
        }
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{json}");
    Ok(())
}
