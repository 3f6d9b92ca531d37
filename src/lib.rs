//! Site potential scoring engine
//!
//! Turns raw weather observations for candidate sites into summary features,
//! then into comparable solar and wind potential scores with estimated daily
//! energy output, using a PVWatts-style solar derate model and a simplified
//! turbine power curve.

pub mod analysis;
pub mod cache;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod scoring;
pub mod sources;

// Re-export core types for public API
pub use analysis::{ElevationSource, SiteAnalyzer, SolarResourceSource, WeatherSource};
pub use cache::{CachedWeatherSource, MemoryWeatherCache, PersistentWeatherCache, WeatherCache};
pub use config::SitePotentialConfig;
pub use error::SitePotentialError;
pub use models::{
    AnalysisResults, Coordinates, DateRange, FeatureSummary, MonthlySolarData, Site,
    SolarResourceProfile, SolarSiteScore, WeatherObservation, WeatherObservationSet,
    WindSiteScore,
};
pub use scoring::{FeatureExtractor, SolarScorer, WindScorer};
pub use sources::{InlineSiteData, NrelClient, Offline};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, SitePotentialError>;
