//! Data models for site potential analysis
//!
//! This module contains the domain models organized by concern:
//! - Location: Sites, geocodes and date ranges
//! - Observation: Raw weather samples
//! - Features: Aggregated per-site weather features
//! - Resource: Solar resource climatology
//! - Score: Solar and wind results

pub mod features;
pub mod location;
pub mod observation;
pub mod resource;
pub mod score;

// Re-export all public types for convenient access
pub use features::{Feature, FeatureSummary};
pub use location::{Coordinates, DateRange, Site};
pub use observation::{WeatherObservation, WeatherObservationSet};
pub use resource::{MonthlySolarData, MonthlyValues, SolarResourceProfile};
pub use score::{AnalysisResults, SolarSiteScore, WindSiteScore};
