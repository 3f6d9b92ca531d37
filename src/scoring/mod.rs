//! Site potential scoring engine
//!
//! Pure, synchronous and total:
//! - [`FeatureExtractor`] reduces raw observations to a [`FeatureSummary`]
//! - [`SolarScorer`] turns features plus a solar resource profile into a solar score
//! - [`WindScorer`] turns features into a wind score via a power-curve model
//!
//! [`FeatureSummary`]: crate::models::FeatureSummary

pub mod features;
pub mod model;
pub mod solar;
pub mod stats;
pub mod wind;

pub use features::FeatureExtractor;
pub use model::{SolarModel, WindModel};
pub use solar::{SolarBreakdown, SolarScorer};
pub use wind::WindScorer;
