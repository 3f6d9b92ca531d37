//! Reduction of raw weather samples into a [`FeatureSummary`]

use tracing::debug;

use super::stats;
use crate::models::{FeatureSummary, WeatherObservation, WeatherObservationSet};

type Field = fn(&WeatherObservation) -> Option<f64>;

/// Collapses a weather observation set into representative scalars
pub struct FeatureExtractor;

impl FeatureExtractor {
    /// Total over any observation set; an empty set yields all zeros
    #[must_use]
    pub fn extract(observations: &WeatherObservationSet) -> FeatureSummary {
        let column = |field: Field| -> Vec<f64> {
            observations.values(field).filter(|v| v.is_finite()).collect()
        };
        let mean_of = |field: Field| stats::mean(&column(field)).unwrap_or(0.0);

        let temperatures = column(|s| s.temperature);
        let wind_speeds = column(|s| s.wind_speed);

        let summary = FeatureSummary {
            ghi: mean_of(|s| s.global_horizontal_irradiance),
            dni: mean_of(|s| s.direct_normal_irradiance),
            dhi: mean_of(|s| s.diffuse_horizontal_irradiance),
            temperature: stats::mean(&temperatures).unwrap_or(0.0),
            humidity: mean_of(|s| s.relative_humidity),
            uv_index: mean_of(|s| s.uv_index),
            wind_speed: stats::mean(&wind_speeds).unwrap_or(0.0),
            wind_gust: stats::max(&column(|s| s.wind_gust)).unwrap_or(0.0),
            wind_direction: mean_of(|s| s.wind_direction),
            pressure: mean_of(|s| s.pressure_mean_sea_level),
            temp_stability: stats::sample_std(&temperatures).unwrap_or(0.0),
            wind_stability: stats::sample_std(&wind_speeds).unwrap_or(0.0),
            // Reported cloudCover is not a feature; callers may set it explicitly
            cloud_cover: None,
        };

        debug!(samples = observations.len(), ?summary, "Extracted weather features");
        summary
    }
}
