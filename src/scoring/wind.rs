//! Wind potential scoring with a simplified power-curve estimate

use tracing::debug;

use super::model::WindModel;
use crate::models::{FeatureSummary, WindSiteScore};

#[derive(Debug, Clone, Default)]
pub struct WindScorer {
    model: WindModel,
}

impl WindScorer {
    #[must_use]
    pub fn new(model: WindModel) -> Self {
        Self { model }
    }

    #[must_use]
    pub fn model(&self) -> &WindModel {
        &self.model
    }

    /// Score a site; `wind_score` is not clamped
    #[must_use]
    pub fn score(&self, location: &str, features: &FeatureSummary, elevation_m: f64) -> WindSiteScore {
        let m = &self.model;
        let elevation_factor = self.elevation_factor(elevation_m);

        let wind_score = (features.wind_speed * m.speed_weight
            + features.wind_gust * m.gust_weight
            + (m.stability_reference - features.wind_stability) * m.stability_weight)
            * elevation_factor;

        let wind_output = self.daily_output_kwh(features.wind_speed * elevation_factor);

        debug!(location, elevation_factor, wind_score, wind_output, "Wind evaluation");

        WindSiteScore {
            location: location.to_string(),
            wind_score,
            avg_wind_speed: features.wind_speed,
            max_wind_gust: features.wind_gust,
            wind_direction: features.wind_direction,
            pressure: features.pressure,
            wind_stability: features.wind_stability,
            elevation_meters: elevation_m,
            estimated_daily_output_kwh: wind_output,
        }
    }

    /// Non-decreasing in elevation, capped at `elevation_factor_cap`
    #[must_use]
    pub fn elevation_factor(&self, elevation_m: f64) -> f64 {
        let m = &self.model;
        (1.0 + elevation_m / m.elevation_scale_m).min(m.elevation_factor_cap)
    }

    /// Turbine output in kWh/day at a hub wind speed in m/s
    #[must_use]
    pub fn daily_output_kwh(&self, hub_wind_speed: f64) -> f64 {
        let m = &self.model;
        0.5 * m.air_density * m.swept_area() * hub_wind_speed.powi(3) * m.power_coefficient
            * m.hours_per_day
            / m.watts_per_kw
    }
}
