//! PVWatts-style solar potential scoring
//!
//! Blends the climatology irradiance components by latitude, applies the
//! temperature, humidity, elevation and latitude derates, then adjusts for
//! seasonal variability and cloud cover before normalising to a score.

use tracing::debug;

use super::model::SolarModel;
use super::stats;
use crate::models::{FeatureSummary, SolarResourceProfile, SolarSiteScore};

/// Intermediate factors of one solar evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarBreakdown {
    pub effective_irradiance: f64,
    pub temperature_derate: f64,
    pub humidity_derate: f64,
    pub elevation_derate: f64,
    pub latitude_factor: f64,
    pub combined_derate: f64,
    pub seasonal_factor: f64,
    pub cloud_factor: f64,
    pub daily_energy_kwh: f64,
    /// Clamped to `0..=score_ceiling`, before the reporting scale
    pub raw_score: f64,
}

#[derive(Debug, Clone, Default)]
pub struct SolarScorer {
    model: SolarModel,
}

impl SolarScorer {
    #[must_use]
    pub fn new(model: SolarModel) -> Self {
        Self { model }
    }

    #[must_use]
    pub fn model(&self) -> &SolarModel {
        &self.model
    }

    /// Score a site. Without a resource profile the result is all zeros.
    #[must_use]
    pub fn score(
        &self,
        location: &str,
        features: &FeatureSummary,
        elevation_m: f64,
        resource: Option<&SolarResourceProfile>,
        latitude: f64,
    ) -> SolarSiteScore {
        let Some(resource) = resource else {
            debug!(location, "No solar resource profile, reporting zero solar potential");
            return SolarSiteScore::zeroed(location);
        };

        let breakdown = self.evaluate(features, elevation_m, resource, latitude);
        debug!(location, ?breakdown, "Solar evaluation");

        SolarSiteScore {
            location: location.to_string(),
            // The clamp bounds the raw score to 0..=100 but the reported
            // figure is scaled again; consumers rely on the 0..=10000 range.
            solar_score: breakdown.raw_score * self.model.reported_score_scale,
            avg_solar_irradiance: breakdown.effective_irradiance
                * self.model.irradiance_report_scale,
            avg_temperature: features.temperature,
            avg_humidity: features.humidity,
            avg_uv_index: features.uv_index,
            elevation_meters: elevation_m,
            estimated_daily_output_kwh: breakdown.daily_energy_kwh,
            pvwatts_derate: breakdown.combined_derate,
        }
    }

    /// Run the full model and return every intermediate factor
    #[must_use]
    pub fn evaluate(
        &self,
        features: &FeatureSummary,
        elevation_m: f64,
        resource: &SolarResourceProfile,
        latitude: f64,
    ) -> SolarBreakdown {
        let m = &self.model;
        let abs_lat = latitude.abs();

        let effective_irradiance = self.effective_irradiance(resource, abs_lat);
        let temperature_derate = self.temperature_derate(features.temperature, features.humidity);
        let humidity_derate = self.humidity_derate(features.humidity);
        let elevation_derate = self.elevation_derate(elevation_m);
        let latitude_factor = self.latitude_factor(abs_lat);

        let combined_derate = m.base_derate
            * temperature_derate
            * humidity_derate
            * elevation_derate
            * latitude_factor;

        let mut daily_energy_kwh = m.system_capacity_kw * effective_irradiance * combined_derate;

        let seasonal_factor = resource
            .monthly_ghi
            .as_ref()
            .map_or(1.0, |monthly| {
                let values: Vec<f64> = monthly.values().copied().collect();
                self.seasonal_factor(&values, abs_lat)
            });
        daily_energy_kwh *= seasonal_factor;

        let cloud_factor = features.cloud_cover.map_or(1.0, |cc| self.cloud_factor(cc));
        daily_energy_kwh *= cloud_factor;

        let normaliser = m.system_capacity_kw * m.hours_per_day * m.reference_capacity_factor;
        let raw_score = (daily_energy_kwh / normaliser * 100.0).clamp(0.0, m.score_ceiling);

        SolarBreakdown {
            effective_irradiance,
            temperature_derate,
            humidity_derate,
            elevation_derate,
            latitude_factor,
            combined_derate,
            seasonal_factor,
            cloud_factor,
            daily_energy_kwh,
            raw_score,
        }
    }

    /// Latitude-weighted GHI/DNI blend, dominated by the tilted-plane figure when present
    #[must_use]
    pub fn effective_irradiance(&self, resource: &SolarResourceProfile, abs_lat: f64) -> f64 {
        let m = &self.model;
        let daily_ghi = resource.annual_ghi / m.days_per_year;
        let daily_dni = resource.annual_dni / m.days_per_year;

        let dni_weight = m
            .dni_weight_max
            .min(m.dni_weight_base + abs_lat / m.dni_weight_lat_divisor);
        let ghi_weight = 1.0 - dni_weight;
        let blended = daily_ghi * ghi_weight + daily_dni * dni_weight;

        match resource.annual_lat_tilt {
            Some(lat_tilt) => {
                let tilt_daily = lat_tilt / m.days_per_year;
                tilt_daily * m.lat_tilt_weight + blended * (1.0 - m.lat_tilt_weight)
            }
            None => blended,
        }
    }

    #[must_use]
    pub fn temperature_derate(&self, avg_temp: f64, humidity: f64) -> f64 {
        let m = &self.model;
        if avg_temp <= m.reference_temp_c {
            1.0 + (avg_temp - m.reference_temp_c).abs() * m.cool_bonus_per_degree
        } else if avg_temp <= m.hot_threshold_c {
            let humidity_factor = (humidity / m.warm_humidity_reference).min(1.0);
            1.0 + (avg_temp - m.reference_temp_c) * m.temp_coefficient * humidity_factor
        } else {
            let humidity_factor = (humidity / m.hot_humidity_reference).min(1.0);
            1.0 + (m.hot_threshold_c - m.reference_temp_c) * m.temp_coefficient * humidity_factor
                + (avg_temp - m.hot_threshold_c) * m.temp_coefficient * humidity_factor
        }
    }

    #[must_use]
    pub fn humidity_derate(&self, humidity: f64) -> f64 {
        let m = &self.model;
        if humidity < m.dry_humidity_threshold {
            m.dry_humidity_derate
        } else if humidity < m.humid_threshold {
            1.0 - (humidity - m.dry_humidity_threshold) * m.moderate_humidity_slope
        } else {
            m.humid_base_derate - (humidity - m.humid_threshold) * m.humid_slope
        }
    }

    #[must_use]
    pub fn elevation_derate(&self, elevation_m: f64) -> f64 {
        let m = &self.model;
        let benefit = (elevation_m / 1000.0) * m.elevation_gain_per_km;
        1.0 + benefit.min(m.elevation_gain_cap)
    }

    #[must_use]
    pub fn latitude_factor(&self, abs_lat: f64) -> f64 {
        let m = &self.model;
        if abs_lat <= m.tropics_lat {
            m.tropics_factor
        } else if abs_lat <= m.subtropics_lat {
            m.subtropics_factor
        } else if abs_lat <= m.midlat_lat {
            1.0 - (abs_lat - m.subtropics_lat) * m.midlat_slope
        } else {
            m.high_lat_base - (abs_lat - m.midlat_lat) * m.high_lat_slope
        }
    }

    /// Penalty for monthly GHI varying more than the latitude explains
    #[must_use]
    pub fn seasonal_factor(&self, monthly: &[f64], abs_lat: f64) -> f64 {
        let m = &self.model;
        let (Some(mean), Some(std)) = (stats::mean(monthly), stats::population_std(monthly)) else {
            return 1.0;
        };
        if mean <= 0.0 {
            return 1.0;
        }

        let seasonal_variation = std / mean;
        let expected_variation = m
            .expected_variation_cap
            .min(abs_lat / m.expected_variation_lat_divisor);

        if seasonal_variation > expected_variation {
            1.0 - (seasonal_variation - expected_variation) * m.seasonal_penalty
        } else {
            1.0
        }
    }

    /// Cloud cover in percent
    #[must_use]
    pub fn cloud_factor(&self, cloud_cover: f64) -> f64 {
        let m = &self.model;
        if cloud_cover < m.clear_sky_threshold {
            1.0 - (cloud_cover / 100.0) * m.clear_sky_slope
        } else if cloud_cover < m.overcast_threshold {
            m.partly_cloudy_base - (cloud_cover - m.clear_sky_threshold) / 100.0 * m.partly_cloudy_slope
        } else {
            m.overcast_base - (cloud_cover - m.overcast_threshold) / 100.0 * m.overcast_slope
        }
    }
}
