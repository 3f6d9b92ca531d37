//! Coefficient tables for the solar and wind models
//!
//! Every threshold and coefficient used by the scorers lives here so the
//! model can be audited or swapped without touching control flow.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// PVWatts-style solar model coefficients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarModel {
    /// Nameplate capacity in kW
    pub system_capacity_kw: f64,
    pub base_derate: f64,
    pub days_per_year: f64,

    // irradiance blend
    pub dni_weight_base: f64,
    pub dni_weight_max: f64,
    /// Latitude (degrees) per unit of extra DNI weight
    pub dni_weight_lat_divisor: f64,
    pub lat_tilt_weight: f64,

    // temperature
    pub reference_temp_c: f64,
    pub temp_coefficient: f64,
    pub cool_bonus_per_degree: f64,
    pub hot_threshold_c: f64,
    pub warm_humidity_reference: f64,
    pub hot_humidity_reference: f64,

    // humidity
    pub dry_humidity_threshold: f64,
    pub dry_humidity_derate: f64,
    pub humid_threshold: f64,
    pub moderate_humidity_slope: f64,
    pub humid_base_derate: f64,
    pub humid_slope: f64,

    // elevation
    pub elevation_gain_per_km: f64,
    pub elevation_gain_cap: f64,

    // latitude
    pub tropics_lat: f64,
    pub tropics_factor: f64,
    pub subtropics_lat: f64,
    pub subtropics_factor: f64,
    pub midlat_lat: f64,
    pub midlat_slope: f64,
    pub high_lat_base: f64,
    pub high_lat_slope: f64,

    // seasonal variation
    pub expected_variation_cap: f64,
    pub expected_variation_lat_divisor: f64,
    pub seasonal_penalty: f64,

    // cloud cover (percent)
    pub clear_sky_threshold: f64,
    pub clear_sky_slope: f64,
    pub overcast_threshold: f64,
    pub partly_cloudy_base: f64,
    pub partly_cloudy_slope: f64,
    pub overcast_base: f64,
    pub overcast_slope: f64,

    // normalisation
    pub hours_per_day: f64,
    pub reference_capacity_factor: f64,
    pub score_ceiling: f64,
    pub reported_score_scale: f64,
    pub irradiance_report_scale: f64,
}

impl Default for SolarModel {
    fn default() -> Self {
        Self {
            system_capacity_kw: 1000.0,
            base_derate: 0.84,
            days_per_year: 365.0,

            dni_weight_base: 0.3,
            dni_weight_max: 0.55,
            dni_weight_lat_divisor: 180.0,
            lat_tilt_weight: 0.8,

            reference_temp_c: 25.0,
            temp_coefficient: -0.0035,
            cool_bonus_per_degree: 0.0005,
            hot_threshold_c: 45.0,
            warm_humidity_reference: 60.0,
            hot_humidity_reference: 50.0,

            dry_humidity_threshold: 40.0,
            dry_humidity_derate: 1.02,
            humid_threshold: 70.0,
            moderate_humidity_slope: 0.0004,
            humid_base_derate: 0.988,
            humid_slope: 0.001,

            elevation_gain_per_km: 0.03,
            elevation_gain_cap: 0.06,

            tropics_lat: 23.5,
            tropics_factor: 1.05,
            subtropics_lat: 35.0,
            subtropics_factor: 1.08,
            midlat_lat: 50.0,
            midlat_slope: 0.006,
            high_lat_base: 0.91,
            high_lat_slope: 0.012,

            expected_variation_cap: 0.4,
            expected_variation_lat_divisor: 140.0,
            seasonal_penalty: 0.9,

            clear_sky_threshold: 20.0,
            clear_sky_slope: 0.1,
            overcast_threshold: 50.0,
            partly_cloudy_base: 0.98,
            partly_cloudy_slope: 0.4,
            overcast_base: 0.86,
            overcast_slope: 0.7,

            hours_per_day: 24.0,
            reference_capacity_factor: 0.3,
            score_ceiling: 100.0,
            reported_score_scale: 100.0,
            irradiance_report_scale: 1000.0,
        }
    }
}

/// Wind power-curve model coefficients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindModel {
    /// Metres of elevation per unit of elevation factor
    pub elevation_scale_m: f64,
    pub elevation_factor_cap: f64,

    pub speed_weight: f64,
    pub gust_weight: f64,
    pub stability_weight: f64,
    /// Wind speed deviation at which stability contributes nothing
    pub stability_reference: f64,

    /// kg/m³
    pub air_density: f64,
    /// metres
    pub rotor_diameter: f64,
    pub power_coefficient: f64,
    pub hours_per_day: f64,
    pub watts_per_kw: f64,
}

impl WindModel {
    /// Rotor swept area in m²
    #[must_use]
    pub fn swept_area(&self) -> f64 {
        let radius = self.rotor_diameter / 2.0;
        PI * radius * radius
    }
}

impl Default for WindModel {
    fn default() -> Self {
        Self {
            elevation_scale_m: 1500.0,
            elevation_factor_cap: 1.4,

            speed_weight: 0.5,
            gust_weight: 0.3,
            stability_weight: 0.2,
            stability_reference: 10.0,

            air_density: 1.225,
            rotor_diameter: 80.0,
            power_coefficient: 0.35,
            hours_per_day: 24.0,
            watts_per_kw: 1000.0,
        }
    }
}
