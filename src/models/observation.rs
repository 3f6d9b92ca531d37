//! Raw weather observation model
//!
//! Field names follow the weather platform's hourly record (camelCase). Every
//! measurement is optional per sample; absence stays "no data" until feature
//! extraction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single timestamped weather sample
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeatherObservation {
    /// Observation time, epoch seconds on the wire
    #[serde(
        default,
        rename = "validTimeUtc",
        alias = "timestamp",
        with = "chrono::serde::ts_seconds_option"
    )]
    pub timestamp: Option<DateTime<Utc>>,
    /// Global horizontal irradiance in W/m²
    #[serde(default)]
    pub global_horizontal_irradiance: Option<f64>,
    /// Direct normal irradiance in W/m²
    #[serde(default)]
    pub direct_normal_irradiance: Option<f64>,
    /// Diffuse horizontal irradiance in W/m²
    #[serde(default)]
    pub diffuse_horizontal_irradiance: Option<f64>,
    /// Temperature in Celsius
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Relative humidity in percent
    #[serde(default)]
    pub relative_humidity: Option<f64>,
    #[serde(default)]
    pub uv_index: Option<f64>,
    /// Wind speed in m/s
    #[serde(default)]
    pub wind_speed: Option<f64>,
    /// Wind gust speed in m/s
    #[serde(default)]
    pub wind_gust: Option<f64>,
    /// Wind direction in degrees (0-360, where 0/360 is North)
    #[serde(default)]
    pub wind_direction: Option<f64>,
    /// Mean sea-level pressure in hPa
    #[serde(default)]
    pub pressure_mean_sea_level: Option<f64>,
    /// Cloud cover percentage (0-100)
    #[serde(default)]
    pub cloud_cover: Option<f64>,
}

/// Ordered sequence of weather samples for one site and date range
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct WeatherObservationSet {
    pub samples: Vec<WeatherObservation>,
}

impl WeatherObservationSet {
    #[must_use]
    pub fn new(samples: Vec<WeatherObservation>) -> Self {
        Self { samples }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Present values of one field, in sample order
    pub fn values<F>(&self, field: F) -> impl Iterator<Item = f64> + '_
    where
        F: Fn(&WeatherObservation) -> Option<f64> + 'static,
    {
        self.samples.iter().filter_map(move |s| field(s))
    }
}

impl From<Vec<WeatherObservation>> for WeatherObservationSet {
    fn from(samples: Vec<WeatherObservation>) -> Self {
        Self::new(samples)
    }
}
