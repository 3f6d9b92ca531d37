//! Aggregated weather features for one site

use std::fmt;

use serde::{Deserialize, Serialize};

/// Named scalar features derived from a [`WeatherObservationSet`].
///
/// A feature with no source data is `0.0`, which downstream scorers cannot
/// tell apart from a measured zero. Cloud cover is the exception: extraction
/// never fills it, so the cloud adjustment only applies when a caller sets it.
///
/// [`WeatherObservationSet`]: crate::models::WeatherObservationSet
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq)]
pub struct FeatureSummary {
    pub ghi: f64,
    pub dni: f64,
    pub dhi: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub uv_index: f64,
    pub wind_speed: f64,
    /// Maximum gust over the range
    pub wind_gust: f64,
    pub wind_direction: f64,
    pub pressure: f64,
    /// Sample standard deviation of temperature
    pub temp_stability: f64,
    /// Sample standard deviation of wind speed
    pub wind_stability: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_cover: Option<f64>,
}

/// Feature keys of the flat mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Ghi,
    Dni,
    Dhi,
    Temperature,
    Humidity,
    UvIndex,
    WindSpeed,
    WindGust,
    WindDirection,
    Pressure,
    TempStability,
    WindStability,
    CloudCover,
}

impl Feature {
    pub const ALL: [Feature; 13] = [
        Feature::Ghi,
        Feature::Dni,
        Feature::Dhi,
        Feature::Temperature,
        Feature::Humidity,
        Feature::UvIndex,
        Feature::WindSpeed,
        Feature::WindGust,
        Feature::WindDirection,
        Feature::Pressure,
        Feature::TempStability,
        Feature::WindStability,
        Feature::CloudCover,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Feature::Ghi => "ghi",
            Feature::Dni => "dni",
            Feature::Dhi => "dhi",
            Feature::Temperature => "temperature",
            Feature::Humidity => "humidity",
            Feature::UvIndex => "uv_index",
            Feature::WindSpeed => "wind_speed",
            Feature::WindGust => "wind_gust",
            Feature::WindDirection => "wind_direction",
            Feature::Pressure => "pressure",
            Feature::TempStability => "temp_stability",
            Feature::WindStability => "wind_stability",
            Feature::CloudCover => "cloud_cover",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FeatureSummary {
    /// Look up a feature by key; absent features resolve to `0.0`
    #[must_use]
    pub fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Ghi => self.ghi,
            Feature::Dni => self.dni,
            Feature::Dhi => self.dhi,
            Feature::Temperature => self.temperature,
            Feature::Humidity => self.humidity,
            Feature::UvIndex => self.uv_index,
            Feature::WindSpeed => self.wind_speed,
            Feature::WindGust => self.wind_gust,
            Feature::WindDirection => self.wind_direction,
            Feature::Pressure => self.pressure,
            Feature::TempStability => self.temp_stability,
            Feature::WindStability => self.wind_stability,
            Feature::CloudCover => self.cloud_cover.unwrap_or(0.0),
        }
    }
}
