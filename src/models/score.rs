//! Per-site scoring results
//!
//! Field names are the wire names consumed downstream; do not rename.

use serde::{Deserialize, Serialize};

/// Solar potential of one site
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SolarSiteScore {
    pub location: String,
    /// Reported score, on a 0-10000 scale
    pub solar_score: f64,
    /// Effective irradiance, scaled by 1000
    pub avg_solar_irradiance: f64,
    pub avg_temperature: f64,
    pub avg_humidity: f64,
    pub avg_uv_index: f64,
    pub elevation_meters: f64,
    pub estimated_daily_output_kwh: f64,
    /// Combined derate factor applied to the irradiance
    pub pvwatts_derate: f64,
}

impl SolarSiteScore {
    /// Result for a site without solar resource data
    #[must_use]
    pub fn zeroed(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            solar_score: 0.0,
            avg_solar_irradiance: 0.0,
            avg_temperature: 0.0,
            avg_humidity: 0.0,
            avg_uv_index: 0.0,
            elevation_meters: 0.0,
            estimated_daily_output_kwh: 0.0,
            pvwatts_derate: 0.0,
        }
    }

    /// Numeric fields in declaration order
    #[must_use]
    pub fn numeric_fields(&self) -> [f64; 8] {
        [
            self.solar_score,
            self.avg_solar_irradiance,
            self.avg_temperature,
            self.avg_humidity,
            self.avg_uv_index,
            self.elevation_meters,
            self.estimated_daily_output_kwh,
            self.pvwatts_derate,
        ]
    }
}

/// Wind potential of one site
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WindSiteScore {
    pub location: String,
    /// Unbounded above
    pub wind_score: f64,
    pub avg_wind_speed: f64,
    pub max_wind_gust: f64,
    pub wind_direction: f64,
    pub pressure: f64,
    pub wind_stability: f64,
    pub elevation_meters: f64,
    pub estimated_daily_output_kwh: f64,
}

impl WindSiteScore {
    /// Numeric fields in declaration order
    #[must_use]
    pub fn numeric_fields(&self) -> [f64; 8] {
        [
            self.wind_score,
            self.avg_wind_speed,
            self.max_wind_gust,
            self.wind_direction,
            self.pressure,
            self.wind_stability,
            self.elevation_meters,
            self.estimated_daily_output_kwh,
        ]
    }
}

/// Output of one analysis run; both lists are index-aligned
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct AnalysisResults {
    pub solar_results: Vec<SolarSiteScore>,
    pub wind_results: Vec<WindSiteScore>,
}

impl AnalysisResults {
    #[must_use]
    pub fn len(&self) -> usize {
        self.solar_results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.solar_results.is_empty()
    }
}

impl From<(Vec<SolarSiteScore>, Vec<WindSiteScore>)> for AnalysisResults {
    fn from((solar_results, wind_results): (Vec<SolarSiteScore>, Vec<WindSiteScore>)) -> Self {
        Self {
            solar_results,
            wind_results,
        }
    }
}
