//! Solar resource climatology for a coordinate

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Monthly values keyed by month number (1 = January)
pub type MonthlyValues = BTreeMap<u32, f64>;

/// External climatology record for one coordinate
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct SolarResourceProfile {
    /// Annual GHI figure; the solar model divides it by 365
    pub annual_ghi: f64,
    /// Annual DNI figure
    pub annual_dni: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_ghi: Option<MonthlyValues>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_dni: Option<MonthlyValues>,
    /// Average irradiance on a latitude-tilted plane
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_lat_tilt: Option<f64>,
}

impl SolarResourceProfile {
    #[must_use]
    pub fn new(annual_ghi: f64, annual_dni: f64) -> Self {
        Self {
            annual_ghi,
            annual_dni,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_monthly_ghi(mut self, monthly: MonthlyValues) -> Self {
        self.monthly_ghi = Some(monthly);
        self
    }

    #[must_use]
    pub fn with_monthly_dni(mut self, monthly: MonthlyValues) -> Self {
        self.monthly_dni = Some(monthly);
        self
    }

    #[must_use]
    pub fn with_lat_tilt(mut self, annual_lat_tilt: f64) -> Self {
        self.annual_lat_tilt = Some(annual_lat_tilt);
        self
    }
}

/// Monthly climatology view of a site
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MonthlySolarData {
    pub location: String,
    pub coordinates: String,
    pub monthly_ghi: MonthlyValues,
    pub monthly_dni: MonthlyValues,
}

impl MonthlySolarData {
    /// Build the monthly view; `None` when the profile carries no monthly GHI
    #[must_use]
    pub fn from_profile(location: &str, coordinates: &str, profile: &SolarResourceProfile) -> Option<Self> {
        let monthly_ghi = profile.monthly_ghi.clone()?;
        Some(Self {
            location: location.to_string(),
            coordinates: coordinates.to_string(),
            monthly_ghi,
            monthly_dni: profile.monthly_dni.clone().unwrap_or_default(),
        })
    }
}
