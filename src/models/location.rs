//! Site and coordinate models

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::SitePotentialError;

/// Geographic coordinates in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinates {
    /// Create coordinates, validating their ranges
    pub fn new(latitude: f64, longitude: f64) -> crate::Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(SitePotentialError::validation(format!(
                "latitude {latitude} outside [-90, 90]"
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(SitePotentialError::validation(format!(
                "longitude {longitude} outside [-180, 180]"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Round coordinates for cache key generation
    #[must_use]
    pub fn rounded(&self, precision: u32) -> (f64, f64) {
        let multiplier = 10_f64.powi(i32::try_from(precision).unwrap_or(4));
        let lat = (self.latitude * multiplier).round() / multiplier;
        let lon = (self.longitude * multiplier).round() / multiplier;
        (lat, lon)
    }
}

/// Parses the `"lat,lon"` geocode form used by the weather platform
impl FromStr for Coordinates {
    type Err = SitePotentialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| SitePotentialError::validation(format!("geocode '{s}' is not 'lat,lon'")))?;
        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| SitePotentialError::validation(format!("invalid latitude in '{s}'")))?;
        let lon: f64 = lon
            .trim()
            .parse()
            .map_err(|_| SitePotentialError::validation(format!("invalid longitude in '{s}'")))?;
        Self::new(lat, lon)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// A candidate site: a display name plus its raw geocode
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Site {
    /// Location name (e.g. "Kern County, CA")
    pub name: String,
    /// Geocode as `"lat,lon"`
    #[serde(alias = "coordinates")]
    pub geocode: String,
}

impl Site {
    #[must_use]
    pub fn new(name: impl Into<String>, geocode: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            geocode: geocode.into(),
        }
    }

    /// Parsed coordinates of the geocode
    pub fn coordinates(&self) -> crate::Result<Coordinates> {
        self.geocode.parse()
    }

    /// Latitude used by the solar model; 0 when the geocode does not parse
    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.coordinates().map(|c| c.latitude).unwrap_or(0.0)
    }
}

/// Inclusive date range of the weather observations to analyse
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> crate::Result<Self> {
        if end < start {
            return Err(SitePotentialError::validation(format!(
                "end date {end} precedes start date {start}"
            )));
        }
        Ok(Self { start, end })
    }
}
