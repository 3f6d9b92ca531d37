//! File-supplied site data
//!
//! The input file lists sites with their raw observations and, optionally,
//! a surveyed elevation:
//!
//! ```json
//! { "sites": [
//!     { "name": "Phoenix, AZ", "coordinates": "33.4484,-112.0740",
//!       "elevation_m": 331.0, "active": true,
//!       "observations": [ { "validTimeUtc": 1717243200, "temperature": 38.2 } ] }
//! ] }
//! ```

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::SitePotentialError;
use crate::analysis::{ElevationSource, WeatherSource};
use crate::models::{DateRange, Site, WeatherObservation, WeatherObservationSet};

fn default_active() -> bool {
    true
}

/// One site entry of the input file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteInput {
    pub name: String,
    /// Geocode as `"lat,lon"`
    #[serde(alias = "geocode")]
    pub coordinates: String,
    #[serde(default)]
    pub elevation_m: Option<f64>,
    /// Inactive sites are kept in the file but not analysed
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub observations: Vec<WeatherObservation>,
}

#[derive(Debug, Deserialize)]
struct InputFile {
    sites: Vec<SiteInput>,
}

/// Sites loaded from an input file, serving as weather and elevation source
///
/// Entries are identified by `(name, coordinates)`; the same name may appear
/// at several locations.
#[derive(Debug, Default)]
pub struct InlineSiteData {
    entries: Vec<SiteInput>,
    by_site: HashMap<(String, String), usize>,
    fingerprint: String,
}

impl InlineSiteData {
    /// # Errors
    ///
    /// Returns a validation error if two entries share both name and coordinates
    pub fn new(entries: Vec<SiteInput>) -> crate::Result<Self> {
        let mut by_site = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            let id = (entry.name.clone(), entry.coordinates.clone());
            if by_site.insert(id, i).is_some() {
                return Err(SitePotentialError::validation(format!(
                    "Duplicate site '{}' at {}",
                    entry.name, entry.coordinates
                )));
            }
        }

        let mut hasher = Sha256::new();
        hasher.update(serde_json::to_vec(&entries)?);
        let fingerprint = hex::encode(&hasher.finalize()[..8]);

        Ok(Self {
            entries,
            by_site,
            fingerprint,
        })
    }

    pub fn from_json(json: &str) -> crate::Result<Self> {
        let file: InputFile = serde_json::from_str(json)?;
        Self::new(file.sites)
    }

    /// Content hash of the site entries; changes whenever any entry does
    #[must_use]
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn from_path(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let data = Self::from_json(&json)?;
        info!(path = %path.display(), sites = data.entries.len(), "Loaded site input file");
        Ok(data)
    }

    /// Sites flagged active, in file order
    #[must_use]
    pub fn active_sites(&self) -> Vec<Site> {
        self.entries
            .iter()
            .filter(|e| e.active)
            .map(|e| Site::new(e.name.clone(), e.coordinates.clone()))
            .collect()
    }

    fn entry(&self, site: &Site) -> Option<&SiteInput> {
        self.by_site
            .get(&(site.name.clone(), site.geocode.clone()))
            .map(|&i| &self.entries[i])
    }
}

#[async_trait]
impl WeatherSource for InlineSiteData {
    /// Samples outside the date range are dropped; untimestamped samples are kept
    async fn observations(
        &self,
        site: &Site,
        range: &DateRange,
    ) -> crate::Result<Option<WeatherObservationSet>> {
        let Some(entry) = self.entry(site) else {
            debug!(site = %site.name, "Site not present in input file");
            return Ok(None);
        };

        let samples: Vec<WeatherObservation> = entry
            .observations
            .iter()
            .filter(|s| {
                s.timestamp.is_none_or(|t| {
                    let day = t.date_naive();
                    day >= range.start && day <= range.end
                })
            })
            .cloned()
            .collect();

        if samples.is_empty() {
            return Ok(None);
        }
        Ok(Some(WeatherObservationSet::new(samples)))
    }
}

#[async_trait]
impl ElevationSource for InlineSiteData {
    async fn elevation(&self, site: &Site) -> crate::Result<Option<f64>> {
        Ok(self.entry(site).and_then(|e| e.elevation_m))
    }
}
