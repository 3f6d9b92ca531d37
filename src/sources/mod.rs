//! Concrete collaborators feeding the analysis
//!
//! - [`InlineSiteData`]: sites, observations and elevations read from a JSON file
//! - [`NrelClient`]: solar resource climatology over HTTP
//! - [`Offline`]: a source that never has data

pub mod inline;
pub mod nrel;

pub use inline::{InlineSiteData, SiteInput};
pub use nrel::NrelClient;

use async_trait::async_trait;

use crate::analysis::{ElevationSource, SolarResourceSource, WeatherSource};
use crate::models::{Coordinates, DateRange, Site, SolarResourceProfile, WeatherObservationSet};

/// Source with no data; used for `--offline` runs and tests
#[derive(Debug, Clone, Copy, Default)]
pub struct Offline;

#[async_trait]
impl WeatherSource for Offline {
    async fn observations(
        &self,
        _site: &Site,
        _range: &DateRange,
    ) -> crate::Result<Option<WeatherObservationSet>> {
        Ok(None)
    }
}

#[async_trait]
impl ElevationSource for Offline {
    async fn elevation(&self, _site: &Site) -> crate::Result<Option<f64>> {
        Ok(None)
    }
}

#[async_trait]
impl SolarResourceSource for Offline {
    async fn profile(&self, _coordinates: &Coordinates) -> crate::Result<Option<SolarResourceProfile>> {
        Ok(None)
    }
}
