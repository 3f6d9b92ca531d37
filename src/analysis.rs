//! Site analysis orchestration
//!
//! Pulls weather, elevation and solar resource data for each site from the
//! injected collaborators, runs feature extraction and both scorers, and
//! reassembles results in input order. Collaborator failures never abort a
//! batch: a site without weather data is skipped, a missing elevation is 0 and
//! a missing resource profile degrades the solar result to zero.

use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use tracing::{Instrument, debug, info, info_span, warn};

use crate::models::{
    AnalysisResults, Coordinates, DateRange, FeatureSummary, MonthlySolarData, Site,
    SolarResourceProfile, SolarSiteScore, WeatherObservationSet, WindSiteScore,
};
use crate::scoring::{FeatureExtractor, SolarModel, SolarScorer, WindModel, WindScorer};

/// Provides raw weather observations for a site
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn observations(
        &self,
        site: &Site,
        range: &DateRange,
    ) -> crate::Result<Option<WeatherObservationSet>>;
}

/// Provides point elevation in metres
#[async_trait]
pub trait ElevationSource: Send + Sync {
    async fn elevation(&self, site: &Site) -> crate::Result<Option<f64>>;
}

/// Provides the solar resource climatology for a coordinate
#[async_trait]
pub trait SolarResourceSource: Send + Sync {
    async fn profile(&self, coordinates: &Coordinates) -> crate::Result<Option<SolarResourceProfile>>;
}

#[async_trait]
impl<T: WeatherSource + ?Sized> WeatherSource for Arc<T> {
    async fn observations(
        &self,
        site: &Site,
        range: &DateRange,
    ) -> crate::Result<Option<WeatherObservationSet>> {
        (**self).observations(site, range).await
    }
}

#[async_trait]
impl<T: ElevationSource + ?Sized> ElevationSource for Arc<T> {
    async fn elevation(&self, site: &Site) -> crate::Result<Option<f64>> {
        (**self).elevation(site).await
    }
}

#[async_trait]
impl<T: SolarResourceSource + ?Sized> SolarResourceSource for Arc<T> {
    async fn profile(&self, coordinates: &Coordinates) -> crate::Result<Option<SolarResourceProfile>> {
        (**self).profile(coordinates).await
    }
}

pub const DEFAULT_MAX_CONCURRENT_SITES: usize = 4;

/// Runs the scoring engine over a list of sites
pub struct SiteAnalyzer<W, E, R> {
    weather: W,
    elevation: E,
    resource: R,
    solar: SolarScorer,
    wind: WindScorer,
    max_concurrent_sites: usize,
}

impl<W, E, R> SiteAnalyzer<W, E, R>
where
    W: WeatherSource,
    E: ElevationSource,
    R: SolarResourceSource,
{
    pub fn new(weather: W, elevation: E, resource: R) -> Self {
        Self {
            weather,
            elevation,
            resource,
            solar: SolarScorer::default(),
            wind: WindScorer::default(),
            max_concurrent_sites: DEFAULT_MAX_CONCURRENT_SITES,
        }
    }

    /// Number of sites analysed at once; values below 1 are treated as 1
    #[must_use]
    pub fn with_max_concurrency(mut self, max_concurrent_sites: usize) -> Self {
        self.max_concurrent_sites = max_concurrent_sites.max(1);
        self
    }

    #[must_use]
    pub fn with_models(mut self, solar: SolarModel, wind: WindModel) -> Self {
        self.solar = SolarScorer::new(solar);
        self.wind = WindScorer::new(wind);
        self
    }

    /// Analyse every site. Both result lists follow input order and are
    /// index-aligned; sites without weather data appear in neither.
    pub async fn analyze(&self, sites: &[Site], range: &DateRange) -> AnalysisResults {
        info!(
            sites = sites.len(),
            start = %range.start,
            end = %range.end,
            "Starting site analysis"
        );

        let outcomes: Vec<Option<(SolarSiteScore, WindSiteScore)>> = stream::iter(sites)
            .map(|site| {
                let span = info_span!("analyze_site", site = %site.name, geocode = %site.geocode);
                self.analyze_site(site, range).instrument(span)
            })
            .buffered(self.max_concurrent_sites)
            .collect()
            .await;

        let (solar_results, wind_results): (Vec<_>, Vec<_>) = outcomes.into_iter().flatten().unzip();

        info!(
            analysed = solar_results.len(),
            skipped = sites.len() - solar_results.len(),
            "Site analysis complete"
        );

        AnalysisResults {
            solar_results,
            wind_results,
        }
    }

    /// Gather inputs for one site and score it; `None` when no weather data is obtainable
    pub async fn analyze_site(
        &self,
        site: &Site,
        range: &DateRange,
    ) -> Option<(SolarSiteScore, WindSiteScore)> {
        let observations = match self.weather.observations(site, range).await {
            Ok(Some(set)) if !set.is_empty() => set,
            Ok(_) => {
                warn!(site = %site.name, "No weather observations, skipping site");
                return None;
            }
            Err(e) => {
                warn!(site = %site.name, error = %e, "Weather lookup failed, skipping site");
                return None;
            }
        };

        let features = FeatureExtractor::extract(&observations);
        let (elevation, resource) = futures::join!(self.lookup_elevation(site), self.lookup_resource(site));

        Some(self.score_site(site, &features, elevation, resource.as_ref()))
    }

    /// The synchronous scoring step for already-resolved inputs
    #[must_use]
    pub fn score_site(
        &self,
        site: &Site,
        features: &FeatureSummary,
        elevation_m: f64,
        resource: Option<&SolarResourceProfile>,
    ) -> (SolarSiteScore, WindSiteScore) {
        let solar = self
            .solar
            .score(&site.name, features, elevation_m, resource, site.latitude());
        let wind = self.wind.score(&site.name, features, elevation_m);
        (solar, wind)
    }

    /// Monthly climatology view for a site, if the provider has monthly data
    pub async fn monthly_data(&self, site: &Site) -> crate::Result<Option<MonthlySolarData>> {
        let coordinates = site.coordinates()?;
        let profile = self.resource.profile(&coordinates).await?;
        Ok(profile.and_then(|p| MonthlySolarData::from_profile(&site.name, &site.geocode, &p)))
    }

    async fn lookup_elevation(&self, site: &Site) -> f64 {
        match self.elevation.elevation(site).await {
            Ok(Some(elevation)) if elevation.is_finite() => elevation,
            Ok(_) => {
                debug!(site = %site.name, "No elevation data, using 0 m");
                0.0
            }
            Err(e) => {
                warn!(site = %site.name, error = %e, "Elevation lookup failed, using 0 m");
                0.0
            }
        }
    }

    async fn lookup_resource(&self, site: &Site) -> Option<SolarResourceProfile> {
        let coordinates = match site.coordinates() {
            Ok(c) => c,
            Err(e) => {
                warn!(site = %site.name, error = %e, "Unusable geocode for solar resource lookup");
                return None;
            }
        };

        match self.resource.profile(&coordinates).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!(site = %site.name, error = %e, "Solar resource lookup failed");
                None
            }
        }
    }
}
