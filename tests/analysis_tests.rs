//! End-to-end analysis runs against in-process collaborators

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use approx::assert_relative_eq;
use async_trait::async_trait;
use chrono::NaiveDate;

use site_potential::cache::{CachedWeatherSource, MemoryWeatherCache, PersistentWeatherCache};
use site_potential::models::{
    Coordinates, DateRange, Site, SolarResourceProfile, WeatherObservation, WeatherObservationSet,
};
use site_potential::{
    ElevationSource, InlineSiteData, Offline, SiteAnalyzer, SitePotentialError, SolarResourceSource,
    WeatherSource,
};

#[derive(Default)]
struct ScriptedWeather {
    /// site name -> (delay in ms, observations)
    sites: HashMap<String, (u64, Option<Vec<WeatherObservation>>)>,
    failing: Vec<String>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl ScriptedWeather {
    fn with_site(mut self, name: &str, delay_ms: u64, wind_speed: f64) -> Self {
        let samples = vec![
            WeatherObservation {
                wind_speed: Some(wind_speed),
                wind_gust: Some(wind_speed * 2.0),
                temperature: Some(20.0),
                relative_humidity: Some(45.0),
                ..Default::default()
            },
            WeatherObservation {
                wind_speed: Some(wind_speed),
                wind_gust: Some(wind_speed * 1.5),
                temperature: Some(22.0),
                relative_humidity: Some(55.0),
                ..Default::default()
            },
        ];
        self.sites.insert(name.to_string(), (delay_ms, Some(samples)));
        self
    }

    fn without_data(mut self, name: &str) -> Self {
        self.sites.insert(name.to_string(), (0, None));
        self
    }

    fn failing(mut self, name: &str) -> Self {
        self.failing.push(name.to_string());
        self
    }
}

#[async_trait]
impl WeatherSource for ScriptedWeather {
    async fn observations(
        &self,
        site: &Site,
        _range: &DateRange,
    ) -> site_potential::Result<Option<WeatherObservationSet>> {
        if self.failing.contains(&site.name) {
            return Err(SitePotentialError::api("weather service unavailable"));
        }

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        let result = match self.sites.get(&site.name) {
            Some((delay, samples)) => {
                tokio::time::sleep(Duration::from_millis(*delay)).await;
                samples.clone().map(WeatherObservationSet::new)
            }
            None => None,
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(result)
    }
}

struct ScriptedElevation(HashMap<String, site_potential::Result<f64>>);

#[async_trait]
impl ElevationSource for ScriptedElevation {
    async fn elevation(&self, site: &Site) -> site_potential::Result<Option<f64>> {
        match self.0.get(&site.name) {
            Some(Ok(elevation)) => Ok(Some(*elevation)),
            Some(Err(_)) => Err(SitePotentialError::api("elevation service unavailable")),
            None => Ok(None),
        }
    }
}

struct FixedResource(SolarResourceProfile);

#[async_trait]
impl SolarResourceSource for FixedResource {
    async fn profile(&self, _coordinates: &Coordinates) -> site_potential::Result<Option<SolarResourceProfile>> {
        Ok(Some(self.0.clone()))
    }
}

struct FailingResource;

#[async_trait]
impl SolarResourceSource for FailingResource {
    async fn profile(&self, _coordinates: &Coordinates) -> site_potential::Result<Option<SolarResourceProfile>> {
        Err(SitePotentialError::api("rate limited"))
    }
}

fn june() -> DateRange {
    DateRange::new(
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
    )
    .unwrap()
}

fn sites(names: &[&str]) -> Vec<Site> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| Site::new(*name, format!("{}.5,-100.25", 30 + i)))
        .collect()
}

fn no_elevation() -> ScriptedElevation {
    ScriptedElevation(HashMap::new())
}

#[tokio::test]
async fn test_results_follow_input_order_despite_completion_order() {
    // Earlier sites finish last
    let weather = ScriptedWeather::default()
        .with_site("alpha", 60, 3.0)
        .with_site("bravo", 30, 5.0)
        .with_site("charlie", 10, 7.0)
        .with_site("delta", 0, 9.0);
    let analyzer = SiteAnalyzer::new(weather, no_elevation(), Offline).with_max_concurrency(4);

    let results = analyzer
        .analyze(&sites(&["alpha", "bravo", "charlie", "delta"]), &june())
        .await;

    let solar: Vec<&str> = results.solar_results.iter().map(|s| s.location.as_str()).collect();
    let wind: Vec<&str> = results.wind_results.iter().map(|w| w.location.as_str()).collect();
    assert_eq!(solar, vec!["alpha", "bravo", "charlie", "delta"]);
    assert_eq!(wind, solar);

    let speeds: Vec<f64> = results.wind_results.iter().map(|w| w.avg_wind_speed).collect();
    assert_eq!(speeds, vec![3.0, 5.0, 7.0, 9.0]);
}

#[tokio::test]
async fn test_sites_without_weather_are_skipped() {
    let weather = ScriptedWeather::default()
        .with_site("alpha", 0, 4.0)
        .without_data("bravo")
        .failing("charlie")
        .with_site("delta", 0, 6.0);
    let analyzer = SiteAnalyzer::new(weather, no_elevation(), Offline);

    let results = analyzer
        .analyze(&sites(&["alpha", "bravo", "charlie", "delta", "echo"]), &june())
        .await;

    assert_eq!(results.solar_results.len(), 2);
    assert_eq!(results.wind_results.len(), 2);
    for (solar, wind) in results.solar_results.iter().zip(&results.wind_results) {
        assert_eq!(solar.location, wind.location);
    }
    assert_eq!(results.wind_results[0].location, "alpha");
    assert_eq!(results.wind_results[1].location, "delta");
}

#[tokio::test]
async fn test_concurrency_limit_is_respected() {
    let names = ["a", "b", "c", "d", "e", "f"];
    let weather = names
        .iter()
        .fold(ScriptedWeather::default(), |w, name| w.with_site(name, 20, 5.0));
    let weather = Arc::new(weather);
    let analyzer = SiteAnalyzer::new(weather.clone(), no_elevation(), Offline).with_max_concurrency(2);

    let results = analyzer.analyze(&sites(&names), &june()).await;

    assert_eq!(results.len(), names.len());
    assert!(weather.peak_in_flight.load(Ordering::SeqCst) <= 2);
}

#[tokio::test]
async fn test_missing_or_failed_elevation_defaults_to_zero() {
    let weather = ScriptedWeather::default()
        .with_site("alpha", 0, 5.0)
        .with_site("bravo", 0, 5.0)
        .with_site("charlie", 0, 5.0);
    let elevation = ScriptedElevation(HashMap::from([
        ("alpha".to_string(), Ok(300.0)),
        ("bravo".to_string(), Err(SitePotentialError::api("down"))),
    ]));
    let analyzer = SiteAnalyzer::new(weather, elevation, Offline);

    let results = analyzer
        .analyze(&sites(&["alpha", "bravo", "charlie"]), &june())
        .await;

    let elevations: Vec<f64> = results.wind_results.iter().map(|w| w.elevation_meters).collect();
    assert_eq!(elevations, vec![300.0, 0.0, 0.0]);
    assert_relative_eq!(
        results.wind_results[0].wind_score,
        results.wind_results[2].wind_score * 1.2,
        epsilon = 1e-9
    );
}

#[tokio::test]
async fn test_resource_failure_zeroes_solar_but_keeps_wind() {
    let weather = ScriptedWeather::default().with_site("alpha", 0, 8.0);
    let analyzer = SiteAnalyzer::new(weather, no_elevation(), FailingResource);

    let results = analyzer.analyze(&sites(&["alpha"]), &june()).await;

    assert_eq!(results.len(), 1);
    assert!(results.solar_results[0].numeric_fields().iter().all(|v| *v == 0.0));
    assert_eq!(results.wind_results[0].avg_wind_speed, 8.0);
    assert!(results.wind_results[0].estimated_daily_output_kwh > 0.0);
}

#[tokio::test]
async fn test_resource_profile_feeds_solar_score() {
    let weather = ScriptedWeather::default().with_site("alpha", 0, 5.0);
    let resource = FixedResource(SolarResourceProfile::new(1800.0, 2500.0));
    let analyzer = SiteAnalyzer::new(weather, no_elevation(), resource);

    let results = analyzer.analyze(&sites(&["alpha"]), &june()).await;
    let solar = &results.solar_results[0];

    assert!(solar.solar_score > 0.0);
    assert!(solar.solar_score <= 10_000.0);
    assert_relative_eq!(solar.avg_temperature, 21.0, epsilon = 1e-12);
    assert_relative_eq!(solar.avg_humidity, 50.0, epsilon = 1e-12);
}

#[tokio::test]
async fn test_empty_site_list() {
    let analyzer = SiteAnalyzer::new(Offline, Offline, Offline);
    let results = analyzer.analyze(&[], &june()).await;
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_monthly_data_from_resource() {
    let profile = SolarResourceProfile::new(1800.0, 2500.0)
        .with_monthly_ghi((1..=12).map(|m| (m, 4.0 + f64::from(m) * 0.1)).collect())
        .with_monthly_dni((1..=12).map(|m| (m, 6.0)).collect());
    let analyzer = SiteAnalyzer::new(Offline, Offline, FixedResource(profile));

    let site = Site::new("Boulder, CO", "40.0150,-105.2705");
    let monthly = analyzer.monthly_data(&site).await.unwrap().unwrap();

    assert_eq!(monthly.location, "Boulder, CO");
    assert_eq!(monthly.monthly_ghi.len(), 12);

    let unparsable = Site::new("Nowhere", "north-ish");
    assert!(analyzer.monthly_data(&unparsable).await.is_err());
}

#[tokio::test]
async fn test_inline_file_through_cache() {
    let input = r#"{ "sites": [
        {"name": "Amarillo, TX", "coordinates": "35.2220,-101.8313", "elevation_m": 1099.0,
         "observations": [
            {"validTimeUtc": 1717437600, "windSpeed": 7.5, "windGust": 12.0, "temperature": 31.0},
            {"validTimeUtc": 1717524000, "windSpeed": 8.5, "windGust": 14.0, "temperature": 33.0}
         ]},
        {"name": "Seattle, WA", "coordinates": "47.6062,-122.3321", "active": false}
    ] }"#;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sites.json");
    std::fs::write(&path, input).unwrap();

    let data = Arc::new(InlineSiteData::from_path(&path).unwrap());
    let cache = Arc::new(MemoryWeatherCache::new());
    let weather = CachedWeatherSource::new(data.clone(), cache.clone());
    let analyzer = SiteAnalyzer::new(weather, data.clone(), Offline);

    let active = data.active_sites();
    let first = analyzer.analyze(&active, &june()).await;
    let second = analyzer.analyze(&active, &june()).await;

    assert_eq!(first, second);
    assert_eq!(cache.len().await, 1);

    let wind = &first.wind_results[0];
    assert_eq!(wind.location, "Amarillo, TX");
    assert_eq!(wind.elevation_meters, 1099.0);
    assert_relative_eq!(wind.avg_wind_speed, 8.0, epsilon = 1e-12);
    assert_eq!(wind.max_wind_gust, 14.0);
}

fn amarillo_input(wind_speed: f64) -> String {
    format!(
        r#"{{ "sites": [
            {{"name": "Amarillo, TX", "coordinates": "35.2220,-101.8313",
             "observations": [{{"validTimeUtc": 1717437600, "windSpeed": {wind_speed}, "temperature": 31.0}}]}}
        ] }}"#
    )
}

async fn analyze_file_through_persistent_cache(
    path: &std::path::Path,
    cache_dir: &std::path::Path,
) -> site_potential::models::AnalysisResults {
    let data = Arc::new(InlineSiteData::from_path(path).unwrap());
    let cache = PersistentWeatherCache::open(cache_dir, Duration::from_secs(24 * 3600)).unwrap();
    let weather = CachedWeatherSource::new(data.clone(), cache).with_namespace(data.fingerprint());
    let analyzer = SiteAnalyzer::new(weather, data.clone(), Offline);
    analyzer.analyze(&data.active_sites(), &june()).await
}

#[tokio::test]
async fn test_edited_input_file_bypasses_stale_cache_entries() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sites.json");
    let cache_dir = dir.path().join("cache");

    std::fs::write(&path, amarillo_input(5.0)).unwrap();
    let before = analyze_file_through_persistent_cache(&path, &cache_dir).await;
    assert_eq!(before.wind_results[0].avg_wind_speed, 5.0);

    // Same geocode and date range, new observations
    std::fs::write(&path, amarillo_input(9.0)).unwrap();
    let after = analyze_file_through_persistent_cache(&path, &cache_dir).await;
    assert_eq!(after.wind_results[0].avg_wind_speed, 9.0);

    // Unchanged content is still served from the reopened cache
    std::fs::write(&path, amarillo_input(9.0)).unwrap();
    let again = analyze_file_through_persistent_cache(&path, &cache_dir).await;
    assert_eq!(again, after);
}
