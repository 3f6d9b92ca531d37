//! NREL solar resource API client

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::{Deserialize, Deserializer};
use tracing::{debug, warn};

use crate::analysis::SolarResourceSource;
use crate::config::NrelConfig;
use crate::models::{Coordinates, MonthlyValues, SolarResourceProfile};

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

#[derive(Debug, Deserialize)]
struct ResourceResponse {
    outputs: ResourceOutputs,
}

#[derive(Debug, Deserialize)]
struct ResourceOutputs {
    avg_ghi: ResourceSeries,
    avg_dni: ResourceSeries,
    /// The API reports `"no data"` instead of an object for some locations
    #[serde(default, deserialize_with = "lenient_series")]
    avg_lat_tilt: Option<ResourceSeries>,
}

#[derive(Debug, Deserialize)]
struct ResourceSeries {
    annual: f64,
    #[serde(default)]
    monthly: Option<BTreeMap<String, f64>>,
}

impl ResourceSeries {
    fn monthly_values(&self) -> Option<MonthlyValues> {
        let monthly = self.monthly.as_ref()?;
        let values: MonthlyValues = MONTHS
            .iter()
            .zip(1u32..)
            .filter_map(|(name, month)| monthly.get(*name).map(|v| (month, *v)))
            .collect();
        (!values.is_empty()).then_some(values)
    }
}

fn lenient_series<'de, D>(deserializer: D) -> Result<Option<ResourceSeries>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Decode a solar resource response body
pub fn decode_resource(body: &str) -> crate::Result<SolarResourceProfile> {
    let response: ResourceResponse = serde_json::from_str(body)?;
    let outputs = response.outputs;

    let mut profile = SolarResourceProfile::new(outputs.avg_ghi.annual, outputs.avg_dni.annual);
    if let Some(monthly) = outputs.avg_ghi.monthly_values() {
        profile = profile.with_monthly_ghi(monthly);
    }
    if let Some(monthly) = outputs.avg_dni.monthly_values() {
        profile = profile.with_monthly_dni(monthly);
    }
    if let Some(tilt) = outputs.avg_lat_tilt {
        profile = profile.with_lat_tilt(tilt.annual);
    }
    Ok(profile)
}

/// Client for the NREL solar resource endpoint
pub struct NrelClient {
    client: ClientWithMiddleware,
    api_key: String,
    base_url: String,
}

impl NrelClient {
    pub fn new(config: &NrelConfig) -> crate::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(format!("site-potential/{}", crate::VERSION))
            .build()?;

        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let client = ClientBuilder::new(http)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('?').to_string(),
        })
    }

    pub fn resource_url(&self, coordinates: &Coordinates) -> String {
        format!(
            "{}?api_key={}&lat={}&lon={}",
            self.base_url,
            urlencoding::encode(&self.api_key),
            coordinates.latitude,
            coordinates.longitude
        )
    }
}

#[async_trait]
impl SolarResourceSource for NrelClient {
    #[tracing::instrument(name = "nrel_resource", level = "debug", skip(self))]
    async fn profile(&self, coordinates: &Coordinates) -> crate::Result<Option<SolarResourceProfile>> {
        let response = self.client.get(self.resource_url(coordinates)).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%coordinates, %status, "Solar resource request rejected");
            return Ok(None);
        }

        let body = response.text().await?;
        match decode_resource(&body) {
            Ok(profile) => {
                debug!(%coordinates, annual_ghi = profile.annual_ghi, "Solar resource fetched");
                Ok(Some(profile))
            }
            Err(e) => {
                warn!(%coordinates, error = %e, "Undecodable solar resource response");
                Ok(None)
            }
        }
    }
}
