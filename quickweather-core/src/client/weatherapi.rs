use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::{LookupError, WeatherResult};

use super::WeatherClient;

pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct WeatherApiClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherApiClient {
    pub fn new(api_key: String) -> anyhow::Result<Self> {
        Self::with_options(api_key, DEFAULT_BASE_URL.to_string(), DEFAULT_TIMEOUT)
    }

    pub fn with_options(
        api_key: String,
        base_url: String,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client for WeatherAPI.com")?;

        Ok(Self { api_key, base_url, http })
    }

    fn current_url(&self) -> String {
        format!("{}/current.json", self.base_url.trim_end_matches('/'))
    }
}

// The key must never end up in logs.
impl std::fmt::Debug for WeatherApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherApiClient")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl WeatherClient for WeatherApiClient {
    #[instrument(skip(self), fields(provider = "weatherapi"))]
    async fn fetch(&self, city_name: &str) -> Result<WeatherResult, LookupError> {
        let res = self
            .http
            .get(self.current_url())
            .query(&[("key", self.api_key.as_str()), ("q", city_name.trim()), ("aqi", "no")])
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            debug!(%status, "WeatherAPI current request failed");
            return Err(LookupError::http_status());
        }

        let body = res.text().await?;

        parse_current(&body)
    }
}

/// Map a `current.json` payload onto [`WeatherResult`]. Unused fields are ignored.
pub fn parse_current(body: &str) -> Result<WeatherResult, LookupError> {
    let parsed: WaResponse = serde_json::from_str(body)?;

    Ok(WeatherResult {
        city_name: parsed.location.name,
        temperature_c: parsed.current.temp_c,
        humidity_pct: parsed.current.humidity,
        wind_speed_kph: parsed.current.wind_kph,
    })
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
    humidity: u8,
    wind_kph: f64,
}

#[derive(Debug, Deserialize)]
struct WaResponse {
    location: WaLocation,
    current: WaCurrent,
}
