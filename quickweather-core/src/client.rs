use crate::{Config, LookupError, WeatherResult, client::weatherapi::WeatherApiClient};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod weatherapi;

/// Performs a single current-weather lookup against a remote provider.
///
/// Every call is self-contained: one outbound request, no retries, and every
/// failure cause collapsed into a [`LookupError`].
#[async_trait]
pub trait WeatherClient: Send + Sync + Debug {
    async fn fetch(&self, city_name: &str) -> Result<WeatherResult, LookupError>;
}

/// Construct the WeatherAPI.com client from config (API key, base URL, timeout).
pub fn client_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherClient>> {
    let api_key = config.resolve_api_key()?;

    let client = WeatherApiClient::with_options(
        api_key,
        config.base_url.clone().unwrap_or_else(|| weatherapi::DEFAULT_BASE_URL.to_string()),
        config.timeout(),
    )?;

    Ok(Arc::new(client))
}
