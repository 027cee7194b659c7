use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    Config,
    error::WeatherError,
    model::{CurrentConditions, ForecastEnvelope},
    provider::openweather::OpenWeatherClient,
};

pub mod openweather;

/// Source of current conditions and raw forecasts for a city.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    /// One current-conditions lookup. Any non-OK answer is an error, never a partial record.
    async fn fetch_current(&self, city: &str) -> Result<CurrentConditions, WeatherError>;

    /// One multi-day forecast lookup, returned verbatim.
    ///
    /// A provider-level failure (`cod != "200"`) still comes back as `Ok`; only transport
    /// and parse failures are errors.
    async fn fetch_forecast(&self, city: &str) -> Result<ForecastEnvelope, WeatherError>;
}

/// Construct the OpenWeather client from config.
///
/// A missing API key is not an error here: the provider rejects the request and
/// the rejection surfaces as a lookup failure.
pub fn source_from_config(config: &Config) -> Result<OpenWeatherClient, WeatherError> {
    let api_key = config.resolved_api_key().unwrap_or_else(|| {
        tracing::warn!(
            "No API key configured; requests will be rejected by the provider.\n\
             Hint: run `smartweather configure` or set SMARTWEATHER_API_KEY."
        );
        String::new()
    });

    OpenWeatherClient::new(api_key, &config.base_url, config.timeout_secs)
}
