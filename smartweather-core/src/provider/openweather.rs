use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::{
    error::WeatherError,
    model::{CurrentConditions, ForecastEnvelope, ProviderCode, deserialize_humidity},
    units::celsius_rounded,
};

use super::WeatherSource;

/// OpenWeather 2.5 API client for the `weather` and `forecast` endpoints.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String, base_url: &str, timeout_secs: u64) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `{base_url}/{endpoint}?q={city}&appid={key}` and return the raw body.
    ///
    /// The HTTP status is not checked here: OpenWeather mirrors it in the `cod` field,
    /// which callers inspect.
    async fn get_body(&self, endpoint: &str, city: &str) -> Result<String, WeatherError> {
        let url = format!("{}/{endpoint}", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[("q", city), ("appid", self.api_key.as_str())])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        debug!(%status, bytes = body.len(), "OpenWeather response received");

        Ok(body)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    #[serde(deserialize_with = "deserialize_humidity")]
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

/// Only `cod` is guaranteed; error bodies carry `cod` + `message` and nothing else.
#[derive(Debug, Deserialize)]
struct OwStatus {
    #[serde(default)]
    cod: ProviderCode,
    #[serde(default)]
    message: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: OwWind,
}

impl OwCurrentResponse {
    fn into_conditions(self) -> Result<CurrentConditions, WeatherError> {
        let description = self
            .weather
            .first()
            .map(|w| w.description.to_lowercase())
            .ok_or_else(|| WeatherError::Malformed("no weather description in response".into()))?;

        Ok(CurrentConditions {
            city: self.name,
            temperature_c: celsius_rounded(self.main.temp),
            feels_like_c: celsius_rounded(self.main.feels_like),
            humidity_pct: self.main.humidity,
            pressure_hpa: self.main.pressure,
            wind_speed_mps: self.wind.speed,
            description,
        })
    }
}

/// Parse a current-conditions body. Success requires the numeric code `200`.
fn parse_current(city: &str, body: &str) -> Result<CurrentConditions, WeatherError> {
    let status: OwStatus = serde_json::from_str(body)?;

    if status.cod != ProviderCode::Number(200) {
        let message = match status.message {
            serde_json::Value::String(s) => s,
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        };
        return Err(WeatherError::NotFound {
            city: city.to_string(),
            code: status.cod.to_string(),
            message,
        });
    }

    let parsed: OwCurrentResponse = serde_json::from_str(body)?;
    parsed.into_conditions()
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    #[instrument(skip(self), fields(endpoint = "weather"))]
    async fn fetch_current(&self, city: &str) -> Result<CurrentConditions, WeatherError> {
        let body = self.get_body("weather", city).await.inspect_err(|e| {
            warn!(error = %e, "Current conditions request failed");
        })?;

        parse_current(city, &body).inspect_err(|e| {
            warn!(error = %e, "Current conditions lookup unsuccessful");
        })
    }

    #[instrument(skip(self), fields(endpoint = "forecast"))]
    async fn fetch_forecast(&self, city: &str) -> Result<ForecastEnvelope, WeatherError> {
        let body = self.get_body("forecast", city).await.inspect_err(|e| {
            warn!(error = %e, "Forecast request failed");
        })?;

        let envelope: ForecastEnvelope = serde_json::from_str(&body)?;
        debug!(cod = %envelope.cod, entries = envelope.list.len(), "Forecast envelope parsed");

        Ok(envelope)
    }
}
