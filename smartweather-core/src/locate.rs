//! Best-effort city detection from the caller's public IP.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::error::WeatherError;

/// Response shape of `ip-api.com/json`.
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct IpLocator {
    url: String,
    http: Client,
}

impl IpLocator {
    pub fn new(url: &str, timeout_secs: u64) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self { url: url.to_string(), http })
    }

    /// City of the caller, `None` if the service could not place it.
    #[instrument(skip(self))]
    pub async fn detect_city(&self) -> Result<Option<String>, WeatherError> {
        let body = self.http.get(&self.url).send().await?.text().await?;
        let parsed: IpApiResponse = serde_json::from_str(&body)?;

        if parsed.status != "success" {
            return Err(WeatherError::Geolocation(
                parsed.message.unwrap_or_else(|| parsed.status.clone()),
            ));
        }

        let city = parsed.city.filter(|c| !c.trim().is_empty());
        debug!(?city, "IP geolocation answered");
        Ok(city)
    }

    /// Detected city, or `fallback` when detection fails for any reason.
    pub async fn detect_city_or(&self, fallback: &str) -> String {
        match self.detect_city().await {
            Ok(Some(city)) => {
                info!(%city, "Detected location");
                city
            }
            Ok(None) => {
                warn!(%fallback, "Location service returned no city, using fallback");
                fallback.to_string()
            }
            Err(e) => {
                warn!(error = %e, %fallback, "Location detection failed, using fallback");
                fallback.to_string()
            }
        }
    }
}
