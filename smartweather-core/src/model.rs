use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, de::Error as _};

use crate::error::WeatherError;

/// Normalized current conditions for one city. Temperatures in Celsius, rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub city: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub pressure_hpa: u32,
    pub wind_speed_mps: f64,
    /// Lowercased provider description, e.g. "light rain".
    pub description: String,
}

/// One forecast point. `timestamp` carries the local offset used for grouping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastSample {
    pub timestamp: DateTime<FixedOffset>,
    pub temperature_c: f64,
    pub humidity_pct: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyAverage {
    pub date: NaiveDate,
    pub mean_temperature_c: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Neutral,
    Warning,
    Danger,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Neutral => "neutral",
            Severity::Warning => "warning",
            Severity::Danger => "danger",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Advisory {
    pub message: String,
    pub severity: Severity,
}

impl Advisory {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self { message: message.into(), severity }
    }
}

/// Provider status code. OpenWeather sends it as a number on some endpoints
/// and as a string on others (and on error bodies).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ProviderCode {
    Number(i64),
    Text(String),
}

impl Default for ProviderCode {
    fn default() -> Self {
        ProviderCode::Text(String::new())
    }
}

impl std::fmt::Display for ProviderCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderCode::Number(n) => write!(f, "{n}"),
            ProviderCode::Text(s) => f.write_str(s),
        }
    }
}

/// Forecast response exactly as the provider returned it.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastEnvelope {
    #[serde(default)]
    pub cod: ProviderCode,
    /// `0` on success, a human-readable reason on failure.
    #[serde(default)]
    pub message: serde_json::Value,
    #[serde(default)]
    pub list: Vec<RawForecastEntry>,
    #[serde(default)]
    pub city: Option<ForecastCity>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawForecastEntry {
    /// Unix timestamp, seconds.
    pub dt: i64,
    pub main: RawForecastMain,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawForecastMain {
    /// Kelvin.
    pub temp: f64,
    #[serde(deserialize_with = "deserialize_humidity")]
    pub humidity: u8,
}

/// Relative humidity in percent; anything above 100 is rejected.
pub fn deserialize_humidity<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = u8::deserialize(deserializer)?;
    if value > 100 {
        return Err(D::Error::custom(format!("humidity {value}% outside 0..=100")));
    }
    Ok(value)
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastCity {
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
}

impl ForecastEnvelope {
    pub fn is_ok(&self) -> bool {
        matches!(&self.cod, ProviderCode::Text(s) if s == "200")
    }

    pub fn message_text(&self) -> String {
        match &self.message {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        }
    }

    /// Accept the envelope for aggregation only when its status is the literal `"200"`.
    pub fn into_checked(self) -> Result<CheckedForecast, WeatherError> {
        if !self.is_ok() {
            return Err(WeatherError::ForecastUnavailable {
                code: self.cod.to_string(),
                message: self.message_text(),
            });
        }

        let entries = self
            .list
            .into_iter()
            .map(|entry| {
                let at = DateTime::from_timestamp(entry.dt, 0).ok_or_else(|| {
                    WeatherError::Malformed(format!("forecast timestamp {} out of range", entry.dt))
                })?;
                Ok(CheckedEntry {
                    at,
                    temp_kelvin: entry.main.temp,
                    humidity_pct: entry.main.humidity,
                })
            })
            .collect::<Result<Vec<_>, WeatherError>>()?;

        Ok(CheckedForecast {
            city: self.city.map(|c| c.name),
            entries,
        })
    }
}

/// Forecast entry with a representable timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckedEntry {
    pub at: DateTime<Utc>,
    pub temp_kelvin: f64,
    pub humidity_pct: u8,
}

/// A forecast envelope whose status and timestamps have been verified.
/// The only input `aggregate` accepts.
#[derive(Debug, Clone)]
pub struct CheckedForecast {
    city: Option<String>,
    entries: Vec<CheckedEntry>,
}

impl CheckedForecast {
    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    pub fn entries(&self) -> &[CheckedEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
