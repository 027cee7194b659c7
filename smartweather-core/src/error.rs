use thiserror::Error;

/// Failures surfaced by the weather client, forecast client and export helpers.
///
/// None of these are fatal: the presentation layer shows a message and lets the user retry.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The provider answered with a non-OK status code (unknown city, rejected credential...).
    #[error("{city}: provider returned status {code}: {message}")]
    NotFound {
        city: String,
        code: String,
        message: String,
    },

    /// Network, DNS or timeout failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The body was not the expected JSON envelope.
    #[error("Malformed provider response: {0}")]
    Malformed(String),

    /// The forecast envelope carried a non-"200" status.
    #[error("Forecast unavailable (status {code}): {message}")]
    ForecastUnavailable { code: String, message: String },

    #[error("CSV export failed: {0}")]
    Export(String),

    #[error("Geolocation failed: {0}")]
    Geolocation(String),
}

impl WeatherError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, WeatherError::NotFound { .. })
    }

    /// Message shown to the user.
    ///
    /// Lookup failures of any kind collapse to the same text; the precise kind is logged.
    pub fn user_message(&self) -> String {
        match self {
            WeatherError::NotFound { .. }
            | WeatherError::Transport(_)
            | WeatherError::Malformed(_) => "City not found or API issue.".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        WeatherError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for WeatherError {
    fn from(err: serde_json::Error) -> Self {
        WeatherError::Malformed(err.to_string())
    }
}

impl From<csv::Error> for WeatherError {
    fn from(err: csv::Error) -> Self {
        WeatherError::Export(err.to_string())
    }
}

impl From<std::io::Error> for WeatherError {
    fn from(err: std::io::Error) -> Self {
        WeatherError::Export(err.to_string())
    }
}
