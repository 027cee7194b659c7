//! Core library for the `smartweather` dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather client behind the `WeatherSource` seam
//! - Forecast aggregation, advisories and CSV export
//!
//! It is used by `smartweather-cli`, but can also be reused by other front ends.

pub mod advisory;
pub mod aggregate;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod locate;
pub mod model;
pub mod provider;
pub mod session;
pub mod units;

pub use aggregate::{ForecastReport, aggregate, aggregate_in};
pub use config::{Config, PRESET_CITIES};
pub use dashboard::{Dashboard, DashboardReport, ForecastSection};
pub use error::WeatherError;
pub use locate::IpLocator;
pub use model::{
    Advisory, CheckedForecast, CurrentConditions, DailyAverage, ForecastEnvelope, ForecastSample,
    Severity,
};
pub use provider::{WeatherSource, openweather::OpenWeatherClient, source_from_config};
pub use session::Session;
