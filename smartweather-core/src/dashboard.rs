//! One dashboard refresh: current conditions, then the forecast, strictly in sequence.

use tracing::{info, warn};

use crate::{
    advisory::{current_advisory, forecast_outlook},
    aggregate::{ForecastReport, aggregate},
    error::WeatherError,
    model::{Advisory, CurrentConditions},
    provider::WeatherSource,
    session::Session,
};

#[derive(Debug)]
pub enum ForecastSection {
    Ready {
        report: ForecastReport,
        advisories: Vec<Advisory>,
    },
    /// Forecast could not be fetched or the provider refused it.
    /// The current-conditions part of the dashboard is still shown.
    Unavailable(WeatherError),
}

impl ForecastSection {
    pub fn report(&self) -> Option<&ForecastReport> {
        match self {
            ForecastSection::Ready { report, .. } => Some(report),
            ForecastSection::Unavailable(_) => None,
        }
    }
}

#[derive(Debug)]
pub struct DashboardReport {
    /// City as requested, used for the export file name.
    pub city: String,
    pub conditions: CurrentConditions,
    pub advisory: Advisory,
    pub forecast: ForecastSection,
}

#[derive(Debug, Clone)]
pub struct Dashboard<S> {
    source: S,
}

impl<S: WeatherSource> Dashboard<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fails only when current conditions cannot be obtained.
    pub async fn load(&self, city: &str) -> Result<DashboardReport, WeatherError> {
        let conditions = self.source.fetch_current(city).await?;
        let advisory = current_advisory(&conditions);
        info!(city = %conditions.city, advisory = %advisory.message, "Current conditions loaded");

        let forecast = match self
            .source
            .fetch_forecast(city)
            .await
            .and_then(|envelope| envelope.into_checked())
        {
            Ok(checked) => {
                let report = aggregate(&checked);
                let advisories = forecast_outlook(&report);
                ForecastSection::Ready { report, advisories }
            }
            Err(e) => {
                warn!(error = %e, "Forecast unavailable");
                ForecastSection::Unavailable(e)
            }
        };

        Ok(DashboardReport {
            city: city.to_string(),
            conditions,
            advisory,
            forecast,
        })
    }

    /// Load and, on success, remember the city in the session.
    pub async fn refresh(
        &self,
        session: &mut Session,
        city: &str,
    ) -> Result<DashboardReport, WeatherError> {
        let report = self.load(city).await?;
        session.record_success(city);
        Ok(report)
    }
}
