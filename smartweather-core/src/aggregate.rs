//! Forecast aggregation: per-day mean temperature plus the flat sample series.
//!
//! Temperatures stay at full precision here. Rounding belongs to whoever displays them.

use chrono::{Local, NaiveDate, TimeZone};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::{
    model::{CheckedForecast, DailyAverage, ForecastSample},
    units::kelvin_to_celsius,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ForecastReport {
    /// One entry per calendar date present in the input, oldest first.
    pub daily_averages: Vec<DailyAverage>,
    /// Every sample, in chronological order.
    pub series: Vec<ForecastSample>,
}

impl ForecastReport {
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Unweighted mean over every sample of the series. `None` when empty.
    pub fn mean_temperature(&self) -> Option<f64> {
        mean(self.series.iter().map(|s| s.temperature_c))
    }

    /// Unweighted mean humidity over every sample of the series. `None` when empty.
    pub fn mean_humidity(&self) -> Option<f64> {
        mean(self.series.iter().map(|s| f64::from(s.humidity_pct)))
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Aggregate using the machine's local timezone to decide calendar dates.
pub fn aggregate(forecast: &CheckedForecast) -> ForecastReport {
    aggregate_in(forecast, &Local)
}

/// Aggregate, deciding calendar dates in `tz`.
pub fn aggregate_in<Tz: TimeZone>(forecast: &CheckedForecast, tz: &Tz) -> ForecastReport {
    let mut series: Vec<ForecastSample> = forecast
        .entries()
        .iter()
        .map(|entry| ForecastSample {
            timestamp: entry.at.with_timezone(tz).fixed_offset(),
            temperature_c: kelvin_to_celsius(entry.temp_kelvin),
            humidity_pct: entry.humidity_pct,
        })
        .collect();

    // Stable: equal timestamps keep feed order.
    series.sort_by_key(|s| s.timestamp);

    let mut by_date: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for sample in &series {
        let slot = by_date.entry(sample.timestamp.date_naive()).or_insert((0.0, 0));
        slot.0 += sample.temperature_c;
        slot.1 += 1;
    }

    let daily_averages: Vec<DailyAverage> = by_date
        .into_iter()
        .map(|(date, (sum, count))| DailyAverage {
            date,
            mean_temperature_c: sum / count as f64,
        })
        .collect();

    debug!(samples = series.len(), days = daily_averages.len(), "Forecast aggregated");

    ForecastReport { daily_averages, series }
}
