//! CSV export of the forecast series.

use serde::Serialize;
use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};
use tracing::info;

use crate::{error::WeatherError, model::ForecastSample};

pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Serialize)]
struct CsvRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Temperature (°C)")]
    temperature_c: f64,
    #[serde(rename = "Humidity (%)")]
    humidity_pct: u8,
}

impl From<&ForecastSample> for CsvRow {
    fn from(sample: &ForecastSample) -> Self {
        Self {
            date: sample.timestamp.format(DATE_FORMAT).to_string(),
            temperature_c: sample.temperature_c,
            humidity_pct: sample.humidity_pct,
        }
    }
}

/// `{city}_forecast.csv`, with path separators replaced.
pub fn csv_file_name(city: &str) -> String {
    let safe: String = city
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("{safe}_forecast.csv")
}

/// Write one row per sample, in series order. An empty series still gets the header.
pub fn write_csv<W: Write>(series: &[ForecastSample], writer: W) -> Result<(), WeatherError> {
    let mut wtr = csv::Writer::from_writer(writer);

    if series.is_empty() {
        wtr.write_record(["Date", "Temperature (°C)", "Humidity (%)"])?;
    }
    for sample in series {
        wtr.serialize(CsvRow::from(sample))?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn to_csv_bytes(series: &[ForecastSample]) -> Result<Vec<u8>, WeatherError> {
    let mut buf = Vec::new();
    write_csv(series, &mut buf)?;
    Ok(buf)
}

/// Write `{dir}/{city}_forecast.csv` and return its path.
pub fn export_to_dir(
    dir: &Path,
    city: &str,
    series: &[ForecastSample],
) -> Result<PathBuf, WeatherError> {
    let path = dir.join(csv_file_name(city));
    let file = File::create(&path)?;
    write_csv(series, file)?;

    info!(path = %path.display(), rows = series.len(), "Forecast exported");
    Ok(path)
}
