//! Plain-text rendering of a dashboard report.

use std::fmt::Write;

use smartweather_core::{
    Advisory, CurrentConditions, DailyAverage, ForecastReport, ForecastSection, Severity,
    dashboard::DashboardReport,
};

/// Block characters for sparkline levels.
const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

const BAR_WIDTH: usize = 30;

pub fn dashboard(report: &DashboardReport) -> String {
    let mut out = String::new();

    out.push_str(&conditions(&report.conditions));
    out.push('\n');

    out.push_str("Weather Alerts\n");
    out.push_str(&advisory_line(&report.advisory));
    out.push('\n');

    match &report.forecast {
        ForecastSection::Ready { report, advisories } => {
            out.push_str(&forecast(report));
            out.push_str("\nSmart Weather Insights\n");
            for advisory in advisories {
                out.push_str(&advisory_line(advisory));
            }
        }
        ForecastSection::Unavailable(e) => {
            let _ = writeln!(out, "Forecast unavailable: {e}");
        }
    }

    out
}

pub fn conditions(c: &CurrentConditions) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} - {}", c.city, title_case(&c.description));
    let _ = writeln!(out, "  Temperature (°C)   {:>8.2}", c.temperature_c);
    let _ = writeln!(out, "  Feels Like (°C)    {:>8.2}", c.feels_like_c);
    let _ = writeln!(out, "  Humidity (%)       {:>8}", c.humidity_pct);
    let _ = writeln!(out, "  Pressure (hPa)     {:>8}", c.pressure_hpa);
    let _ = writeln!(out, "  Wind Speed (m/s)   {:>8}", c.wind_speed_mps);
    out
}

pub fn advisory_line(a: &Advisory) -> String {
    format!("  [{}] {}\n", severity_tag(a.severity), a.message)
}

fn severity_tag(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "INFO",
        Severity::Success => " OK ",
        Severity::Neutral => "NOTE",
        Severity::Warning => "WARN",
        Severity::Danger => "DANGER",
    }
}

pub fn forecast(report: &ForecastReport) -> String {
    let mut out = String::new();

    if report.is_empty() {
        out.push_str("5-Day Temperature Forecast\n  (no forecast samples)\n");
        return out;
    }

    out.push_str("5-Day Temperature Forecast\n");
    out.push_str(&daily_bars(&report.daily_averages));

    let temps: Vec<f64> = report.series.iter().map(|s| s.temperature_c).collect();
    let humidity: Vec<f64> = report.series.iter().map(|s| f64::from(s.humidity_pct)).collect();

    if let (Some(first), Some(last)) = (report.series.first(), report.series.last()) {
        let _ = writeln!(
            out,
            "\nTrend {} .. {}",
            first.timestamp.format("%Y-%m-%d %H:%M"),
            last.timestamp.format("%Y-%m-%d %H:%M"),
        );
    }
    let _ = writeln!(out, "  Temperature (°C)  {}", sparkline(&temps));
    let _ = writeln!(out, "  Humidity (%)      {}", sparkline(&humidity));

    out
}

fn daily_bars(days: &[DailyAverage]) -> String {
    let mut out = String::new();
    let (min, max) = bounds(days.iter().map(|d| d.mean_temperature_c));

    for day in days {
        let len = scale(day.mean_temperature_c, min, max, BAR_WIDTH - 1) + 1;
        let _ = writeln!(
            out,
            "  {}  {:>6.2} °C  {}",
            day.date.format("%Y-%m-%d"),
            day.mean_temperature_c,
            "█".repeat(len),
        );
    }
    out
}

/// One block character per value, scaled between the series min and max.
pub fn sparkline(values: &[f64]) -> String {
    let (min, max) = bounds(values.iter().copied());
    values
        .iter()
        .map(|v| BLOCKS[scale(*v, min, max, BLOCKS.len() - 1)])
        .collect()
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)))
}

/// Map `value` in `[min, max]` onto `0..=steps`. A flat range maps to the middle.
fn scale(value: f64, min: f64, max: f64, steps: usize) -> usize {
    let span = max - min;
    if !span.is_finite() || span <= f64::EPSILON {
        return steps / 2;
    }
    let normalized = ((value - min) / span).clamp(0.0, 1.0);
    ((normalized * steps as f64).round() as usize).min(steps)
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
