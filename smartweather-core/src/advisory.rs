//! Heuristic advisories derived from current conditions and the forecast outlook.
//!
//! Current conditions go through an ordered rule table where the first match wins.
//! Rain is listed before the temperature extremes and that order must be kept.

use crate::{
    aggregate::ForecastReport,
    model::{Advisory, CurrentConditions, Severity},
};

pub const RAIN: &str = "Rain expected — carry an umbrella!";
pub const HEATWAVE: &str = "Heatwave Alert: Stay hydrated and avoid peak sunlight.";
pub const COLD: &str = "Cold weather — keep warm and carry a jacket.";
pub const LOW_VISIBILITY: &str = "Low visibility, drive safely.";
pub const PLEASANT_TODAY: &str = "Pleasant weather today!";

pub const HOT_WEEK: &str = "Hot Week Ahead: Stay hydrated and avoid going out during afternoons.";
pub const COOL_WEEK: &str = "Cool Week: Ideal for outdoor walks, but keep warm.";
pub const PLEASANT_WEEK: &str = "Pleasant Weather Ahead: Perfect for travel and activities.";
pub const HIGH_HUMIDITY: &str = "High Humidity: Expect sticky air, stay cool.";
pub const DRY_CONDITIONS: &str = "Dry Conditions: Use moisturizer or humidifier indoors.";

/// Predicate of one current-conditions rule.
#[derive(Debug, Clone, Copy)]
pub enum Matcher {
    /// Lowercased description contains any of the substrings.
    DescriptionContains(&'static [&'static str]),
    /// Strictly above, in Celsius.
    TemperatureAbove(f64),
    /// Strictly below, in Celsius.
    TemperatureBelow(f64),
    Always,
}

impl Matcher {
    pub fn matches(&self, conditions: &CurrentConditions) -> bool {
        match self {
            Matcher::DescriptionContains(needles) => {
                let description = conditions.description.to_lowercase();
                needles.iter().any(|n| description.contains(n))
            }
            Matcher::TemperatureAbove(limit) => conditions.temperature_c > *limit,
            Matcher::TemperatureBelow(limit) => conditions.temperature_c < *limit,
            Matcher::Always => true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub matcher: Matcher,
    pub message: &'static str,
    pub severity: Severity,
}

/// Evaluated top to bottom. The last rule always matches.
pub const CURRENT_RULES: &[Rule] = &[
    Rule {
        matcher: Matcher::DescriptionContains(&["rain"]),
        message: RAIN,
        severity: Severity::Info,
    },
    Rule {
        matcher: Matcher::TemperatureAbove(35.0),
        message: HEATWAVE,
        severity: Severity::Danger,
    },
    Rule {
        matcher: Matcher::TemperatureBelow(15.0),
        message: COLD,
        severity: Severity::Info,
    },
    Rule {
        matcher: Matcher::DescriptionContains(&["haze", "fog"]),
        message: LOW_VISIBILITY,
        severity: Severity::Neutral,
    },
    Rule {
        matcher: Matcher::Always,
        message: PLEASANT_TODAY,
        severity: Severity::Success,
    },
];

/// Exactly one advisory for the current conditions.
pub fn current_advisory(conditions: &CurrentConditions) -> Advisory {
    CURRENT_RULES
        .iter()
        .find(|rule| rule.matcher.matches(conditions))
        .map(|rule| Advisory::new(rule.message, rule.severity))
        .unwrap_or_else(|| Advisory::new(PLEASANT_TODAY, Severity::Success))
}

/// Advisories for a forecast period from its overall mean temperature and humidity.
///
/// The temperature advisory always fires; the humidity one is silent in the 40..=80 band.
pub fn forecast_advisories(avg_temp: f64, avg_humidity: f64) -> Vec<Advisory> {
    let mut out = Vec::with_capacity(2);

    let temperature = if avg_temp > 30.0 {
        HOT_WEEK
    } else if avg_temp < 20.0 {
        COOL_WEEK
    } else {
        PLEASANT_WEEK
    };
    out.push(Advisory::new(temperature, Severity::Info));

    if avg_humidity > 80.0 {
        out.push(Advisory::new(HIGH_HUMIDITY, Severity::Warning));
    } else if avg_humidity < 40.0 {
        out.push(Advisory::new(DRY_CONDITIONS, Severity::Info));
    }

    out
}

/// Forecast advisories for a whole report. Empty report, no advisories.
pub fn forecast_outlook(report: &ForecastReport) -> Vec<Advisory> {
    match (report.mean_temperature(), report.mean_humidity()) {
        (Some(temp), Some(humidity)) => forecast_advisories(temp, humidity),
        _ => Vec::new(),
    }
}
