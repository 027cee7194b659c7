use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{Confirm, CustomType, CustomUserError, Select, Text, validator::Validation};
use smartweather_core::{
    Config, Dashboard, ForecastSection, IpLocator, PRESET_CITIES, Session, WeatherSource,
    config::{MAX_REFRESH_MINUTES, MIN_REFRESH_MINUTES},
    export, source_from_config,
};
use std::{path::PathBuf, time::Duration};
use tracing::{info, warn};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "smartweather", version, about = "Smart Weather Predictor: current conditions, 5-day forecast and alerts")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively set the API key, default city and refresh interval.
    Configure,

    /// Show the weather dashboard for a city.
    Show {
        /// City name; detected from your IP when omitted and auto-detect is enabled.
        city: Option<String>,

        /// Skip IP-based detection and use the configured default city.
        #[arg(long)]
        no_detect: bool,

        /// Write `{city}_forecast.csv` into DIR (current directory if no DIR given).
        #[arg(long, value_name = "DIR", num_args = 0..=1, default_missing_value = ".")]
        export: Option<PathBuf>,

        /// Keep refreshing every configured interval until interrupted.
        #[arg(long)]
        watch: bool,
    },

    /// List the preset cities.
    Cities,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, no_detect, export, watch } => {
                let config = Config::load()?;
                let city = resolve_city(&config, city, no_detect).await?;
                show(&config, &city, export, watch).await
            }
            Command::Cities => {
                for city in PRESET_CITIES {
                    println!("{city}");
                }
                Ok(())
            }
        }
    }
}

/// Explicit argument, else detection (when enabled), else the configured default.
async fn resolve_city(
    config: &Config,
    city: Option<String>,
    no_detect: bool,
) -> anyhow::Result<String> {
    if let Some(city) = city.map(|c| c.trim().to_string()) {
        if city.is_empty() {
            bail!("City name must not be empty");
        }
        return Ok(city);
    }

    if config.auto_detect && !no_detect {
        let locator = IpLocator::new(&config.geolocation_url, config.timeout_secs)?;
        let city = locator.detect_city_or(&config.default_city).await;
        println!("Detected: {city}");
        return Ok(city);
    }

    Ok(config.default_city.clone())
}

async fn show(
    config: &Config,
    city: &str,
    export_dir: Option<PathBuf>,
    watch: bool,
) -> anyhow::Result<()> {
    let dashboard = Dashboard::new(source_from_config(config)?);
    let mut session = Session::new();

    if !watch {
        let ok = refresh_once(&dashboard, &mut session, city, export_dir.as_ref()).await?;
        print_footer(&session, city);
        if !ok {
            bail!("Could not load weather for {city}");
        }
        return Ok(());
    }

    let interval = Duration::from_secs(u64::from(config.refresh_minutes()) * 60);
    info!(minutes = config.refresh_minutes(), "Auto refresh enabled");

    loop {
        watch_step(&dashboard, &mut session, city, export_dir.as_ref()).await;
        print_footer(&session, city);
        println!("Next refresh in {} minute(s). Press Ctrl-C to stop.\n", config.refresh_minutes());

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = tokio::signal::ctrl_c() => return Ok(()),
        }
    }
}

/// One `--watch` iteration. Errors are reported and the next tick tries again.
async fn watch_step<S: WeatherSource>(
    dashboard: &Dashboard<S>,
    session: &mut Session,
    city: &str,
    export_dir: Option<&PathBuf>,
) {
    if let Err(e) = refresh_once(dashboard, session, city, export_dir).await {
        warn!(error = %e, %city, "Refresh step failed");
        eprintln!("{e:#}");
    }
}

/// Render one dashboard. Lookup failures are printed, not propagated; returns whether
/// current conditions were loaded. Export failures are errors.
async fn refresh_once<S: WeatherSource>(
    dashboard: &Dashboard<S>,
    session: &mut Session,
    city: &str,
    export_dir: Option<&PathBuf>,
) -> anyhow::Result<bool> {
    let report = match dashboard.refresh(session, city).await {
        Ok(report) => report,
        Err(e) => {
            warn!(error = %e, %city, "Dashboard refresh failed");
            eprintln!("{}", e.user_message());
            return Ok(false);
        }
    };

    print!("{}", render::dashboard(&report));

    if let (Some(dir), ForecastSection::Ready { report: forecast, .. }) = (export_dir, &report.forecast) {
        let path = export::export_to_dir(dir, &report.city, &forecast.series)
            .with_context(|| format!("Failed to export forecast into {}", dir.display()))?;
        println!("\nForecast data written to {}", path.display());
    } else if export_dir.is_some() {
        eprintln!("Nothing to export: forecast unavailable.");
    }

    Ok(true)
}

fn print_footer(session: &Session, requested: &str) {
    println!("---");
    println!("Last searched: {}", session.last_searched().unwrap_or(requested));
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Text::new("OpenWeather API key:")
        .with_help_message("Leave empty to keep the current key")
        .prompt()?;
    if !api_key.trim().is_empty() {
        config.set_api_key(api_key);
    }

    let start = PRESET_CITIES
        .iter()
        .position(|c| *c == config.default_city)
        .unwrap_or(0);
    config.default_city = Select::new("Default city:", PRESET_CITIES.to_vec())
        .with_starting_cursor(start)
        .prompt()?
        .to_string();

    config.auto_detect = Confirm::new("Auto detect location from IP?")
        .with_default(config.auto_detect)
        .prompt()?;

    config.refresh_minutes = CustomType::<u8>::new("Auto refresh interval (minutes):")
        .with_default(config.refresh_minutes())
        .with_validator(|v: &u8| -> Result<Validation, CustomUserError> {
            if (MIN_REFRESH_MINUTES..=MAX_REFRESH_MINUTES).contains(v) {
                Ok(Validation::Valid)
            } else {
                Ok(Validation::Invalid(
                    format!("Must be between {MIN_REFRESH_MINUTES} and {MAX_REFRESH_MINUTES}").into(),
                ))
            }
        })
        .prompt()?;

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());

    Ok(())
}
