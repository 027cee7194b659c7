use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

/// Environment variables checked for the API key, in order, before the config file.
pub const API_KEY_ENV_VARS: &[&str] = &["SMARTWEATHER_API_KEY", "API_KEY"];

/// Cities offered in the interactive picker.
pub const PRESET_CITIES: &[&str] = &[
    "Visakhapatnam", "Vijayawada", "Hyderabad", "Chennai", "Bengaluru", "Mumbai",
    "Pune", "Delhi", "Kolkata", "Ahmedabad", "Surat", "Jaipur", "Lucknow",
    "Kanpur", "Nagpur", "Indore", "Bhopal", "Coimbatore", "Madurai", "Tirupati",
    "Mysuru", "Mangalore", "Kochi", "Thiruvananthapuram", "Patna", "Chandigarh",
    "Bhubaneswar", "Ranchi", "Raipur", "Guwahati", "New York", "London", "Paris",
    "Tokyo", "Dubai", "Sydney", "Singapore", "Toronto", "Berlin", "Cape Town",
];

pub const MIN_REFRESH_MINUTES: u8 = 1;
pub const MAX_REFRESH_MINUTES: u8 = 15;

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// default_city = "London"
/// auto_detect = false
/// refresh_minutes = 5
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// OpenWeather API key. Environment variables take precedence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_geolocation_url")]
    pub geolocation_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Used when no city is given and detection is off or fails.
    #[serde(default = "default_city")]
    pub default_city: String,

    #[serde(default = "default_auto_detect")]
    pub auto_detect: bool,

    #[serde(default = "default_refresh_minutes")]
    pub refresh_minutes: u8,
}

fn default_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_geolocation_url() -> String {
    "http://ip-api.com/json".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

fn default_city() -> String {
    "Visakhapatnam".to_string()
}

const fn default_auto_detect() -> bool {
    true
}

const fn default_refresh_minutes() -> u8 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            geolocation_url: default_geolocation_url(),
            timeout_secs: default_timeout_secs(),
            default_city: default_city(),
            auto_detect: default_auto_detect(),
            refresh_minutes: default_refresh_minutes(),
        }
    }
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(path)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "smartweather", "smartweather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// API key from the environment, falling back to the config file.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.resolve_api_key_with(|name| std::env::var(name).ok())
    }

    fn resolve_api_key_with(&self, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
        API_KEY_ENV_VARS
            .iter()
            .filter_map(|name| lookup(name))
            .chain(self.api_key.clone())
            .map(|key| key.trim().to_string())
            .find(|key| !key.is_empty())
    }

    pub fn set_api_key(&mut self, api_key: String) {
        let trimmed = api_key.trim();
        self.api_key = (!trimmed.is_empty()).then(|| trimmed.to_string());
    }

    /// Refresh interval clamped to the supported range.
    pub fn refresh_minutes(&self) -> u8 {
        self.refresh_minutes.clamp(MIN_REFRESH_MINUTES, MAX_REFRESH_MINUTES)
    }
}
