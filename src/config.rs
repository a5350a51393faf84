use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::catalog::Satellite;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub globe: GlobeConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            static_dir: default_static_dir(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub base_url: String,
    pub page_size: u32,
    pub min_query_len: usize,
    #[serde(deserialize_with = "deserialize_duration")]
    pub debounce: Duration,
    #[serde(deserialize_with = "deserialize_duration")]
    pub timeout: Duration,
    pub initial_search: String,
    pub recommended: Vec<Satellite>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://tle.ivanstanojevic.me/api/tle".to_string(),
            page_size: 50,
            min_query_len: 3,
            debounce: Duration::from_millis(500),
            timeout: Duration::from_secs(15),
            initial_search: "starlink".to_string(),
            recommended: default_recommended(),
        }
    }
}

fn default_recommended() -> Vec<Satellite> {
    [
        ("ISS (ZARYA)", 25544),
        ("TIANHE", 48274),
        ("HST", 20580),
        ("STARLINK-4378", 51073),
        ("NOAA 19", 33591),
        ("GOES 18", 52182),
        ("TERRA", 25994),
        ("GPS BIIF-12", 41328),
    ]
    .into_iter()
    .map(|(name, id)| Satellite::new(name, id))
    .collect()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub endpoint: String,
    pub model: String,
    pub language: String,
    pub credential_file: PathBuf,
    pub env_var: String,
    #[serde(deserialize_with = "deserialize_duration")]
    pub timeout: Duration,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-2.5-flash".to_string(),
            language: "English".to_string(),
            credential_file: PathBuf::from("gemini-api-key"),
            env_var: "API_KEY".to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GlobeConfig {
    pub width: f64,
    pub height: f64,
    #[serde(deserialize_with = "deserialize_duration")]
    pub frame_interval: Duration,
    pub idle_speed_deg_per_ms: f64,
    pub drag_sensitivity: f64,
    #[serde(deserialize_with = "deserialize_duration")]
    pub transition: Duration,
    pub track_past_min: u32,
    pub track_future_min: u32,
    pub track_step_min: u32,
    pub idle_start: [f64; 3],
    pub land_geojson: Option<PathBuf>,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 800.0,
            frame_interval: Duration::from_millis(50),
            idle_speed_deg_per_ms: 0.01,
            drag_sensitivity: 75.0,
            transition: Duration::from_millis(1200),
            track_past_min: 30,
            track_future_min: 90,
            track_step_min: 2,
            idle_start: [-100.0, -20.0, 0.0],
            land_geojson: None,
        }
    }
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    pub fn from_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads the file at `path`, or returns the built-in defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        if self.catalog.page_size == 0 {
            return invalid("catalog.page_size must be positive");
        }
        if self.globe.track_step_min == 0 {
            return invalid("globe.track_step_min must be positive");
        }
        if self.globe.width <= 0.0 || self.globe.height <= 0.0 {
            return invalid("globe dimensions must be positive");
        }
        if self.globe.frame_interval.is_zero() {
            return invalid("globe.frame_interval must be positive");
        }
        Ok(())
    }
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(s.trim()).map_err(serde::de::Error::custom)
}
