//! Planner configuration.
//!
//! Loaded from a JSON file where every field is optional, then overridden
//! from `ITINERARY_*` environment variables and validated.

use std::env;
use std::fs;
use std::path::Path;

use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::cache::DEFAULT_CACHE_CAPACITY;
use crate::model::TransportMode;
use crate::openmeteo::OpenMeteoConfig;
use crate::osrm::OsrmConfig;

pub const DEFAULT_MAX_WORKERS: usize = 4;
const MAX_WORKERS_LIMIT: usize = 64;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Daily scheduling preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConstraints {
    #[serde(deserialize_with = "deserialize_clock")]
    pub preferred_start_time: NaiveTime,
    #[serde(deserialize_with = "deserialize_clock")]
    pub preferred_end_time: NaiveTime,
    pub max_distance_km_per_day: f64,
}

impl Default for ScheduleConstraints {
    fn default() -> Self {
        Self {
            preferred_start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN),
            preferred_end_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap_or(NaiveTime::MIN),
            max_distance_km_per_day: 10.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Upper bound on days built concurrently.
    pub max_workers: usize,
    pub transport_mode: TransportMode,
    pub constraints: ScheduleConstraints,
    pub osrm: OsrmConfig,
    pub weather: OpenMeteoConfig,
    /// Lifetime of cached routing and forecast responses.
    pub cache_ttl_secs: u64,
    /// Upper bound on cached responses held in memory.
    pub cache_capacity: u64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_workers: DEFAULT_MAX_WORKERS,
            transport_mode: TransportMode::default(),
            constraints: ScheduleConstraints::default(),
            osrm: OsrmConfig::default(),
            weather: OpenMeteoConfig::default(),
            cache_ttl_secs: 24 * 60 * 60,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl PlannerConfig {
    /// Load from `path` (if given), apply environment overrides and validate.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(url) = env::var("ITINERARY_OSRM_URL") {
            self.osrm.base_url = url;
        }
        if let Ok(url) = env::var("ITINERARY_WEATHER_URL") {
            self.weather.base_url = url;
        }
        if let Ok(workers) = env::var("ITINERARY_MAX_WORKERS") {
            self.max_workers = workers.parse().map_err(|_| {
                ConfigError::Invalid(format!("ITINERARY_MAX_WORKERS must be a number, got '{workers}'"))
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_workers == 0 || self.max_workers > MAX_WORKERS_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "max_workers must be between 1 and {MAX_WORKERS_LIMIT}, got {}",
                self.max_workers
            )));
        }

        if self.cache_capacity == 0 {
            return Err(ConfigError::Invalid(
                "cache_capacity must be at least 1".to_string(),
            ));
        }

        for (name, url) in [("osrm.base_url", &self.osrm.base_url), ("weather.base_url", &self.weather.base_url)] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be an http(s) URL, got '{url}'"
                )));
            }
        }

        let constraints = &self.constraints;
        if constraints.preferred_end_time <= constraints.preferred_start_time {
            return Err(ConfigError::Invalid(format!(
                "preferred_end_time {} must be after preferred_start_time {}",
                constraints.preferred_end_time.format("%H:%M"),
                constraints.preferred_start_time.format("%H:%M")
            )));
        }
        if !(constraints.max_distance_km_per_day > 0.0) {
            return Err(ConfigError::Invalid(
                "max_distance_km_per_day must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

/// Parse `HH:MM` or `HH:MM:SS`.
pub fn parse_clock(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

fn deserialize_clock<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_clock(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("expected HH:MM time, got '{raw}'")))
}
