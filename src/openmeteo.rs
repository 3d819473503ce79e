//! Open-Meteo daily forecast adapter. No API key required.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ForecastError;
use crate::model::DailyWeather;
use crate::traits::ForecastProvider;

const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,precipitation_sum,precipitation_probability_max,wind_speed_10m_max,weather_code";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenMeteoConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for OpenMeteoConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.open-meteo.com/v1".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    config: OpenMeteoConfig,
    client: reqwest::blocking::Client,
}

impl OpenMeteoClient {
    pub fn new(config: OpenMeteoConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl ForecastProvider for OpenMeteoClient {
    #[tracing::instrument(level = "debug", skip(self))]
    fn daily_forecast(
        &self,
        location: (f64, f64),
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyWeather>, ForecastError> {
        let url = format!("{}/forecast", self.config.base_url.trim_end_matches('/'));
        let query = [
            ("latitude", location.0.to_string()),
            ("longitude", location.1.to_string()),
            ("start_date", start.to_string()),
            ("end_date", end.to_string()),
            ("timezone", "auto".to_string()),
            ("daily", DAILY_FIELDS.to_string()),
        ];

        let response: ForecastResponse = self
            .client
            .get(url)
            .query(&query)
            .send()?
            .error_for_status()?
            .json()?;

        let daily = response
            .daily
            .ok_or_else(|| ForecastError::MalformedResponse("missing daily block".to_string()))?;
        daily.into_days()
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    daily: Option<DailyData>,
}

#[derive(Debug, Deserialize)]
struct DailyData {
    time: Vec<String>,
    #[serde(rename = "temperature_2m_max", default)]
    temperature_max: Vec<Option<f64>>,
    #[serde(rename = "temperature_2m_min", default)]
    temperature_min: Vec<Option<f64>>,
    #[serde(rename = "precipitation_sum", default)]
    precipitation: Vec<Option<f64>>,
    /// Percent, 0–100.
    #[serde(rename = "precipitation_probability_max", default)]
    precipitation_probability: Vec<Option<f64>>,
    #[serde(rename = "wind_speed_10m_max", default)]
    wind_speed_max: Vec<Option<f64>>,
    #[serde(default)]
    weather_code: Vec<Option<u8>>,
}

fn at<T: Copy>(values: &[Option<T>], index: usize) -> Option<T> {
    values.get(index).copied().flatten()
}

impl DailyData {
    fn into_days(self) -> Result<Vec<DailyWeather>, ForecastError> {
        self.time
            .iter()
            .enumerate()
            .map(|(i, raw_date)| {
                let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d").map_err(|err| {
                    ForecastError::MalformedResponse(format!("bad date '{raw_date}': {err}"))
                })?;
                Ok(DailyWeather {
                    date,
                    temperature_max_c: at(&self.temperature_max, i),
                    temperature_min_c: at(&self.temperature_min, i),
                    precipitation_sum_mm: at(&self.precipitation, i),
                    precipitation_probability: at(&self.precipitation_probability, i)
                        .map(|percent| (percent / 100.0).clamp(0.0, 1.0)),
                    wind_speed_max_kmh: at(&self.wind_speed_max, i),
                    description: at(&self.weather_code, i)
                        .map(|code| weather_code_to_description(code).to_string()),
                })
            })
            .collect()
    }
}

/// Convert a WMO weather code to a human-readable description.
#[must_use]
pub fn weather_code_to_description(code: u8) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        71 => "Slight snow",
        73 => "Moderate snow",
        75 => "Heavy snow",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_block_conversion() {
        let daily: DailyData = serde_json::from_str(
            r#"{
                "time": ["2026-04-01", "2026-04-02"],
                "temperature_2m_max": [21.5, null],
                "temperature_2m_min": [11.0, 9.5],
                "precipitation_sum": [0.0, 12.4],
                "precipitation_probability_max": [5, 90],
                "wind_speed_10m_max": [8.2, 31.0],
                "weather_code": [1, 63]
            }"#,
        )
        .unwrap();

        let days = daily.into_days().unwrap();
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].precipitation_probability, Some(0.05));
        assert_eq!(days[0].description.as_deref(), Some("Mainly clear"));
        assert_eq!(days[1].temperature_max_c, None);
        assert_eq!(days[1].precipitation_probability, Some(0.9));
        assert_eq!(days[1].description.as_deref(), Some("Moderate rain"));
    }

    #[test]
    fn test_short_value_arrays_leave_gaps() {
        let daily: DailyData = serde_json::from_str(
            r#"{"time": ["2026-04-01", "2026-04-02"], "temperature_2m_max": [20.0]}"#,
        )
        .unwrap();
        let days = daily.into_days().unwrap();
        assert_eq!(days[1].temperature_max_c, None);
        assert_eq!(days[1].wind_speed_max_kmh, None);
    }

    #[test]
    fn test_bad_date_is_rejected() {
        let daily: DailyData = serde_json::from_str(r#"{"time": ["April 1"]}"#).unwrap();
        assert!(matches!(daily.into_days(), Err(ForecastError::MalformedResponse(_))));
    }

    #[test]
    fn test_unknown_code() {
        assert_eq!(weather_code_to_description(42), "Unknown");
    }
}
