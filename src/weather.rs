//! Daily forecast classification.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::DailyWeather;

// Stand-ins for missing measurements. Together they classify as `good`, so a
// gap in the forecast never pushes a day towards indoor scheduling.
const FALLBACK_TEMPERATURE_C: f64 = 20.0;
const FALLBACK_PRECIPITATION_MM: f64 = 1.0;
const FALLBACK_PRECIPITATION_PROBABILITY: f64 = 0.3;
const FALLBACK_WIND_KMH: f64 = 15.0;

/// Outdoor favorability of a day, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherCategory {
    Excellent,
    Good,
    Fair,
    Indoor,
    Challenging,
}

impl WeatherCategory {
    /// Days that should host outdoor locations.
    pub fn favors_outdoor(&self) -> bool {
        matches!(self, WeatherCategory::Excellent | WeatherCategory::Good)
    }

    /// Days that should host indoor locations.
    pub fn favors_indoor(&self) -> bool {
        matches!(self, WeatherCategory::Indoor | WeatherCategory::Challenging)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherCategory::Excellent => "excellent",
            WeatherCategory::Good => "good",
            WeatherCategory::Fair => "fair",
            WeatherCategory::Indoor => "indoor",
            WeatherCategory::Challenging => "challenging",
        }
    }
}

impl fmt::Display for WeatherCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a day's forecast by cascading thresholds, most permissive first.
///
/// The temperature band is checked against the daytime maximum.
pub fn classify(day: &DailyWeather) -> WeatherCategory {
    let temp = day.temperature_max_c.unwrap_or(FALLBACK_TEMPERATURE_C);
    let precip = day
        .precipitation_sum_mm
        .unwrap_or(FALLBACK_PRECIPITATION_MM);
    let probability = day
        .precipitation_probability
        .unwrap_or(FALLBACK_PRECIPITATION_PROBABILITY);
    let wind = day.wind_speed_max_kmh.unwrap_or(FALLBACK_WIND_KMH);

    if (10.0..=28.0).contains(&temp) && precip < 0.5 && probability < 0.2 && wind < 20.0 {
        WeatherCategory::Excellent
    } else if (5.0..=32.0).contains(&temp) && precip < 2.0 && probability < 0.4 && wind < 30.0 {
        WeatherCategory::Good
    } else if precip < 5.0 && probability < 0.6 && wind < 40.0 {
        WeatherCategory::Fair
    } else if precip > 10.0 || probability > 0.7 || wind > 50.0 {
        WeatherCategory::Indoor
    } else {
        WeatherCategory::Challenging
    }
}
