//! Domain records passed between planning stages.
//!
//! Coordinates are `(lat, lng)` pairs throughout, matching the provider
//! traits in [`crate::traits`].

use std::fmt;
use std::num::NonZeroU32;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::suitability::{self, Suitability};
use crate::weather::{self, WeatherCategory};

/// Visit duration used when a location does not carry one.
pub const DEFAULT_VISIT_MINUTES: u32 = 60;

fn default_visit_duration() -> NonZeroU32 {
    NonZeroU32::new(DEFAULT_VISIT_MINUTES).unwrap_or(NonZeroU32::MIN)
}

/// A visitable point of interest.
///
/// Immutable once built; suitability is derived from the category label on
/// demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    id: String,
    name: String,
    category: String,
    coordinates: (f64, f64),
    #[serde(default = "default_visit_duration")]
    estimated_visit_duration_minutes: NonZeroU32,
    #[serde(default)]
    address: Option<String>,
}

impl Location {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        coordinates: (f64, f64),
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            coordinates,
            estimated_visit_duration_minutes: default_visit_duration(),
            address: None,
        }
    }

    /// Sets the visit duration. Zero falls back to [`DEFAULT_VISIT_MINUTES`].
    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.estimated_visit_duration_minutes =
            NonZeroU32::new(minutes).unwrap_or_else(default_visit_duration);
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn coordinates(&self) -> (f64, f64) {
        self.coordinates
    }

    pub fn estimated_visit_duration_minutes(&self) -> u32 {
        self.estimated_visit_duration_minutes.get()
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn suitability(&self) -> Suitability {
        suitability::classify(&self.category)
    }
}

/// Aggregate forecast for one calendar day. Any measurement may be missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyWeather {
    pub date: NaiveDate,
    #[serde(default)]
    pub temperature_max_c: Option<f64>,
    #[serde(default)]
    pub temperature_min_c: Option<f64>,
    #[serde(default)]
    pub precipitation_sum_mm: Option<f64>,
    /// Probability in `[0, 1]`.
    #[serde(default)]
    pub precipitation_probability: Option<f64>,
    #[serde(default)]
    pub wind_speed_max_kmh: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
}

impl DailyWeather {
    /// A forecast with no measurements; classifies as `good`.
    pub fn unknown(date: NaiveDate) -> Self {
        Self {
            date,
            temperature_max_c: None,
            temperature_min_c: None,
            precipitation_sum_mm: None,
            precipitation_probability: None,
            wind_speed_max_kmh: None,
            description: None,
        }
    }

    pub fn category(&self) -> WeatherCategory {
        weather::classify(self)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    #[default]
    Walking,
    Driving,
    Cycling,
    Transit,
}

impl TransportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportMode::Walking => "walking",
            TransportMode::Driving => "driving",
            TransportMode::Cycling => "cycling",
            TransportMode::Transit => "transit",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A point-to-point travel estimate from a routing collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelSegment {
    pub origin: (f64, f64),
    pub destination: (f64, f64),
    pub mode: TransportMode,
    pub distance_meters: f64,
    pub duration_seconds: f64,
}

/// The trip's fixed home base; every day starts and ends here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Accommodation {
    pub name: String,
    pub coordinates: (f64, f64),
}

impl Accommodation {
    pub fn new(name: impl Into<String>, coordinates: (f64, f64)) -> Self {
        Self {
            name: name.into(),
            coordinates,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    Start {
        location: String,
        coordinates: (f64, f64),
    },
    Travel {
        mode: TransportMode,
        distance_km: f64,
        duration_minutes: u32,
        origin: (f64, f64),
        destination: (f64, f64),
    },
    Visit {
        location_id: String,
        name: String,
        category: String,
        duration_minutes: u32,
        coordinates: (f64, f64),
        address: Option<String>,
    },
    End {
        location: String,
        coordinates: (f64, f64),
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEvent {
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    #[serde(flatten)]
    pub kind: EventKind,
}

impl TimelineEvent {
    pub fn is_accommodation_anchor(&self) -> bool {
        matches!(self.kind, EventKind::Start { .. } | EventKind::End { .. })
    }
}

/// One day's schedule. Built only by the timeline builder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayPlan {
    pub(crate) day_number: usize,
    pub(crate) date: NaiveDate,
    pub(crate) weather: Option<DailyWeather>,
    pub(crate) weather_category: Option<WeatherCategory>,
    pub(crate) mode: TransportMode,
    pub(crate) locations: Vec<Location>,
    pub(crate) events: Vec<TimelineEvent>,
    pub(crate) total_distance_km: f64,
    pub(crate) total_travel_minutes: u32,
    pub(crate) total_visit_minutes: u64,
    pub(crate) start_time: NaiveTime,
    pub(crate) end_time: NaiveTime,
    pub(crate) ends_at: NaiveDateTime,
    #[serde(skip)]
    pub(crate) distance_meters: f64,
}

impl DayPlan {
    /// 1-based position within the trip.
    pub fn day_number(&self) -> usize {
        self.day_number
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn weather(&self) -> Option<&DailyWeather> {
        self.weather.as_ref()
    }

    pub fn weather_category(&self) -> Option<WeatherCategory> {
        self.weather_category
    }

    pub fn mode(&self) -> TransportMode {
        self.mode
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }

    /// Distance over all travel segments, in km rounded to 2 decimals.
    pub fn total_distance_km(&self) -> f64 {
        self.total_distance_km
    }

    /// Unrounded distance over all travel segments.
    pub fn distance_meters(&self) -> f64 {
        self.distance_meters
    }

    pub fn total_travel_minutes(&self) -> u32 {
        self.total_travel_minutes
    }

    pub fn total_visit_minutes(&self) -> u64 {
        self.total_visit_minutes
    }

    pub fn start_time(&self) -> NaiveTime {
        self.start_time
    }

    /// Wall-clock time of the return. A day running past midnight has an
    /// `end_time` earlier than its `start_time`; use [`DayPlan::ends_at`] to
    /// compare.
    pub fn end_time(&self) -> NaiveTime {
        self.end_time
    }

    /// Timestamp at which the day returns to the accommodation.
    pub fn ends_at(&self) -> NaiveDateTime {
        self.ends_at
    }
}

/// The finished trip plan.
///
/// Day plans are read-only; a reviewer may only flip the approval flag.
/// Any content change goes through a new planning run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Itinerary {
    pub(crate) start_date: NaiveDate,
    pub(crate) end_date: NaiveDate,
    pub(crate) days: Vec<DayPlan>,
    pub(crate) total_locations: usize,
    pub(crate) total_distance_km: f64,
    pub(crate) warnings: Vec<String>,
    pub(crate) approved: bool,
}

impl Itinerary {
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn days(&self) -> &[DayPlan] {
        &self.days
    }

    pub fn total_days(&self) -> usize {
        self.days.len()
    }

    pub fn total_locations(&self) -> usize {
        self.total_locations
    }

    pub fn total_distance_km(&self) -> f64 {
        self.total_distance_km
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn is_approved(&self) -> bool {
        self.approved
    }

    pub fn approve(&mut self) {
        self.approved = true;
    }
}

pub(crate) fn round_km(meters: f64) -> f64 {
    (meters / 10.0).round() / 100.0
}

pub(crate) fn whole_minutes(seconds: f64) -> u32 {
    (seconds / 60.0).round().max(0.0) as u32
}
