//! Deterministic collaborators for planner tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::NaiveDate;

use itinerary_planner::traits::{DurationMatrix, RoutingProvider};
use itinerary_planner::model::TravelSegment;
use itinerary_planner::{DailyWeather, RoutingError, TransportMode};

/// Manhattan distance router (simple, predictable).
///
/// One coordinate unit is one minute of travel and one kilometer.
pub struct ManhattanRouter;

fn manhattan(from: (f64, f64), to: (f64, f64)) -> f64 {
    (from.0 - to.0).abs() + (from.1 - to.1).abs()
}

impl RoutingProvider for ManhattanRouter {
    fn segment(
        &self,
        origin: (f64, f64),
        destination: (f64, f64),
        mode: TransportMode,
    ) -> Result<TravelSegment, RoutingError> {
        let dist = manhattan(origin, destination);
        Ok(TravelSegment {
            origin,
            destination,
            mode,
            distance_meters: dist * 1000.0,
            duration_seconds: dist * 60.0,
        })
    }

    fn duration_matrix(
        &self,
        locations: &[(f64, f64)],
        _mode: TransportMode,
    ) -> Result<DurationMatrix, RoutingError> {
        Ok(locations
            .iter()
            .map(|from| locations.iter().map(|to| Some(manhattan(*from, *to) * 60.0)).collect())
            .collect())
    }
}

/// Wraps a router and counts every call made through it.
pub struct CountingRouter<R> {
    pub inner: R,
    pub segments: AtomicUsize,
    pub matrices: AtomicUsize,
}

impl<R> CountingRouter<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            segments: AtomicUsize::new(0),
            matrices: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.segments.load(Ordering::SeqCst) + self.matrices.load(Ordering::SeqCst)
    }
}

impl<R: RoutingProvider> RoutingProvider for CountingRouter<R> {
    fn segment(
        &self,
        origin: (f64, f64),
        destination: (f64, f64),
        mode: TransportMode,
    ) -> Result<TravelSegment, RoutingError> {
        self.segments.fetch_add(1, Ordering::SeqCst);
        self.inner.segment(origin, destination, mode)
    }

    fn duration_matrix(
        &self,
        locations: &[(f64, f64)],
        mode: TransportMode,
    ) -> Result<DurationMatrix, RoutingError> {
        self.matrices.fetch_add(1, Ordering::SeqCst);
        self.inner.duration_matrix(locations, mode)
    }
}

/// Fails any request that touches `blocked`; otherwise routes like
/// [`ManhattanRouter`].
pub struct BlockedRouter {
    pub blocked: (f64, f64),
}

impl BlockedRouter {
    fn check(&self, points: &[(f64, f64)]) -> Result<(), RoutingError> {
        if points.contains(&self.blocked) {
            return Err(RoutingError::Service {
                code: "NoRoute".to_string(),
                message: "Impossible route between points".to_string(),
            });
        }
        Ok(())
    }
}

impl RoutingProvider for BlockedRouter {
    fn segment(
        &self,
        origin: (f64, f64),
        destination: (f64, f64),
        mode: TransportMode,
    ) -> Result<TravelSegment, RoutingError> {
        self.check(&[origin, destination])?;
        ManhattanRouter.segment(origin, destination, mode)
    }

    fn duration_matrix(
        &self,
        locations: &[(f64, f64)],
        mode: TransportMode,
    ) -> Result<DurationMatrix, RoutingError> {
        self.check(locations)?;
        ManhattanRouter.duration_matrix(locations, mode)
    }
}

/// Every leg has the same length and duration.
pub struct FixedRouter {
    pub distance_meters: f64,
    pub duration_seconds: f64,
}

impl RoutingProvider for FixedRouter {
    fn segment(
        &self,
        origin: (f64, f64),
        destination: (f64, f64),
        mode: TransportMode,
    ) -> Result<TravelSegment, RoutingError> {
        Ok(TravelSegment {
            origin,
            destination,
            mode,
            distance_meters: self.distance_meters,
            duration_seconds: self.duration_seconds,
        })
    }

    fn duration_matrix(
        &self,
        locations: &[(f64, f64)],
        _mode: TransportMode,
    ) -> Result<DurationMatrix, RoutingError> {
        let n = locations.len();
        Ok((0..n)
            .map(|i| (0..n).map(|j| Some(if i == j { 0.0 } else { self.duration_seconds })).collect())
            .collect())
    }
}

// ============================================================================
// Forecast builders
// ============================================================================

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn forecast(on: NaiveDate, temp: f64, precip: f64, probability: f64, wind: f64) -> DailyWeather {
    DailyWeather {
        temperature_max_c: Some(temp),
        temperature_min_c: Some(temp - 8.0),
        precipitation_sum_mm: Some(precip),
        precipitation_probability: Some(probability),
        wind_speed_max_kmh: Some(wind),
        ..DailyWeather::unknown(on)
    }
}

/// Classifies as `excellent`.
pub fn sunny(on: NaiveDate) -> DailyWeather {
    forecast(on, 22.0, 0.0, 0.05, 10.0)
}

/// Classifies as `good`.
pub fn mild(on: NaiveDate) -> DailyWeather {
    forecast(on, 30.0, 1.0, 0.3, 25.0)
}

/// Classifies as `challenging`.
pub fn stormy(on: NaiveDate) -> DailyWeather {
    forecast(on, 15.0, 7.0, 0.65, 45.0)
}

/// Classifies as `indoor`.
pub fn downpour(on: NaiveDate) -> DailyWeather {
    forecast(on, 14.0, 25.0, 0.95, 30.0)
}

/// Classifies as `fair`.
pub fn overcast(on: NaiveDate) -> DailyWeather {
    forecast(on, 17.0, 3.0, 0.5, 25.0)
}
