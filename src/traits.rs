//! Collaborator interfaces the planner calls out to.
//!
//! Concrete adapters live in [`crate::osrm`], [`crate::haversine`] and
//! [`crate::openmeteo`]; tests supply their own.

use chrono::NaiveDate;

use crate::error::{ForecastError, RoutingError};
use crate::model::{DailyWeather, TransportMode, TravelSegment};

/// Square travel-time matrix in seconds, indexed by the requested location
/// order. `None` marks an unreachable pair.
pub type DurationMatrix = Vec<Vec<Option<f64>>>;

/// Travel estimates between coordinates.
pub trait RoutingProvider {
    /// Point-to-point distance and duration.
    fn segment(
        &self,
        origin: (f64, f64),
        destination: (f64, f64),
        mode: TransportMode,
    ) -> Result<TravelSegment, RoutingError>;

    /// All-pairs durations for a set of locations, in one request.
    fn duration_matrix(
        &self,
        locations: &[(f64, f64)],
        mode: TransportMode,
    ) -> Result<DurationMatrix, RoutingError>;
}

impl<R: RoutingProvider + ?Sized> RoutingProvider for &R {
    fn segment(
        &self,
        origin: (f64, f64),
        destination: (f64, f64),
        mode: TransportMode,
    ) -> Result<TravelSegment, RoutingError> {
        (**self).segment(origin, destination, mode)
    }

    fn duration_matrix(
        &self,
        locations: &[(f64, f64)],
        mode: TransportMode,
    ) -> Result<DurationMatrix, RoutingError> {
        (**self).duration_matrix(locations, mode)
    }
}

impl<R: RoutingProvider + ?Sized> RoutingProvider for Box<R> {
    fn segment(
        &self,
        origin: (f64, f64),
        destination: (f64, f64),
        mode: TransportMode,
    ) -> Result<TravelSegment, RoutingError> {
        (**self).segment(origin, destination, mode)
    }

    fn duration_matrix(
        &self,
        locations: &[(f64, f64)],
        mode: TransportMode,
    ) -> Result<DurationMatrix, RoutingError> {
        (**self).duration_matrix(locations, mode)
    }
}

/// Daily forecasts for a coordinate.
///
/// Results are chronological and may stop short of `end`.
pub trait ForecastProvider {
    fn daily_forecast(
        &self,
        location: (f64, f64),
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyWeather>, ForecastError>;
}
