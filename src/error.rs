//! Error types for planning runs and their collaborators.

use thiserror::Error;

/// Failure of a routing collaborator (segment or matrix request).
#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("routing request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("routing service returned {code}: {message}")]
    Service { code: String, message: String },

    #[error("malformed routing response: {0}")]
    MalformedResponse(String),
}

/// Failure of a weather forecast collaborator.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("forecast request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed forecast response: {0}")]
    MalformedResponse(String),
}

/// Errors raised while building an itinerary.
///
/// Precondition errors (`InvalidTripLength`, `InsufficientLocations`,
/// `DuplicateLocation`) are raised before any routing call is made.
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("trip length must be between 1 and {max} days, got {days}", max = crate::planner::MAX_TRIP_DAYS)]
    InvalidTripLength { days: usize },

    #[error("a {days}-day trip needs at least {required} locations, got {actual}")]
    InsufficientLocations {
        actual: usize,
        required: usize,
        days: usize,
    },

    #[error("location '{id}' was supplied more than once")]
    DuplicateLocation { id: String },

    #[error("routing unavailable for day {day}: {source}")]
    RoutingUnavailable {
        day: usize,
        #[source]
        source: RoutingError,
    },

    #[error("day {day} runs past the representable date range")]
    ScheduleOverflow { day: usize },

    #[error("day {day} was cancelled after another day failed")]
    Cancelled { day: usize },

    #[error("failed to start planning workers: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

impl PlannerError {
    pub(crate) fn routing(day: usize, source: RoutingError) -> Self {
        Self::RoutingUnavailable { day, source }
    }
}
