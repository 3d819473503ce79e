//! itinerary-planner core
//!
//! Weather-aware day assignment, per-day visit ordering and timeline
//! construction for multi-day trips, plus adapters for the routing and
//! forecast services they depend on.

pub mod assignment;
pub mod cache;
pub mod config;
pub mod error;
pub mod haversine;
pub mod model;
pub mod openmeteo;
pub mod optimizer;
pub mod osrm;
pub mod planner;
pub mod suitability;
pub mod timeline;
pub mod traits;
pub mod weather;

pub use error::{ForecastError, PlannerError, RoutingError};
pub use model::{Accommodation, DailyWeather, DayPlan, Itinerary, Location, TransportMode};
pub use planner::{ItineraryPlanner, TripRequest};
