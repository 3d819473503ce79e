//! Test fixtures for itinerary-planner.
//!
//! Provides realistic test data including:
//! - Real Kyoto points of interest (from OpenStreetMap)
//! - Deterministic routing providers and forecast builders

pub mod kyoto_locations;
pub mod routing;

pub use kyoto_locations::*;
pub use routing::*;
