//! Haversine routing estimator (fallback when OSRM is unavailable).
//!
//! Uses great-circle distance and a per-mode average speed. Less accurate
//! than OSRM (ignores the street network) but always available.

use crate::error::RoutingError;
use crate::model::{TransportMode, TravelSegment};
use crate::traits::{DurationMatrix, RoutingProvider};

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Straight-line routing estimator.
#[derive(Debug, Clone)]
pub struct HaversineRouter {
    pub walking_kmh: f64,
    pub cycling_kmh: f64,
    pub transit_kmh: f64,
    pub driving_kmh: f64,
}

impl Default for HaversineRouter {
    fn default() -> Self {
        Self {
            walking_kmh: 5.0,
            cycling_kmh: 15.0,
            transit_kmh: 20.0,
            driving_kmh: 40.0,
        }
    }
}

impl HaversineRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculate haversine distance between two points in kilometers.
    pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
        let (lat1, lng1) = from;
        let (lat2, lng2) = to;

        let lat1_rad = lat1.to_radians();
        let lat2_rad = lat2.to_radians();
        let delta_lat = (lat2 - lat1).to_radians();
        let delta_lng = (lng2 - lng1).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_KM * c
    }

    pub fn speed_kmh(&self, mode: TransportMode) -> f64 {
        match mode {
            TransportMode::Walking => self.walking_kmh,
            TransportMode::Cycling => self.cycling_kmh,
            TransportMode::Transit => self.transit_kmh,
            TransportMode::Driving => self.driving_kmh,
        }
    }

    /// Convert distance in km to travel time in seconds.
    fn km_to_seconds(&self, km: f64, mode: TransportMode) -> f64 {
        km / self.speed_kmh(mode) * 3600.0
    }
}

impl RoutingProvider for HaversineRouter {
    fn segment(
        &self,
        origin: (f64, f64),
        destination: (f64, f64),
        mode: TransportMode,
    ) -> Result<TravelSegment, RoutingError> {
        let km = Self::haversine_km(origin, destination);
        Ok(TravelSegment {
            origin,
            destination,
            mode,
            distance_meters: km * 1000.0,
            duration_seconds: self.km_to_seconds(km, mode),
        })
    }

    fn duration_matrix(
        &self,
        locations: &[(f64, f64)],
        mode: TransportMode,
    ) -> Result<DurationMatrix, RoutingError> {
        let n = locations.len();
        let mut matrix = vec![vec![Some(0.0); n]; n];

        for (i, from) in locations.iter().enumerate() {
            for (j, to) in locations.iter().enumerate() {
                if i != j {
                    let km = Self::haversine_km(*from, *to);
                    matrix[i][j] = Some(self.km_to_seconds(km, mode));
                }
            }
        }

        Ok(matrix)
    }
}
