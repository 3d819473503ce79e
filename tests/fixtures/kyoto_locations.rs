//! Real Kyoto locations for realistic test fixtures.
//!
//! Coordinates sourced from OpenStreetMap.

#![allow(dead_code)]

use itinerary_planner::{Accommodation, Location};

/// A named place with a category label and typical visit length.
#[derive(Debug, Clone, Copy)]
pub struct Place {
    pub name: &'static str,
    pub category: &'static str,
    pub lat: f64,
    pub lng: f64,
    pub minutes: u32,
}

impl Place {
    pub const fn new(name: &'static str, category: &'static str, lat: f64, lng: f64, minutes: u32) -> Self {
        Self { name, category, lat, lng, minutes }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }

    pub fn to_location(&self, id: &str) -> Location {
        Location::new(id, self.name, self.category, self.coords()).with_duration(self.minutes)
    }
}

pub const HOTEL: Place = Place::new("Hotel Granvia Kyoto", "hotel", 34.9858, 135.7588, 0);

pub fn hotel() -> Accommodation {
    Accommodation::new(HOTEL.name, HOTEL.coords())
}

// ============================================================================
// Temples, Shrines and Gardens (outdoor)
// ============================================================================

pub const OUTDOOR: &[Place] = &[
    Place::new("Fushimi Inari Taisha", "religion.shrine", 34.9671, 135.7727, 90),
    Place::new("Kinkaku-ji", "Temple", 35.0394, 135.7292, 60),
    Place::new("Kiyomizu-dera", "Temple", 34.9949, 135.7850, 75),
    Place::new("Arashiyama Bamboo Grove", "natural.forest", 35.0172, 135.6719, 45),
    Place::new("Maruyama Park", "leisure.park", 35.0036, 135.7806, 40),
    Place::new("Philosopher's Path", "hiking", 35.0209, 135.7942, 60),
    Place::new("Ryoan-ji Rock Garden", "garden", 35.0345, 135.7182, 45),
    Place::new("Heian Shrine", "heritage", 35.0160, 135.7824, 45),
];

// ============================================================================
// Museums, Cafes and Shopping (indoor)
// ============================================================================

pub const INDOOR: &[Place] = &[
    Place::new("Kyoto National Museum", "entertainment.museum", 34.9899, 135.7730, 120),
    Place::new("Kyoto International Manga Museum", "museum", 35.0117, 135.7594, 90),
    Place::new("% Arabica Higashiyama", "catering.cafe", 34.9983, 135.7793, 30),
    Place::new("Kyoto Aquarium", "aquarium", 34.9875, 135.7471, 90),
    Place::new("Kyoto Takashimaya", "commercial.shopping_mall", 35.0036, 135.7687, 60),
    Place::new("Minamiza Theatre", "theatre", 35.0040, 135.7731, 120),
];

// ============================================================================
// Unclassified (flexible)
// ============================================================================

pub const FLEXIBLE: &[Place] = &[
    Place::new("Nishiki Market", "market", 35.0049, 135.7653, 60),
    Place::new("Gion District", "Cultural", 35.0037, 135.7760, 90),
    Place::new("Pontocho Alley", "district", 35.0050, 135.7707, 45),
];

/// Build `count` locations from `places`, ids prefixed with `prefix`.
pub fn locations(prefix: &str, places: &[Place], count: usize) -> Vec<Location> {
    places
        .iter()
        .take(count)
        .enumerate()
        .map(|(i, place)| place.to_location(&format!("{prefix}{i}")))
        .collect()
}
