//! Indoor/outdoor tagging of locations from their category label.

use std::fmt;

use serde::{Deserialize, Serialize};

const INDOOR_KEYWORDS: &[&str] = &[
    "museum",
    "gallery",
    "aquarium",
    "entertainment",
    "cinema",
    "theater",
    "theatre",
    "cafe",
    "coffee",
    "restaurant",
    "bar",
    "pub",
    "catering",
    "shopping",
    "shop",
    "mall",
    "spa",
    "gym",
];

// Temples and shrines count as outdoor experiences.
const OUTDOOR_KEYWORDS: &[&str] = &[
    "park",
    "garden",
    "natural",
    "nature",
    "beach",
    "mountain",
    "viewpoint",
    "hiking",
    "historic",
    "heritage",
    "monument",
    "religion",
    "religious",
    "temple",
    "shrine",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suitability {
    Indoor,
    Outdoor,
    Flexible,
}

impl fmt::Display for Suitability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Suitability::Indoor => "indoor",
            Suitability::Outdoor => "outdoor",
            Suitability::Flexible => "flexible",
        };
        f.write_str(label)
    }
}

/// Classify a category label. Indoor keywords win when both sets match.
pub fn classify(category: &str) -> Suitability {
    let category = category.to_lowercase();
    let matches = |keywords: &[&str]| keywords.iter().any(|word| category.contains(word));

    if matches(INDOOR_KEYWORDS) {
        Suitability::Indoor
    } else if matches(OUTDOOR_KEYWORDS) {
        Suitability::Outdoor
    } else {
        Suitability::Flexible
    }
}
