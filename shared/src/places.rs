//! Nearby medical facility types

use serde::{Deserialize, Serialize};

/// Search radius around the user's location, in metres
pub const DEFAULT_SEARCH_RADIUS_M: u32 = 10_000;

/// Kind of facility to search for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PlaceCategory {
    #[default]
    Pharmacy,
    Hospital,
    Clinic,
}

impl PlaceCategory {
    /// Text query sent to the places provider
    ///
    /// Pharmacy searches include the regional chains by name.
    pub fn search_query(&self) -> &'static str {
        match self {
            PlaceCategory::Pharmacy => "pharmacy|london drugs|Rexall|drug mart",
            PlaceCategory::Hospital => "hospital",
            PlaceCategory::Clinic => "medical clinic|medical center|medical centre",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlaceCategory::Pharmacy => "Pharmacy",
            PlaceCategory::Hospital => "Hospital",
            PlaceCategory::Clinic => "Clinic",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// One search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceSummary {
    pub place_id: String,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    pub location: Coordinates,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub open_now: Option<bool>,
}

/// Full information about one place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDetail {
    pub place_id: String,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    pub location: Coordinates,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    /// Human-readable weekly schedule, one line per day
    #[serde(default)]
    pub opening_hours: Vec<String>,
}

/// Query string of the nearby search endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct NearbyQuery {
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub category: PlaceCategory,
}

impl NearbyQuery {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            latitude: self.lat,
            longitude: self.lng,
        }
    }
}
