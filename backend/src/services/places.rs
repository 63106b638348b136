//! Nearby places service

use crate::error::ApiError;
use crate::places::PlacesLookup;
use health_tracker_shared::validation::validate_coordinates;
use health_tracker_shared::{NearbyQuery, PlaceDetail, PlaceSummary};
use tracing::debug;

pub struct PlacesService;

impl PlacesService {
    /// Places of the requested category around a validated location
    pub async fn nearby(
        places: &dyn PlacesLookup,
        query: NearbyQuery,
    ) -> Result<Vec<PlaceSummary>, ApiError> {
        validate_coordinates(query.lat, query.lng)?;

        let results = places
            .search_nearby(query.coordinates(), query.category)
            .await?;
        debug!(category = query.category.as_str(), count = results.len(), "Nearby places found");
        Ok(results)
    }

    pub async fn details(places: &dyn PlacesLookup, place_id: &str) -> Result<PlaceDetail, ApiError> {
        let place_id = place_id.trim();
        if place_id.is_empty() {
            return Err(ApiError::InvalidInput("Place id is required".to_string()));
        }

        Ok(places.get_details(place_id).await?)
    }
}
