//! Nearby places API routes

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::PlacesService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use health_tracker_shared::{NearbyQuery, PlaceDetail, PlaceSummary};

/// Create places routes
pub fn places_routes() -> Router<AppState> {
    Router::new()
        .route("/nearby", get(nearby_places))
        .route("/:place_id", get(place_details))
}

/// GET /api/v1/places/nearby?lat=&lng=&category= - Search around a location
async fn nearby_places(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<NearbyQuery>,
) -> Result<Json<Vec<PlaceSummary>>, ApiError> {
    let places = PlacesService::nearby(state.places.as_ref(), query).await?;
    Ok(Json(places))
}

async fn place_details(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(place_id): Path<String>,
) -> Result<Json<PlaceDetail>, ApiError> {
    let detail = PlacesService::details(state.places.as_ref(), &place_id).await?;
    Ok(Json(detail))
}
