//! User profile API routes

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::ProfileService;
use crate::state::AppState;
use axum::{extract::State, routing::get, Json, Router};
use health_tracker_shared::types::UpdateProfileRequest;
use health_tracker_shared::UserProfile;

/// Create profile routes
pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/", get(get_profile).post(provision_profile).put(update_profile))
}

/// POST /api/v1/profile - Provision the default profile after sign-up
async fn provision_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<UserProfile>, ApiError> {
    let profile = ProfileService::provision(state.store.as_ref(), &auth).await?;
    Ok(Json(profile))
}

async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<UserProfile>, ApiError> {
    let profile = ProfileService::get(state.store.as_ref(), &auth.owner_id).await?;
    Ok(Json(profile))
}

/// PUT /api/v1/profile - Merge profile fields
async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<UserProfile>, ApiError> {
    let profile = ProfileService::update(state.store.as_ref(), &auth.owner_id, req).await?;
    Ok(Json(profile))
}
