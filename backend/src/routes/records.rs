//! Health record API routes

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::HealthRecordService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use health_tracker_shared::types::{HealthRecordRequest, HealthRecordResponse, RecordListQuery};

/// Create health record routes
pub fn record_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_records).post(create_record))
        .route("/:id", get(get_record).put(update_record).delete(delete_record))
}

/// GET /api/v1/records?sort=<key> - List records with their classification
async fn list_records(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<RecordListQuery>,
) -> Result<Json<Vec<HealthRecordResponse>>, ApiError> {
    let records =
        HealthRecordService::list(state.store.as_ref(), &auth.owner_id, query.sort.as_deref()).await?;
    Ok(Json(records))
}

/// POST /api/v1/records - Create a record
async fn create_record(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<HealthRecordRequest>,
) -> Result<(StatusCode, Json<HealthRecordResponse>), ApiError> {
    let record =
        HealthRecordService::create(state.store.as_ref(), &auth.owner_id, req, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn get_record(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<HealthRecordResponse>, ApiError> {
    let record = HealthRecordService::get(state.store.as_ref(), &auth.owner_id, &id).await?;
    Ok(Json(record))
}

/// PUT /api/v1/records/:id - Replace a record's values
async fn update_record(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<HealthRecordRequest>,
) -> Result<Json<HealthRecordResponse>, ApiError> {
    let record = HealthRecordService::update(state.store.as_ref(), &auth.owner_id, &id, req).await?;
    Ok(Json(record))
}

async fn delete_record(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    HealthRecordService::delete(state.store.as_ref(), &auth.owner_id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
