//! Recovery record API routes

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::RecoveryService;
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use health_tracker_shared::types::{PhotoDeleteQuery, RecoveryRecordRequest, RecoverySummary};
use health_tracker_shared::RecoveryRecord;

/// Create recovery routes; photo uploads are capped at `max_upload_bytes`
pub fn recovery_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(list_records).post(create_record))
        .route("/:id", get(get_record).put(update_record).delete(delete_record))
        .route(
            "/:id/photos",
            post(add_photo)
                .delete(remove_photo)
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
}

async fn list_records(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<RecoverySummary>>, ApiError> {
    let records = RecoveryService::list(state.store.as_ref(), &auth.owner_id).await?;
    Ok(Json(records))
}

async fn create_record(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<RecoveryRecordRequest>,
) -> Result<(StatusCode, Json<RecoveryRecord>), ApiError> {
    let record =
        RecoveryService::create(state.store.as_ref(), &auth.owner_id, req, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn get_record(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<RecoveryRecord>, ApiError> {
    let record = RecoveryService::get(state.store.as_ref(), &auth.owner_id, &id).await?;
    Ok(Json(record))
}

async fn update_record(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<RecoveryRecordRequest>,
) -> Result<Json<RecoveryRecord>, ApiError> {
    let record = RecoveryService::update(state.store.as_ref(), &auth.owner_id, &id, req).await?;
    Ok(Json(record))
}

/// DELETE /api/v1/recovery/:id - Delete the record and its photos
async fn delete_record(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    RecoveryService::delete(
        state.store.as_ref(),
        state.storage.as_ref(),
        &auth.owner_id,
        &id,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/recovery/:id/photos - Upload raw image bytes
async fn add_photo(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<RecoveryRecord>), ApiError> {
    let record = RecoveryService::add_photo(
        state.store.as_ref(),
        state.storage.as_ref(),
        &auth.owner_id,
        &id,
        body.to_vec(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// DELETE /api/v1/recovery/:id/photos?storagePath=... - Remove one photo
async fn remove_photo(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Query(query): Query<PhotoDeleteQuery>,
) -> Result<Json<RecoveryRecord>, ApiError> {
    let record = RecoveryService::remove_photo(
        state.store.as_ref(),
        state.storage.as_ref(),
        &auth.owner_id,
        &id,
        &query.storage_path,
    )
    .await?;
    Ok(Json(record))
}
