//! Medicine reminder API routes

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::ReminderService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use health_tracker_shared::types::{ReminderListQuery, ReminderRequest, ReminderResponse};

/// Create reminder routes
pub fn reminder_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reminders).post(create_reminder))
        .route("/:id", get(get_reminder).put(update_reminder).delete(delete_reminder))
}

/// GET /api/v1/reminders?q=<text> - Search reminders
async fn list_reminders(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ReminderListQuery>,
) -> Result<Json<Vec<ReminderResponse>>, ApiError> {
    let reminders = ReminderService::list(
        state.store.as_ref(),
        &auth.owner_id,
        query.q.as_deref(),
        Utc::now(),
    )
    .await?;
    Ok(Json(reminders))
}

/// POST /api/v1/reminders - Save a reminder and schedule its notification
async fn create_reminder(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<ReminderRequest>,
) -> Result<(StatusCode, Json<ReminderResponse>), ApiError> {
    let reminder = ReminderService::create(
        state.store.as_ref(),
        state.scheduler.as_ref(),
        &auth.owner_id,
        req,
        Utc::now(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(reminder)))
}

async fn get_reminder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ReminderResponse>, ApiError> {
    let reminder = ReminderService::get(state.store.as_ref(), &auth.owner_id, &id, Utc::now()).await?;
    Ok(Json(reminder))
}

async fn update_reminder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<ReminderRequest>,
) -> Result<Json<ReminderResponse>, ApiError> {
    let reminder = ReminderService::update(
        state.store.as_ref(),
        state.scheduler.as_ref(),
        &auth.owner_id,
        &id,
        req,
        Utc::now(),
    )
    .await?;
    Ok(Json(reminder))
}

/// DELETE /api/v1/reminders/:id - Delete and cancel the notification
async fn delete_reminder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    ReminderService::delete(
        state.store.as_ref(),
        state.scheduler.as_ref(),
        &auth.owner_id,
        &id,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
