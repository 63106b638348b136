//! Route definitions for the Health Tracker API
//!
//! This module organizes all API routes and applies middleware.

use crate::state::AppState;
use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

mod health;
mod places;
mod profile;
mod records;
mod recovery;
mod reminders;

pub use places::places_routes;
pub use profile::profile_routes;
pub use records::record_routes;
pub use recovery::recovery_routes;
pub use reminders::reminder_routes;

/// Create the main application router with all middleware
pub fn create_router(state: AppState) -> Router {
    let storage = &state.config().storage;
    let files = ServeDir::new(&storage.root_dir);
    let max_upload_bytes = storage.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .nest("/api/v1", api_routes(max_upload_bytes))
        // Photos written by the local object storage
        .nest_service("/files", files)
        // Apply middleware layers
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API v1 routes
fn api_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { "Health Tracker API v1" }))
        .nest("/records", records::record_routes())
        .nest("/reminders", reminders::reminder_routes())
        .nest("/recovery", recovery::recovery_routes(max_upload_bytes))
        .nest("/profile", profile::profile_routes())
        .nest("/places", places::places_routes())
}
