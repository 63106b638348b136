//! Health Tracker Shared Library
//!
//! This crate contains the domain models, the health rules engine, and the
//! validation used across the backend and WASM modules. It performs no I/O.

pub mod errors;
pub mod health_rules;
pub mod models;
pub mod places;
pub mod search;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use health_rules::*;
pub use models::{
    collections, photo_storage_path, Gender, HealthRecord, MedicineReminder, MetricValue, Photo,
    RecoveryRecord, UserProfile, DEFAULT_USERNAME, RECOVERY_PREVIEW_PHOTOS,
};
pub use places::{Coordinates, NearbyQuery, PlaceCategory, PlaceDetail, PlaceSummary};
pub use types::*;
