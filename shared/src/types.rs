//! API request and response types

use crate::health_rules::{Classification, ReminderBadge, ReminderStatus};
use crate::models::{Gender, HealthRecord, MedicineReminder, MetricValue, RecoveryRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

// ============================================================================
// Health Record Types
// ============================================================================

/// Create or update a health record
///
/// Metrics arrive as form text or numbers and are validated server-side.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthRecordRequest {
    /// Defaults to now when omitted
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub blood_pressure: MetricValue,
    #[serde(default)]
    pub blood_sugar: MetricValue,
    #[serde(default)]
    pub weight: MetricValue,
    #[serde(default)]
    pub sleep_duration: MetricValue,
    #[serde(default)]
    pub heart_rate: MetricValue,
}

impl HealthRecordRequest {
    /// Build the record owned by `owner_id`, stamping `now` when no date was given
    pub fn into_record(self, owner_id: &str, now: DateTime<Utc>) -> HealthRecord {
        HealthRecord {
            id: None,
            owner_id: owner_id.to_string(),
            date: self.date.unwrap_or(now),
            blood_pressure: self.blood_pressure,
            blood_sugar: self.blood_sugar,
            weight: self.weight,
            sleep_duration: self.sleep_duration,
            heart_rate: self.heart_rate,
        }
    }
}

/// A health record together with its classification
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthRecordResponse {
    #[serde(flatten)]
    pub record: HealthRecord,
    pub classification: Classification,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordListQuery {
    #[serde(default)]
    pub sort: Option<String>,
}

// ============================================================================
// Medicine Reminder Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReminderRequest {
    #[serde(default)]
    #[validate(length(max = 100, message = "Medicine name cannot exceed 100 characters."))]
    pub medicine_name: String,
    #[serde(default)]
    #[validate(length(max = 100, message = "Dosage cannot exceed 100 characters."))]
    pub dosage: String,
    pub time: DateTime<Utc>,
    #[serde(default)]
    #[validate(length(max = 200, message = "Condition cannot exceed 200 characters."))]
    pub condition: String,
    #[serde(default)]
    #[validate(length(max = 1000, message = "Notes cannot exceed 1000 characters."))]
    pub notes: Option<String>,
}

impl ReminderRequest {
    pub fn into_reminder(self, owner_id: &str) -> MedicineReminder {
        MedicineReminder {
            id: None,
            owner_id: owner_id.to_string(),
            medicine_name: self.medicine_name.trim().to_string(),
            dosage: self.dosage.trim().to_string(),
            time: self.time,
            condition: self.condition.trim().to_string(),
            notes: self.notes.filter(|n| !n.trim().is_empty()),
        }
    }
}

/// A reminder with its display status
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderResponse {
    #[serde(flatten)]
    pub reminder: MedicineReminder,
    pub status: ReminderStatus,
    pub badge: ReminderBadge,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReminderListQuery {
    #[serde(default)]
    pub q: Option<String>,
}

// ============================================================================
// Recovery Record Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryRecordRequest {
    #[serde(default)]
    #[validate(length(max = 200, message = "Disease name cannot exceed 200 characters."))]
    pub disease_name: String,
    #[serde(default)]
    #[validate(length(max = 2000, message = "Symptoms cannot exceed 2000 characters."))]
    pub symptoms: String,
    /// Defaults to now when omitted
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    #[validate(length(max = 2000, message = "Notes cannot exceed 2000 characters."))]
    pub notes: Option<String>,
}

impl RecoveryRecordRequest {
    /// Build a record without photos; photos are attached one at a time
    pub fn into_record(self, owner_id: &str, now: DateTime<Utc>) -> RecoveryRecord {
        RecoveryRecord {
            id: None,
            owner_id: owner_id.to_string(),
            disease_name: self.disease_name.trim().to_string(),
            symptoms: self.symptoms.trim().to_string(),
            start_date: self.start_date.unwrap_or(now),
            notes: self.notes.filter(|n| !n.trim().is_empty()),
            photos: Vec::new(),
        }
    }
}

/// Recovery record card shown in the list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoverySummary {
    pub id: String,
    pub disease_name: String,
    pub symptoms: String,
    pub start_date: DateTime<Utc>,
    pub preview_photos: Vec<String>,
    pub photo_count: usize,
}

impl RecoverySummary {
    pub fn from_record(id: String, record: &RecoveryRecord, preview: usize) -> Self {
        Self {
            id,
            disease_name: record.disease_name.clone(),
            symptoms: record.symptoms.clone(),
            start_date: record.start_date,
            preview_photos: record.preview_photos(preview),
            photo_count: record.photos.len(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoDeleteQuery {
    pub storage_path: String,
}

// ============================================================================
// Profile Types
// ============================================================================

/// Partial profile update; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 50, message = "Username must be between 1 and 50 characters."))]
    pub username: Option<String>,
    #[validate(length(max = 2048, message = "Avatar URI is too long."))]
    pub avatar_uri: Option<String>,
    #[validate(range(min = 0.0, max = 300.0, message = "Height must be a non-negative number."))]
    pub height_cm: Option<f64>,
    pub gender: Option<Gender>,
    #[validate(range(max = 150, message = "Age must be between 0 and 150."))]
    pub age: Option<u32>,
    #[validate(length(max = 1000, message = "Allergies cannot exceed 1000 characters."))]
    pub allergies: Option<String>,
}

impl UpdateProfileRequest {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.avatar_uri.is_none()
            && self.height_cm.is_none()
            && self.gender.is_none()
            && self.age.is_none()
            && self.allergies.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}
