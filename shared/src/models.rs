//! Data models for the Health Tracker application
//!
//! Documents live schemaless in the remote document store. These are the
//! typed shapes they are read into and validated against before writes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Document store collection names
pub mod collections {
    pub const HEALTH_RECORDS: &str = "healthRecords";
    pub const MEDICINE: &str = "medicine";
    pub const RECOVERY_RECORDS: &str = "recoveryRecords";
    pub const USERS: &str = "users";
}

/// Number of photos shown on a recovery record card
pub const RECOVERY_PREVIEW_PHOTOS: usize = 3;

// ============================================================================
// Health Records
// ============================================================================

/// A metric value as entered by the user or found in the store.
///
/// Form input arrives as text and older documents may hold either strings or
/// numbers, so the raw value is kept and parsed on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Text(String),
    #[default]
    Missing,
}

impl MetricValue {
    /// Parse as a finite decimal number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Number(n) => Some(*n).filter(|n| n.is_finite()),
            MetricValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            MetricValue::Missing => None,
        }
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        MetricValue::Number(value)
    }
}

impl From<&str> for MetricValue {
    fn from(value: &str) -> Self {
        MetricValue::Text(value.to_string())
    }
}

/// One clinical snapshot for a user at a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthRecord {
    /// Assigned by the store on creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub owner_id: String,
    pub date: DateTime<Utc>,
    /// mmHg
    #[serde(default)]
    pub blood_pressure: MetricValue,
    /// mg/dL
    #[serde(default)]
    pub blood_sugar: MetricValue,
    /// kg
    #[serde(default)]
    pub weight: MetricValue,
    /// hours
    #[serde(default)]
    pub sleep_duration: MetricValue,
    /// bpm
    #[serde(default)]
    pub heart_rate: MetricValue,
}

// ============================================================================
// Medicine Reminders
// ============================================================================

/// A scheduled medication instruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicineReminder {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub owner_id: String,
    pub medicine_name: String,
    pub dosage: String,
    pub time: DateTime<Utc>,
    pub condition: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl MedicineReminder {
    /// Title of the local notification fired for this reminder
    pub fn notification_title(&self) -> &'static str {
        "Medicine Reminder"
    }

    /// Body of the local notification fired for this reminder
    pub fn notification_body(&self) -> String {
        format!(
            "It's time to take your medicine: {} ({})",
            self.medicine_name, self.dosage
        )
    }
}

// ============================================================================
// Recovery Records
// ============================================================================

/// A photo attached to a recovery record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    #[serde(rename = "downloadURL")]
    pub download_url: String,
    /// Unique path of the blob in object storage
    pub storage_path: String,
}

/// Build a fresh owner-scoped object storage path for an image
pub fn photo_storage_path(owner_id: &str) -> String {
    format!("images/{}/{}", owner_id, Uuid::new_v4())
}

/// An illness/recovery episode with notes and photo evidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub owner_id: String,
    pub disease_name: String,
    pub symptoms: String,
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub photos: Vec<Photo>,
}

impl RecoveryRecord {
    /// Download URLs of the first `limit` photos
    pub fn preview_photos(&self, limit: usize) -> Vec<String> {
        self.photos
            .iter()
            .take(limit)
            .map(|p| p.download_url.clone())
            .collect()
    }

    pub fn find_photo(&self, storage_path: &str) -> Option<&Photo> {
        self.photos.iter().find(|p| p.storage_path == storage_path)
    }

    /// Drop the photo with the given storage path, returning whether one was removed
    pub fn remove_photo(&mut self, storage_path: &str) -> bool {
        let before = self.photos.len();
        self.photos.retain(|p| p.storage_path != storage_path);
        self.photos.len() != before
    }
}

// ============================================================================
// User Profile
// ============================================================================

/// Gender options offered on the profile screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Gender {
    Male,
    Female,
    Others,
    #[default]
    #[serde(rename = "Prefer Not to Say")]
    PreferNotToSay,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Others => "Others",
            Gender::PreferNotToSay => "Prefer Not to Say",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default username assigned at sign-up
pub const DEFAULT_USERNAME: &str = "default_user";

/// Profile of one authenticated identity, keyed by that identity's id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub username: String,
    /// Sourced from the auth identity, never updated by the profile screen
    pub email: String,
    #[serde(default)]
    pub avatar_uri: Option<String>,
    #[serde(default)]
    pub height_cm: Option<f64>,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub allergies: Option<String>,
}

impl UserProfile {
    /// Profile created at sign-up
    pub fn with_defaults(email: impl Into<String>) -> Self {
        Self {
            username: DEFAULT_USERNAME.to_string(),
            email: email.into(),
            avatar_uri: None,
            height_cm: None,
            gender: Gender::default(),
            age: None,
            allergies: None,
        }
    }
}
