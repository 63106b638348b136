//! Input validation functions
//!
//! Form-level checks applied before anything reaches the document store.
//! Custom validators cover the cross-field and parse rules; derive-based
//! `validator` rules on the request types cover field lengths and ranges.

use crate::errors::ValidationError;
use crate::models::{HealthRecord, MedicineReminder, MetricValue, RecoveryRecord};
use chrono::{DateTime, Utc};
use regex_lite::Regex;
use std::sync::OnceLock;

/// Message for empty required reminder fields
pub const REQUIRED_FIELDS_MESSAGE: &str = "Please fill in all required fields";

/// Message for reminder times that are not in the future
pub const FUTURE_TIME_MESSAGE: &str = "Please select a future time for the reminder.";

/// Message for empty required recovery record fields
pub const RECOVERY_REQUIRED_MESSAGE: &str = "Please fill in all required fields.";

pub const PASSWORD_MISMATCH_MESSAGE: &str = "Passwords do not match.";

pub const PASSWORD_RULES_MESSAGE: &str = "Password must be at least 8 characters long, and include at least one uppercase letter, one lowercase letter, one number, and one special character.";

/// Special characters accepted (and one required) in passwords
const PASSWORD_SPECIALS: &str = "@$!%*?&";

// ============================================================================
// Health Records
// ============================================================================

/// Validate a single metric: present, numeric and non-negative
pub fn validate_metric(field: &str, value: &MetricValue) -> Result<f64, ValidationError> {
    let label = get_field_display_label(field);
    value
        .as_f64()
        .filter(|v| *v >= 0.0)
        .ok_or_else(|| ValidationError::new(field, format!("{} must be a non-negative number.", label)))
}

/// Validate every numeric field of a health record, reporting the first failure
pub fn validate_health_record(record: &HealthRecord) -> Result<(), ValidationError> {
    let fields = [
        ("bloodPressure", &record.blood_pressure),
        ("bloodSugar", &record.blood_sugar),
        ("weight", &record.weight),
        ("sleepDuration", &record.sleep_duration),
        ("heartRate", &record.heart_rate),
    ];

    for (field, value) in fields {
        validate_metric(field, value)?;
    }
    Ok(())
}

// ============================================================================
// Medicine Reminders
// ============================================================================

/// Validate a reminder before it is saved
///
/// Required text fields must be non-blank and the time must be strictly
/// after `now`.
pub fn validate_reminder(reminder: &MedicineReminder, now: DateTime<Utc>) -> Result<(), ValidationError> {
    let required = [
        ("medicineName", &reminder.medicine_name),
        ("dosage", &reminder.dosage),
        ("condition", &reminder.condition),
    ];
    if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
        return Err(ValidationError::new(field, REQUIRED_FIELDS_MESSAGE));
    }

    if reminder.time <= now {
        return Err(ValidationError::new("time", FUTURE_TIME_MESSAGE));
    }
    Ok(())
}

// ============================================================================
// Recovery Records
// ============================================================================

pub fn validate_recovery_record(record: &RecoveryRecord) -> Result<(), ValidationError> {
    if record.disease_name.trim().is_empty() {
        return Err(ValidationError::new("diseaseName", RECOVERY_REQUIRED_MESSAGE));
    }
    if record.symptoms.trim().is_empty() {
        return Err(ValidationError::new("symptoms", RECOVERY_REQUIRED_MESSAGE));
    }
    Ok(())
}

// ============================================================================
// Sign-up
// ============================================================================

/// Validate email: non-blank and shaped like an address
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::new("email", "Email cannot be empty."));
    }
    if email.len() > 255 || !email_regex().is_match(email) {
        return Err(ValidationError::new("email", "Invalid email format."));
    }
    Ok(())
}

/// Validate password strength
///
/// At least 8 characters drawn from letters, digits and `@$!%*?&`, with at
/// least one lowercase, one uppercase, one digit and one special character.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    let allowed = password
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || PASSWORD_SPECIALS.contains(c));
    let strong = password.chars().count() >= 8
        && allowed
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(c));

    if strong {
        Ok(())
    } else {
        Err(ValidationError::new("password", PASSWORD_RULES_MESSAGE))
    }
}

/// Validate the whole sign-up form in display order
pub fn validate_sign_up(email: &str, password: &str, confirm_password: &str) -> Result<(), ValidationError> {
    validate_email(email)?;
    validate_password(password)?;
    if password != confirm_password {
        return Err(ValidationError::new("confirmPassword", PASSWORD_MISMATCH_MESSAGE));
    }
    Ok(())
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"))
}

// ============================================================================
// Places
// ============================================================================

pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), ValidationError> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(ValidationError::new("lat", "Latitude must be between -90 and 90."));
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(ValidationError::new("lng", "Longitude must be between -180 and 180."));
    }
    Ok(())
}

// ============================================================================
// Derive-based Validation
// ============================================================================

/// Collapse `validator` derive errors into the first field error
///
/// Fields are visited in name order so the reported error is deterministic.
pub fn first_validation_error(errors: &validator::ValidationErrors) -> ValidationError {
    let mut fields: Vec<(String, String)> = errors
        .field_errors()
        .into_iter()
        .map(|(name, errs)| {
            let name: &str = name.as_ref();
            let message = errs
                .first()
                .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
                .unwrap_or_else(|| "Invalid value.".to_string());
            (to_camel_case(name), message)
        })
        .collect();
    fields.sort();

    match fields.into_iter().next() {
        Some((field, message)) => ValidationError::new(&field, message),
        None => ValidationError::new("request", "Invalid request."),
    }
}

fn to_camel_case(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut upper = false;
    for c in snake.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

// ============================================================================
// User-Friendly Field Labels
// ============================================================================

/// Map wire field names to user-friendly display labels
pub fn get_field_display_label(field_name: &str) -> &str {
    match field_name {
        "bloodPressure" => "Blood Pressure",
        "bloodSugar" => "Blood Sugar",
        "weight" => "Weight",
        "sleepDuration" => "Sleep Duration",
        "heartRate" => "Heart Rate",
        "medicineName" => "Medicine Name",
        "dosage" => "Dosage",
        "time" => "Time",
        "condition" => "Condition",
        "notes" => "Notes",
        "diseaseName" => "Disease Name",
        "symptoms" => "Symptoms",
        "startDate" => "Start Date",
        "username" => "Username",
        "avatarUri" => "Avatar",
        "heightCm" => "Height",
        "gender" => "Gender",
        "age" => "Age",
        "allergies" => "Allergies",
        "email" => "Email",
        "password" => "Password",
        "confirmPassword" => "Confirm Password",
        "lat" => "Latitude",
        "lng" => "Longitude",
        _ => field_name,
    }
}
