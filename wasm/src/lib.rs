//! Health Tracker WASM Module
//!
//! Browser bindings for the health rules engine and the form validation the
//! UI runs before a write. Structured values cross the boundary as JSON
//! strings in the same camelCase shape the API uses.

use chrono::{DateTime, Utc};
use health_tracker_shared::health_rules;
use health_tracker_shared::search::filter_reminders;
use health_tracker_shared::validation;
use health_tracker_shared::{HealthRecord, MedicineReminder, ValidationError};
use serde::{de::DeserializeOwned, Serialize};
use wasm_bindgen::prelude::*;

fn parse<T: DeserializeOwned>(json: &str) -> Result<T, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid input: {}", e))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| e.to_string())
}

fn timestamp(epoch_ms: f64) -> Result<DateTime<Utc>, String> {
    if !epoch_ms.is_finite() {
        return Err("Invalid timestamp".to_string());
    }
    DateTime::from_timestamp_millis(epoch_ms as i64).ok_or_else(|| "Invalid timestamp".to_string())
}

/// `null` when valid, otherwise the first field error
fn validation_json(result: Result<(), ValidationError>) -> Result<String, String> {
    match result {
        Ok(()) => Ok("null".to_string()),
        Err(e) => to_json(&e),
    }
}

fn classify_record_json(record_json: &str) -> Result<String, String> {
    let record: HealthRecord = parse(record_json)?;
    to_json(&health_rules::classify(&record))
}

fn sort_records_json(records_json: &str, key: &str) -> Result<String, String> {
    let records: Vec<HealthRecord> = parse(records_json)?;
    to_json(&health_rules::sort_records(&records, key))
}

fn reminder_status_json(reminder_json: &str, now_ms: f64) -> Result<String, String> {
    let reminder: MedicineReminder = parse(reminder_json)?;
    let status = health_rules::reminder_status(&reminder, timestamp(now_ms)?);
    to_json(&serde_json::json!({ "status": status, "badge": status.badge() }))
}

fn validate_health_record_json(record_json: &str) -> Result<String, String> {
    let record: HealthRecord = parse(record_json)?;
    validation_json(validation::validate_health_record(&record))
}

fn search_reminders_json(reminders_json: &str, query: &str) -> Result<String, String> {
    let reminders: Vec<MedicineReminder> = parse(reminders_json)?;
    to_json(&filter_reminders(&reminders, query))
}

/// Classify a health record against the healthy ranges
#[wasm_bindgen]
pub fn classify_record(record_json: &str) -> Result<String, JsValue> {
    classify_record_json(record_json).map_err(|e| JsValue::from_str(&e))
}

/// Sort records by `date`, `bloodPressure`, `bloodSugar` or `weight`
#[wasm_bindgen]
pub fn sort_records(records_json: &str, key: &str) -> Result<String, JsValue> {
    sort_records_json(records_json, key).map_err(|e| JsValue::from_str(&e))
}

/// Display status of a reminder at `now_ms` (epoch milliseconds)
#[wasm_bindgen]
pub fn reminder_status(reminder_json: &str, now_ms: f64) -> Result<String, JsValue> {
    reminder_status_json(reminder_json, now_ms).map_err(|e| JsValue::from_str(&e))
}

#[wasm_bindgen]
pub fn validate_health_record(record_json: &str) -> Result<String, JsValue> {
    validate_health_record_json(record_json).map_err(|e| JsValue::from_str(&e))
}

#[wasm_bindgen]
pub fn validate_sign_up(email: &str, password: &str, confirm_password: &str) -> Result<String, JsValue> {
    validation_json(validation::validate_sign_up(email, password, confirm_password))
        .map_err(|e| JsValue::from_str(&e))
}

/// Case-insensitive reminder search over name, notes and condition
#[wasm_bindgen]
pub fn search_reminders(reminders_json: &str, query: &str) -> Result<String, JsValue> {
    search_reminders_json(reminders_json, query).map_err(|e| JsValue::from_str(&e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn value(s: &str) -> Value {
        serde_json::from_str(s).unwrap()
    }

    #[test]
    fn test_classify_record() {
        let record = json!({
            "ownerId": "u",
            "date": "2024-01-01T00:00:00Z",
            "bloodPressure": "118",
            "bloodSugar": "150",
            "weight": "70",
            "sleepDuration": "8",
            "heartRate": "70"
        });

        let result = value(&classify_record_json(&record.to_string()).unwrap());
        assert_eq!(result["isHealthy"], false);
        assert_eq!(result["warnings"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_sort_records_by_weight() {
        let records = json!([
            { "id": "a", "ownerId": "u", "date": "2024-01-01T00:00:00Z", "weight": "60" },
            { "id": "b", "ownerId": "u", "date": "2024-01-02T00:00:00Z", "weight": "80" }
        ]);

        let sorted = value(&sort_records_json(&records.to_string(), "weight").unwrap());
        assert_eq!(sorted[0]["id"], "b");
    }

    #[test]
    fn test_reminder_status() {
        let reminder = json!({
            "ownerId": "u",
            "medicineName": "Aspirin",
            "dosage": "100mg",
            "time": "2024-01-01T08:00:00Z",
            "condition": "Pain"
        });
        let now = DateTime::parse_from_rfc3339("2024-01-01T09:00:00Z")
            .unwrap()
            .timestamp_millis() as f64;

        let result = value(&reminder_status_json(&reminder.to_string(), now).unwrap());
        assert_eq!(result["status"]["isPast"], true);
        assert_eq!(result["badge"]["icon"], "check-circle");
    }

    #[test]
    fn test_validation_results() {
        let record = json!({ "ownerId": "u", "date": "2024-01-01T00:00:00Z", "bloodPressure": "-1" });
        let error = value(&validate_health_record_json(&record.to_string()).unwrap());
        assert_eq!(error["field"], "bloodPressure");
        assert_eq!(error["displayLabel"], "Blood Pressure");

        let ok = validation_json(validation::validate_sign_up("a@b.co", "Passw0rd!", "Passw0rd!")).unwrap();
        assert_eq!(ok, "null");
    }

    #[test]
    fn test_search_reminders() {
        let reminders = json!([
            { "ownerId": "u", "medicineName": "Aspirin", "dosage": "1", "time": "2024-01-01T08:00:00Z", "condition": "Pain" },
            { "ownerId": "u", "medicineName": "Insulin", "dosage": "1", "time": "2024-01-01T08:00:00Z", "condition": "Diabetes" }
        ]);

        let found = value(&search_reminders_json(&reminders.to_string(), "insu").unwrap());
        assert_eq!(found.as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_non_finite_now_is_rejected() {
        let reminder = json!({
            "ownerId": "u",
            "medicineName": "Aspirin",
            "dosage": "100mg",
            "time": "2024-01-01T08:00:00Z",
            "condition": "Pain"
        })
        .to_string();

        for now in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert_eq!(reminder_status_json(&reminder, now).unwrap_err(), "Invalid timestamp");
        }
    }

    #[test]
    fn test_bad_input_is_reported() {
        assert!(classify_record_json("not json").unwrap_err().starts_with("Invalid input"));
    }
}
