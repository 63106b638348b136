//! Health record service
//!
//! Validates records before persistence and annotates every record read
//! back with its classification against the healthy ranges.

use crate::error::ApiError;
use crate::repositories::HealthRecordRepository;
use crate::store::DocumentStore;
use chrono::{DateTime, Utc};
use health_tracker_shared::health_rules::{classify, sort_records, SortKey};
use health_tracker_shared::types::{HealthRecordRequest, HealthRecordResponse};
use health_tracker_shared::validation::validate_health_record;
use health_tracker_shared::HealthRecord;
use tracing::info;

fn with_classification(record: HealthRecord) -> HealthRecordResponse {
    HealthRecordResponse {
        classification: classify(&record),
        record,
    }
}

fn not_found() -> ApiError {
    ApiError::NotFound("Health record not found".to_string())
}

/// Health record service for business logic
pub struct HealthRecordService;

impl HealthRecordService {
    /// List the owner's records sorted by `sort` (default: most recent first)
    ///
    /// An unrecognized sort key leaves the stored order unchanged.
    pub async fn list(
        store: &dyn DocumentStore,
        owner_id: &str,
        sort: Option<&str>,
    ) -> Result<Vec<HealthRecordResponse>, ApiError> {
        let records = HealthRecordRepository::list(store, owner_id).await?;
        let key = sort.unwrap_or(SortKey::default().as_str());

        Ok(sort_records(&records, key)
            .into_iter()
            .map(with_classification)
            .collect())
    }

    pub async fn get(
        store: &dyn DocumentStore,
        owner_id: &str,
        id: &str,
    ) -> Result<HealthRecordResponse, ApiError> {
        HealthRecordRepository::find(store, owner_id, id)
            .await?
            .map(with_classification)
            .ok_or_else(not_found)
    }

    pub async fn create(
        store: &dyn DocumentStore,
        owner_id: &str,
        req: HealthRecordRequest,
        now: DateTime<Utc>,
    ) -> Result<HealthRecordResponse, ApiError> {
        let record = req.into_record(owner_id, now);
        validate_health_record(&record)?;

        let created = HealthRecordRepository::create(store, record).await?;
        info!(owner_id, id = ?created.id, "Health record created");
        Ok(with_classification(created))
    }

    /// Replace a record in place; the date is kept when none is supplied
    pub async fn update(
        store: &dyn DocumentStore,
        owner_id: &str,
        id: &str,
        req: HealthRecordRequest,
    ) -> Result<HealthRecordResponse, ApiError> {
        let existing = HealthRecordRepository::find(store, owner_id, id)
            .await?
            .ok_or_else(not_found)?;

        let record = HealthRecord {
            id: existing.id,
            ..req.into_record(owner_id, existing.date)
        };
        validate_health_record(&record)?;

        HealthRecordRepository::update(store, &record).await?;
        info!(owner_id, id, "Health record updated");
        Ok(with_classification(record))
    }

    pub async fn delete(store: &dyn DocumentStore, owner_id: &str, id: &str) -> Result<(), ApiError> {
        HealthRecordRepository::find(store, owner_id, id)
            .await?
            .ok_or_else(not_found)?;

        HealthRecordRepository::delete(store, id).await?;
        info!(owner_id, id, "Health record deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryDocumentStore;
    use chrono::TimeZone;
    use health_tracker_shared::MetricValue;
    use rstest::rstest;

    fn request(date: Option<DateTime<Utc>>, bp: &str) -> HealthRecordRequest {
        HealthRecordRequest {
            date,
            blood_pressure: bp.into(),
            blood_sugar: "90".into(),
            weight: "70".into(),
            sleep_duration: "8".into(),
            heart_rate: "70".into(),
        }
    }

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_create_classifies() {
        let store = InMemoryDocumentStore::new();
        let created = HealthRecordService::create(&store, "u1", request(None, "130"), day(1))
            .await
            .unwrap();

        assert!(created.record.id.is_some());
        assert_eq!(created.record.date, day(1));
        assert!(!created.classification.is_healthy);
        assert_eq!(created.classification.warnings.len(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_metric() {
        let store = InMemoryDocumentStore::new();
        let mut req = request(None, "110");
        req.sleep_duration = MetricValue::Missing;

        let err = HealthRecordService::create(&store, "u1", req, day(1))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(ref v) if v.field == "sleepDuration"));
        assert!(HealthRecordService::list(&store, "u1", None).await.unwrap().is_empty());
    }

    fn with_metric(field: &str, value: MetricValue) -> HealthRecordRequest {
        let mut req = request(None, "110");
        match field {
            "bloodPressure" => req.blood_pressure = value,
            "bloodSugar" => req.blood_sugar = value,
            "weight" => req.weight = value,
            "sleepDuration" => req.sleep_duration = value,
            "heartRate" => req.heart_rate = value,
            _ => unreachable!(),
        }
        req
    }

    #[rstest]
    #[case::missing_blood_pressure("bloodPressure", MetricValue::Missing)]
    #[case::negative_blood_sugar("bloodSugar", MetricValue::from("-5"))]
    #[case::text_weight("weight", MetricValue::from("abc"))]
    #[case::negative_sleep("sleepDuration", MetricValue::from(-1.0))]
    #[case::blank_heart_rate("heartRate", MetricValue::from("  "))]
    #[tokio::test]
    async fn test_invalid_metric_names_its_field(#[case] field: &str, #[case] value: MetricValue) {
        let store = InMemoryDocumentStore::new();

        let err = HealthRecordService::create(&store, "u1", with_metric(field, value), day(1))
            .await
            .unwrap_err();

        match err {
            ApiError::Validation(v) => {
                assert_eq!(v.field, field);
                assert_eq!(
                    v.message,
                    format!("{} must be a non-negative number.", v.display_label)
                );
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(HealthRecordService::list(&store, "u1", None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_sorts_by_date_by_default() {
        let store = InMemoryDocumentStore::new();
        for d in [1, 3, 2] {
            HealthRecordService::create(&store, "u1", request(Some(day(d)), "110"), day(d))
                .await
                .unwrap();
        }

        let listed = HealthRecordService::list(&store, "u1", None).await.unwrap();
        let dates: Vec<DateTime<Utc>> = listed.iter().map(|r| r.record.date).collect();
        assert_eq!(dates, vec![day(3), day(2), day(1)]);
    }

    #[tokio::test]
    async fn test_update_keeps_id_and_date() {
        let store = InMemoryDocumentStore::new();
        let created = HealthRecordService::create(&store, "u1", request(None, "110"), day(5))
            .await
            .unwrap();
        let id = created.record.id.clone().unwrap();

        let updated = HealthRecordService::update(&store, "u1", &id, request(None, "95"))
            .await
            .unwrap();
        assert_eq!(updated.record.id.as_deref(), Some(id.as_str()));
        assert_eq!(updated.record.date, day(5));

        let fetched = HealthRecordService::get(&store, "u1", &id).await.unwrap();
        assert_eq!(fetched.record.blood_pressure.as_f64(), Some(95.0));
    }

    #[tokio::test]
    async fn test_other_owner_cannot_touch_record() {
        let store = InMemoryDocumentStore::new();
        let created = HealthRecordService::create(&store, "u1", request(None, "110"), day(1))
            .await
            .unwrap();
        let id = created.record.id.unwrap();

        assert!(matches!(
            HealthRecordService::get(&store, "u2", &id).await,
            Err(ApiError::NotFound(_))
        ));
        assert!(matches!(
            HealthRecordService::delete(&store, "u2", &id).await,
            Err(ApiError::NotFound(_))
        ));
        assert!(HealthRecordService::get(&store, "u1", &id).await.is_ok());
    }
}
