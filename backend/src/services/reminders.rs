//! Medicine reminder service
//!
//! Saving a reminder persists the document first and then schedules a local
//! notification keyed by the reminder id. Deleting removes the document and
//! then cancels the notification. Neither pair is atomic: a scheduler
//! failure after a successful write is reported and the write stands.

use crate::error::ApiError;
use crate::notifications::{Notification, NotificationScheduler};
use crate::repositories::ReminderRepository;
use crate::store::DocumentStore;
use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use health_tracker_shared::health_rules::reminder_status;
use health_tracker_shared::search::filter_reminders;
use health_tracker_shared::types::{ReminderRequest, ReminderResponse};
use health_tracker_shared::validation::{first_validation_error, validate_reminder};
use health_tracker_shared::MedicineReminder;
use tracing::{info, warn};
use validator::Validate;

/// Reminders fire on whole minutes
pub fn truncate_to_minute(time: DateTime<Utc>) -> DateTime<Utc> {
    time.duration_trunc(TimeDelta::minutes(1)).unwrap_or(time)
}

fn with_status(reminder: MedicineReminder, now: DateTime<Utc>) -> ReminderResponse {
    let status = reminder_status(&reminder, now);
    ReminderResponse {
        badge: status.badge(),
        status,
        reminder,
    }
}

fn notification_for(id: &str, reminder: &MedicineReminder) -> Notification {
    Notification {
        id: id.to_string(),
        fire_at: reminder.time,
        title: reminder.notification_title().to_string(),
        body: reminder.notification_body(),
    }
}

fn not_found() -> ApiError {
    ApiError::NotFound("Reminder not found".to_string())
}

/// Validate a request into a reminder ready to persist
fn prepare(req: ReminderRequest, owner_id: &str, now: DateTime<Utc>) -> Result<MedicineReminder, ApiError> {
    req.validate().map_err(|e| first_validation_error(&e))?;

    let mut reminder = req.into_reminder(owner_id);
    reminder.time = truncate_to_minute(reminder.time);
    validate_reminder(&reminder, now)?;
    Ok(reminder)
}

/// Medicine reminder service
pub struct ReminderService;

impl ReminderService {
    /// List reminders matching an optional free-text query, with display status
    pub async fn list(
        store: &dyn DocumentStore,
        owner_id: &str,
        query: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Vec<ReminderResponse>, ApiError> {
        let reminders = ReminderRepository::list(store, owner_id).await?;
        let matching = filter_reminders(&reminders, query.unwrap_or_default());

        Ok(matching.into_iter().map(|r| with_status(r, now)).collect())
    }

    pub async fn get(
        store: &dyn DocumentStore,
        owner_id: &str,
        id: &str,
        now: DateTime<Utc>,
    ) -> Result<ReminderResponse, ApiError> {
        ReminderRepository::find(store, owner_id, id)
            .await?
            .map(|r| with_status(r, now))
            .ok_or_else(not_found)
    }

    pub async fn create(
        store: &dyn DocumentStore,
        scheduler: &dyn NotificationScheduler,
        owner_id: &str,
        req: ReminderRequest,
        now: DateTime<Utc>,
    ) -> Result<ReminderResponse, ApiError> {
        let reminder = prepare(req, owner_id, now)?;
        let created = ReminderRepository::create(store, reminder).await?;
        let id = created.id.clone().unwrap_or_default();

        scheduler
            .schedule(notification_for(&id, &created))
            .await
            .map_err(|e| {
                warn!(owner_id, id = %id, "Reminder saved but notification scheduling failed");
                ApiError::external(e)
            })?;

        info!(owner_id, id = %id, time = %created.time, "Reminder created");
        Ok(with_status(created, now))
    }

    /// Save an edited reminder and reschedule its notification
    pub async fn update(
        store: &dyn DocumentStore,
        scheduler: &dyn NotificationScheduler,
        owner_id: &str,
        id: &str,
        req: ReminderRequest,
        now: DateTime<Utc>,
    ) -> Result<ReminderResponse, ApiError> {
        ReminderRepository::find(store, owner_id, id)
            .await?
            .ok_or_else(not_found)?;

        let reminder = MedicineReminder {
            id: Some(id.to_string()),
            ..prepare(req, owner_id, now)?
        };
        ReminderRepository::update(store, &reminder).await?;

        scheduler
            .schedule(notification_for(id, &reminder))
            .await
            .map_err(|e| {
                warn!(owner_id, id, "Reminder updated but notification scheduling failed");
                ApiError::external(e)
            })?;

        info!(owner_id, id, time = %reminder.time, "Reminder updated");
        Ok(with_status(reminder, now))
    }

    /// Delete the reminder, then cancel its notification
    pub async fn delete(
        store: &dyn DocumentStore,
        scheduler: &dyn NotificationScheduler,
        owner_id: &str,
        id: &str,
    ) -> Result<(), ApiError> {
        ReminderRepository::find(store, owner_id, id)
            .await?
            .ok_or_else(not_found)?;

        ReminderRepository::delete(store, id).await?;
        scheduler.cancel(id).await.map_err(|e| {
            warn!(owner_id, id, "Reminder deleted but notification cancel failed");
            ApiError::external(e)
        })?;

        info!(owner_id, id, "Reminder deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::TokioNotificationScheduler;
    use crate::store::InMemoryDocumentStore;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone, Timelike};
    use health_tracker_shared::validation::FUTURE_TIME_MESSAGE;
    use proptest::prelude::*;

    struct FailingScheduler;

    #[async_trait]
    impl NotificationScheduler for FailingScheduler {
        async fn schedule(&self, _notification: Notification) -> anyhow::Result<()> {
            anyhow::bail!("permission denied")
        }

        async fn cancel(&self, _id: &str) -> anyhow::Result<()> {
            anyhow::bail!("permission denied")
        }

        async fn pending(&self) -> anyhow::Result<Vec<String>> {
            Ok(Vec::new())
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap()
    }

    fn request(time: DateTime<Utc>) -> ReminderRequest {
        ReminderRequest {
            medicine_name: "Metformin".to_string(),
            dosage: "500mg".to_string(),
            time,
            condition: "Diabetes".to_string(),
            notes: Some("With breakfast".to_string()),
        }
    }

    #[test]
    fn test_truncate_to_minute() {
        let t = Utc.with_ymd_and_hms(2025, 1, 1, 8, 30, 59).unwrap();
        let truncated = truncate_to_minute(t);
        assert_eq!(truncated.minute(), 30);
        assert_eq!(truncated.second(), 0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Any time at or before now is rejected once truncated
        #[test]
        fn test_time_not_after_now_is_rejected(
            now_offset_secs in 0i64..3_600,
            before_now_secs in 0i64..172_800
        ) {
            let now = now() + Duration::seconds(now_offset_secs);
            let req = request(now - Duration::seconds(before_now_secs));

            match prepare(req, "u1", now) {
                Err(ApiError::Validation(v)) => prop_assert_eq!(v.message, FUTURE_TIME_MESSAGE),
                other => prop_assert!(false, "expected future-time error, got {:?}", other),
            }
        }

        /// A time in a later minute is accepted and lands on a whole minute
        #[test]
        fn test_time_in_later_minute_is_accepted(
            now_offset_secs in 0i64..3_600,
            after_secs in 60i64..172_800
        ) {
            let now = truncate_to_minute(now() + Duration::seconds(now_offset_secs));
            let reminder = prepare(request(now + Duration::seconds(after_secs)), "u1", now);

            prop_assert!(reminder.is_ok());
            let reminder = reminder.unwrap();
            prop_assert!(reminder.time > now);
            prop_assert_eq!(reminder.time.second(), 0);
        }
    }

    #[tokio::test]
    async fn test_create_schedules_notification() {
        let store = InMemoryDocumentStore::new();
        let scheduler = TokioNotificationScheduler::new();

        let created = ReminderService::create(
            &store,
            &scheduler,
            "u1",
            request(now() + Duration::hours(2)),
            now(),
        )
        .await
        .unwrap();

        let id = created.reminder.id.clone().unwrap();
        assert_eq!(scheduler.pending().await.unwrap(), vec![id]);
        assert!(!created.status.is_past);
        assert_eq!(created.badge.icon, "close-circle");
    }

    #[tokio::test]
    async fn test_time_within_current_minute_is_rejected() {
        let store = InMemoryDocumentStore::new();
        let scheduler = TokioNotificationScheduler::new();

        // Truncation brings 08:00:30 back to 08:00:00, which is not after now
        let err = ReminderService::create(
            &store,
            &scheduler,
            "u1",
            request(now() + Duration::seconds(30)),
            now(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ApiError::Validation(ref v) if v.message == FUTURE_TIME_MESSAGE));
        assert!(scheduler.pending().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_scheduling_failure_keeps_saved_reminder() {
        let store = InMemoryDocumentStore::new();

        let err = ReminderService::create(
            &store,
            &FailingScheduler,
            "u1",
            request(now() + Duration::hours(1)),
            now(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ApiError::External(_)));
        assert_eq!(ReminderService::list(&store, "u1", None, now()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_reschedules() {
        let store = InMemoryDocumentStore::new();
        let scheduler = TokioNotificationScheduler::new();
        let created = ReminderService::create(
            &store,
            &scheduler,
            "u1",
            request(now() + Duration::hours(1)),
            now(),
        )
        .await
        .unwrap();
        let id = created.reminder.id.unwrap();

        let mut edited = request(now() + Duration::hours(3));
        edited.dosage = "850mg".to_string();
        let updated = ReminderService::update(&store, &scheduler, "u1", &id, edited, now())
            .await
            .unwrap();

        assert_eq!(updated.reminder.dosage, "850mg");
        assert_eq!(scheduler.pending().await.unwrap(), vec![id]);
    }

    #[tokio::test]
    async fn test_delete_cancels_notification() {
        let store = InMemoryDocumentStore::new();
        let scheduler = TokioNotificationScheduler::new();
        let created = ReminderService::create(
            &store,
            &scheduler,
            "u1",
            request(now() + Duration::hours(1)),
            now(),
        )
        .await
        .unwrap();
        let id = created.reminder.id.unwrap();

        ReminderService::delete(&store, &scheduler, "u1", &id).await.unwrap();
        assert!(scheduler.pending().await.unwrap().is_empty());
        assert!(matches!(
            ReminderService::get(&store, "u1", &id, now()).await,
            Err(ApiError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_cancel_failure_after_delete_is_external() {
        let store = InMemoryDocumentStore::new();
        let scheduler = TokioNotificationScheduler::new();
        let created = ReminderService::create(
            &store,
            &scheduler,
            "u1",
            request(now() + Duration::hours(1)),
            now(),
        )
        .await
        .unwrap();
        let id = created.reminder.id.unwrap();

        let err = ReminderService::delete(&store, &FailingScheduler, "u1", &id)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::External(_)));
        // Document removal already happened
        assert!(ReminderService::list(&store, "u1", None, now()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_search_and_status() {
        let store = InMemoryDocumentStore::new();
        let scheduler = TokioNotificationScheduler::new();
        ReminderService::create(&store, &scheduler, "u1", request(now() + Duration::hours(1)), now())
            .await
            .unwrap();

        let later = now() + Duration::days(1);
        let listed = ReminderService::list(&store, "u1", Some("diab"), later).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert!(listed[0].status.is_past);
        assert_eq!(listed[0].badge.icon, "check-circle");

        assert!(ReminderService::list(&store, "u1", Some("aspirin"), later)
            .await
            .unwrap()
            .is_empty());
    }
}
