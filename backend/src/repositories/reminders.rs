//! Medicine reminder repository

use super::{find_owned, list_owned, require_id};
use crate::store::{to_document, DocumentStore, StoreError, StoreResult};
use health_tracker_shared::{collections::MEDICINE, MedicineReminder};

/// Reminder repository over the `medicine` collection
pub struct ReminderRepository;

impl ReminderRepository {
    pub async fn create(
        store: &dyn DocumentStore,
        reminder: MedicineReminder,
    ) -> StoreResult<MedicineReminder> {
        let fields = to_document(&reminder).map_err(StoreError::Backend)?;
        let id = store.create(MEDICINE, fields).await?;
        Ok(MedicineReminder {
            id: Some(id),
            ..reminder
        })
    }

    pub async fn list(store: &dyn DocumentStore, owner_id: &str) -> StoreResult<Vec<MedicineReminder>> {
        list_owned(store, MEDICINE, owner_id).await
    }

    pub async fn find(
        store: &dyn DocumentStore,
        owner_id: &str,
        id: &str,
    ) -> StoreResult<Option<MedicineReminder>> {
        find_owned(store, MEDICINE, owner_id, id).await
    }

    pub async fn update(store: &dyn DocumentStore, reminder: &MedicineReminder) -> StoreResult<()> {
        let id = require_id(&reminder.id, MEDICINE)?;
        let fields = to_document(reminder).map_err(StoreError::Backend)?;
        store.update(MEDICINE, id, fields).await
    }

    pub async fn delete(store: &dyn DocumentStore, id: &str) -> StoreResult<()> {
        store.delete(MEDICINE, id).await
    }
}
