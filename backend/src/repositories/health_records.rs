//! Health record repository

use super::{find_owned, list_owned, require_id};
use crate::store::{to_document, DocumentStore, StoreError, StoreResult};
use health_tracker_shared::{collections::HEALTH_RECORDS, HealthRecord};

/// Health record repository over the `healthRecords` collection
pub struct HealthRecordRepository;

impl HealthRecordRepository {
    /// Persist a new record and return it with its assigned id
    pub async fn create(store: &dyn DocumentStore, record: HealthRecord) -> StoreResult<HealthRecord> {
        let fields = to_document(&record).map_err(StoreError::Backend)?;
        let id = store.create(HEALTH_RECORDS, fields).await?;
        Ok(HealthRecord {
            id: Some(id),
            ..record
        })
    }

    pub async fn list(store: &dyn DocumentStore, owner_id: &str) -> StoreResult<Vec<HealthRecord>> {
        list_owned(store, HEALTH_RECORDS, owner_id).await
    }

    pub async fn find(
        store: &dyn DocumentStore,
        owner_id: &str,
        id: &str,
    ) -> StoreResult<Option<HealthRecord>> {
        find_owned(store, HEALTH_RECORDS, owner_id, id).await
    }

    /// Overwrite every field of an existing record in place
    pub async fn update(store: &dyn DocumentStore, record: &HealthRecord) -> StoreResult<()> {
        let id = require_id(&record.id, HEALTH_RECORDS)?;
        let fields = to_document(record).map_err(StoreError::Backend)?;
        store.update(HEALTH_RECORDS, id, fields).await
    }

    pub async fn delete(store: &dyn DocumentStore, id: &str) -> StoreResult<()> {
        store.delete(HEALTH_RECORDS, id).await
    }
}
