//! Recovery record repository

use super::{find_owned, list_owned, require_id};
use crate::store::{to_document, Document, DocumentStore, StoreError, StoreResult};
use health_tracker_shared::{collections::RECOVERY_RECORDS, Photo, RecoveryRecord};

/// Recovery record repository over the `recoveryRecords` collection
pub struct RecoveryRepository;

impl RecoveryRepository {
    pub async fn create(store: &dyn DocumentStore, record: RecoveryRecord) -> StoreResult<RecoveryRecord> {
        let fields = to_document(&record).map_err(StoreError::Backend)?;
        let id = store.create(RECOVERY_RECORDS, fields).await?;
        Ok(RecoveryRecord {
            id: Some(id),
            ..record
        })
    }

    pub async fn list(store: &dyn DocumentStore, owner_id: &str) -> StoreResult<Vec<RecoveryRecord>> {
        list_owned(store, RECOVERY_RECORDS, owner_id).await
    }

    pub async fn find(
        store: &dyn DocumentStore,
        owner_id: &str,
        id: &str,
    ) -> StoreResult<Option<RecoveryRecord>> {
        find_owned(store, RECOVERY_RECORDS, owner_id, id).await
    }

    pub async fn update(store: &dyn DocumentStore, record: &RecoveryRecord) -> StoreResult<()> {
        let id = require_id(&record.id, RECOVERY_RECORDS)?;
        let fields = to_document(record).map_err(StoreError::Backend)?;
        store.update(RECOVERY_RECORDS, id, fields).await
    }

    /// Replace only the photo list of a record
    pub async fn set_photos(store: &dyn DocumentStore, id: &str, photos: &[Photo]) -> StoreResult<()> {
        let mut fields = Document::new();
        fields.insert(
            "photos".to_string(),
            serde_json::to_value(photos).map_err(|e| StoreError::Backend(e.into()))?,
        );
        store.update(RECOVERY_RECORDS, id, fields).await
    }

    pub async fn delete(store: &dyn DocumentStore, id: &str) -> StoreResult<()> {
        store.delete(RECOVERY_RECORDS, id).await
    }
}
