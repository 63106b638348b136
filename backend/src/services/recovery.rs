//! Recovery record service
//!
//! Recovery records carry photo evidence kept in object storage. The photo
//! list on the document is the source of truth for what the user sees, so
//! blobs are uploaded before they are referenced and deleted before they
//! are unreferenced.

use crate::error::ApiError;
use crate::repositories::RecoveryRepository;
use crate::storage::ObjectStorage;
use crate::store::DocumentStore;
use chrono::{DateTime, Utc};
use health_tracker_shared::types::{RecoveryRecordRequest, RecoverySummary};
use health_tracker_shared::validation::{first_validation_error, validate_recovery_record};
use health_tracker_shared::{photo_storage_path, Photo, RecoveryRecord, RECOVERY_PREVIEW_PHOTOS};
use tracing::{info, warn};
use validator::Validate;

fn not_found() -> ApiError {
    ApiError::NotFound("Recovery record not found".to_string())
}

async fn find_owned(
    store: &dyn DocumentStore,
    owner_id: &str,
    id: &str,
) -> Result<RecoveryRecord, ApiError> {
    RecoveryRepository::find(store, owner_id, id)
        .await?
        .ok_or_else(not_found)
}

fn prepare(
    req: RecoveryRecordRequest,
    owner_id: &str,
    now: DateTime<Utc>,
) -> Result<RecoveryRecord, ApiError> {
    req.validate().map_err(|e| first_validation_error(&e))?;

    let record = req.into_record(owner_id, now);
    validate_recovery_record(&record)?;
    Ok(record)
}

/// Recovery record service
pub struct RecoveryService;

impl RecoveryService {
    /// List cards with a short photo preview, oldest first
    pub async fn list(
        store: &dyn DocumentStore,
        owner_id: &str,
    ) -> Result<Vec<RecoverySummary>, ApiError> {
        let records = RecoveryRepository::list(store, owner_id).await?;

        Ok(records
            .iter()
            .filter_map(|r| {
                r.id.clone()
                    .map(|id| RecoverySummary::from_record(id, r, RECOVERY_PREVIEW_PHOTOS))
            })
            .collect())
    }

    pub async fn get(
        store: &dyn DocumentStore,
        owner_id: &str,
        id: &str,
    ) -> Result<RecoveryRecord, ApiError> {
        find_owned(store, owner_id, id).await
    }

    pub async fn create(
        store: &dyn DocumentStore,
        owner_id: &str,
        req: RecoveryRecordRequest,
        now: DateTime<Utc>,
    ) -> Result<RecoveryRecord, ApiError> {
        let record = prepare(req, owner_id, now)?;
        let created = RecoveryRepository::create(store, record).await?;

        info!(owner_id, id = ?created.id, "Recovery record created");
        Ok(created)
    }

    /// Edit the text fields; photos and (when omitted) the start date are kept
    pub async fn update(
        store: &dyn DocumentStore,
        owner_id: &str,
        id: &str,
        req: RecoveryRecordRequest,
    ) -> Result<RecoveryRecord, ApiError> {
        let existing = find_owned(store, owner_id, id).await?;

        let record = RecoveryRecord {
            id: existing.id,
            photos: existing.photos,
            ..prepare(req, owner_id, existing.start_date)?
        };
        RecoveryRepository::update(store, &record).await?;

        info!(owner_id, id, "Recovery record updated");
        Ok(record)
    }

    /// Upload an image and append it to the record's photo list
    pub async fn add_photo(
        store: &dyn DocumentStore,
        storage: &dyn ObjectStorage,
        owner_id: &str,
        id: &str,
        bytes: Vec<u8>,
    ) -> Result<RecoveryRecord, ApiError> {
        if bytes.is_empty() {
            return Err(ApiError::BadRequest("Photo body is empty".to_string()));
        }

        let mut record = find_owned(store, owner_id, id).await?;
        let storage_path = photo_storage_path(owner_id);
        let download_url = storage
            .upload(&storage_path, bytes)
            .await
            .map_err(ApiError::external)?;

        record.photos.push(Photo {
            download_url,
            storage_path: storage_path.clone(),
        });

        if let Err(e) = RecoveryRepository::set_photos(store, id, &record.photos).await {
            // The blob is unreferenced now
            if let Err(cleanup) = storage.delete(&storage_path).await {
                warn!(storage_path = %storage_path, error = %cleanup, "Failed to remove orphaned photo");
            }
            return Err(e.into());
        }

        info!(owner_id, id, storage_path = %storage_path, "Photo added to recovery record");
        Ok(record)
    }

    /// Delete a photo blob, then drop it from the record
    ///
    /// If the blob cannot be deleted the photo list is left untouched.
    pub async fn remove_photo(
        store: &dyn DocumentStore,
        storage: &dyn ObjectStorage,
        owner_id: &str,
        id: &str,
        storage_path: &str,
    ) -> Result<RecoveryRecord, ApiError> {
        let mut record = find_owned(store, owner_id, id).await?;
        if record.find_photo(storage_path).is_none() {
            return Err(ApiError::NotFound("Photo not found".to_string()));
        }

        storage
            .delete(storage_path)
            .await
            .map_err(ApiError::external)?;

        record.remove_photo(storage_path);
        RecoveryRepository::set_photos(store, id, &record.photos).await?;

        info!(owner_id, id, storage_path, "Photo removed from recovery record");
        Ok(record)
    }

    /// Delete the record, then its blobs on a best-effort basis
    pub async fn delete(
        store: &dyn DocumentStore,
        storage: &dyn ObjectStorage,
        owner_id: &str,
        id: &str,
    ) -> Result<(), ApiError> {
        let record = find_owned(store, owner_id, id).await?;
        RecoveryRepository::delete(store, id).await?;

        for photo in &record.photos {
            if let Err(e) = storage.delete(&photo.storage_path).await {
                warn!(storage_path = %photo.storage_path, error = %e, "Failed to delete recovery photo");
            }
        }

        info!(owner_id, id, photos = record.photos.len(), "Recovery record deleted");
        Ok(())
    }
}
