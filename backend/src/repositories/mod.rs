//! Document repositories
//!
//! Typed access to the document store collections. Documents are validated
//! into the shared models on read; documents that no longer match their
//! model are skipped from listings with a warning.

pub mod health_records;
pub mod profiles;
pub mod recovery;
pub mod reminders;

pub use health_records::HealthRecordRepository;
pub use profiles::ProfileRepository;
pub use recovery::RecoveryRepository;
pub use reminders::ReminderRepository;

use crate::store::{from_document, DocumentStore, StoreError, StoreResult, StoredDocument, OWNER_FIELD};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

fn is_owned_by(doc: &StoredDocument, owner_id: &str) -> bool {
    doc.fields.get(OWNER_FIELD).and_then(Value::as_str) == Some(owner_id)
}

/// Decode every document of `owner_id` in `collection`, skipping corrupt ones
pub(crate) async fn list_owned<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
    owner_id: &str,
) -> StoreResult<Vec<T>> {
    let docs = store.query(collection, owner_id).await?;
    let mut items = Vec::with_capacity(docs.len());

    for doc in docs {
        let id = doc.id.clone();
        match from_document::<T>(doc) {
            Ok(item) => items.push(item),
            Err(e) => warn!(collection, id = %id, error = %e, "Skipping malformed document"),
        }
    }
    Ok(items)
}

/// Fetch one document, treating documents of other owners as absent
pub(crate) async fn find_owned<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
    owner_id: &str,
    id: &str,
) -> StoreResult<Option<T>> {
    match store.get(collection, id).await? {
        Some(doc) if is_owned_by(&doc, owner_id) => from_document(doc).map(Some).map_err(StoreError::Backend),
        _ => Ok(None),
    }
}

/// Id of a model that has been read from the store
pub(crate) fn require_id<'a>(id: &'a Option<String>, collection: &str) -> StoreResult<&'a str> {
    id.as_deref().ok_or_else(|| {
        StoreError::Backend(anyhow::anyhow!("{} document is missing its id", collection))
    })
}
