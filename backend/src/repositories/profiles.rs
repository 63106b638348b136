//! User profile repository
//!
//! Profiles are keyed by the identity id rather than a generated id.

use crate::store::{from_document, to_document, Document, DocumentStore, StoreError, StoreResult};
use health_tracker_shared::{collections::USERS, UserProfile};

pub struct ProfileRepository;

impl ProfileRepository {
    pub async fn find(store: &dyn DocumentStore, owner_id: &str) -> StoreResult<Option<UserProfile>> {
        match store.get(USERS, owner_id).await? {
            Some(doc) => from_document(doc).map(Some).map_err(StoreError::Backend),
            None => Ok(None),
        }
    }

    /// Write the whole profile at the identity's key
    pub async fn put(store: &dyn DocumentStore, owner_id: &str, profile: &UserProfile) -> StoreResult<()> {
        let fields = to_document(profile).map_err(StoreError::Backend)?;
        store.put(USERS, owner_id, fields).await
    }

    /// Merge the given top-level fields into an existing profile
    pub async fn merge(store: &dyn DocumentStore, owner_id: &str, fields: Document) -> StoreResult<()> {
        store.update(USERS, owner_id, fields).await
    }
}
