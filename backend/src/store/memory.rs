//! In-process document store
//!
//! Backs the `memory` store profile and the integration tests.

use super::{Document, DocumentStore, StoreError, StoreResult, StoredDocument, OWNER_FIELD};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Default)]
struct Collection {
    next_seq: u64,
    docs: HashMap<String, Entry>,
}

#[derive(Debug)]
struct Entry {
    seq: u64,
    fields: Document,
}

impl Collection {
    fn insert(&mut self, id: String, fields: Document) {
        let seq = match self.docs.get(&id) {
            Some(existing) => existing.seq,
            None => {
                self.next_seq += 1;
                self.next_seq
            }
        };
        self.docs.insert(id, Entry { seq, fields });
    }
}

/// Document store held in a `RwLock`ed map of collections
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn create(&self, collection: &str, fields: Document) -> StoreResult<String> {
        let id = Uuid::new_v4().to_string();
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), fields);
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, fields: Document) -> StoreResult<()> {
        let mut collections = self.collections.write().await;
        let entry = collections
            .get_mut(collection)
            .and_then(|c| c.docs.get_mut(id))
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;

        for (key, value) in fields {
            entry.fields.insert(key, value);
        }
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<StoredDocument>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|c| c.docs.get(id))
            .map(|entry| StoredDocument {
                id: id.to_string(),
                fields: entry.fields.clone(),
            }))
    }

    async fn query(&self, collection: &str, owner_id: &str) -> StoreResult<Vec<StoredDocument>> {
        let collections = self.collections.read().await;
        let Some(c) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut owned: Vec<(&String, &Entry)> = c
            .docs
            .iter()
            .filter(|(_, entry)| {
                entry.fields.get(OWNER_FIELD).and_then(Value::as_str) == Some(owner_id)
            })
            .collect();
        owned.sort_by_key(|(_, entry)| entry.seq);

        Ok(owned
            .into_iter()
            .map(|(id, entry)| StoredDocument {
                id: id.clone(),
                fields: entry.fields.clone(),
            })
            .collect())
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        let mut collections = self.collections.write().await;
        if let Some(c) = collections.get_mut(collection) {
            c.docs.remove(id);
        }
        Ok(())
    }

    async fn put(&self, collection: &str, id: &str, fields: Document) -> StoreResult<()> {
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), fields);
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
