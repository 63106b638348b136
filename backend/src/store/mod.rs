//! Document store collaborator
//!
//! Collections of schemaless JSON documents addressed by `(collection, id)`.
//! Repositories layer typed models on top of this contract.
//!
//! # Design Principles
//!
//! 1. **Opaque failures**: backend errors surface as-is; no partial success is assumed
//! 2. **Owner scoping**: `query` filters on the `ownerId` field of each document
//! 3. **Shallow merge**: `update` replaces top-level fields only

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

mod memory;
mod postgres;

pub use memory::InMemoryDocumentStore;
pub use postgres::PgDocumentStore;

/// Top-level fields of a document
pub type Document = Map<String, Value>;

/// Field every owner-scoped document carries
pub const OWNER_FIELD: &str = "ownerId";

/// A document together with its store-assigned id
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub fields: Document,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("document {collection}/{id} not found")]
    NotFound { collection: String, id: String },

    #[error("document store failure: {0}")]
    Backend(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Remote document database contract
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a new document and return its generated id
    async fn create(&self, collection: &str, fields: Document) -> StoreResult<String>;

    /// Merge `fields` into an existing document
    async fn update(&self, collection: &str, id: &str, fields: Document) -> StoreResult<()>;

    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<StoredDocument>>;

    /// All documents of a collection owned by `owner_id`, oldest first
    async fn query(&self, collection: &str, owner_id: &str) -> StoreResult<Vec<StoredDocument>>;

    /// Remove a document; removing an absent document succeeds
    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()>;

    /// Create or replace the document at a known id
    async fn put(&self, collection: &str, id: &str, fields: Document) -> StoreResult<()>;

    /// Cheap connectivity check for readiness probes
    async fn ping(&self) -> StoreResult<()>;
}

/// Serialize a model into top-level document fields, dropping the `id` key
pub fn to_document<T: serde::Serialize>(value: &T) -> anyhow::Result<Document> {
    match serde_json::to_value(value)? {
        Value::Object(mut map) => {
            map.remove("id");
            Ok(map)
        }
        other => anyhow::bail!("expected a JSON object, got {}", other),
    }
}

/// Read a stored document into a model, injecting its id
pub fn from_document<T: serde::de::DeserializeOwned>(doc: StoredDocument) -> anyhow::Result<T> {
    let mut fields = doc.fields;
    fields.insert("id".to_string(), Value::String(doc.id));
    Ok(serde_json::from_value(Value::Object(fields))?)
}
