//! PostgreSQL-backed document store
//!
//! All collections share the `documents` table; fields live in a JSONB
//! column and updates merge with the `||` operator.

use super::{Document, DocumentStore, StoreError, StoreResult, StoredDocument, OWNER_FIELD};
use crate::db;
use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
struct DocumentRow {
    id: String,
    fields: Value,
}

impl DocumentRow {
    fn into_stored(self) -> StoreResult<StoredDocument> {
        match self.fields {
            Value::Object(fields) => Ok(StoredDocument { id: self.id, fields }),
            other => Err(StoreError::Backend(anyhow::anyhow!(
                "document {} holds non-object fields: {}",
                self.id,
                other
            ))),
        }
    }
}

/// Decode listing rows, skipping rows whose fields are not an object
fn stored_documents(collection: &str, rows: Vec<DocumentRow>) -> Vec<StoredDocument> {
    rows.into_iter()
        .filter_map(|row| match row.into_stored() {
            Ok(doc) => Some(doc),
            Err(e) => {
                warn!(collection, error = %e, "Skipping malformed document");
                None
            }
        })
        .collect()
}

fn owner_of(fields: &Document) -> Option<String> {
    fields
        .get(OWNER_FIELD)
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn backend(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.into())
}

/// Document store over a Postgres pool
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn create(&self, collection: &str, fields: Document) -> StoreResult<String> {
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, owner_id, fields)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(collection)
        .bind(&id)
        .bind(owner_of(&fields))
        .bind(Value::Object(fields))
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, fields: Document) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE documents
            SET fields = fields || $3, updated_at = NOW()
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(Value::Object(fields))
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<StoredDocument>> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, fields FROM documents
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        row.map(DocumentRow::into_stored).transpose()
    }

    async fn query(&self, collection: &str, owner_id: &str) -> StoreResult<Vec<StoredDocument>> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, fields FROM documents
            WHERE collection = $1 AND owner_id = $2
            ORDER BY created_at, id
            "#,
        )
        .bind(collection)
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        Ok(stored_documents(collection, rows))
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        Ok(())
    }

    async fn put(&self, collection: &str, id: &str, fields: Document) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, owner_id, fields)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (collection, id)
            DO UPDATE SET fields = EXCLUDED.fields,
                          owner_id = EXCLUDED.owner_id,
                          updated_at = NOW()
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(owner_of(&fields))
        .bind(Value::Object(fields))
        .execute(&self.pool)
        .await
        .map_err(backend)?;
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        db::health_check(&self.pool).await.map_err(StoreError::Backend)
    }
}
