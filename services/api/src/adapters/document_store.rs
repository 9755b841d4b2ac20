//! services/api/src/adapters/document_store.rs
//!
//! This module contains the document store adapter, which is the concrete
//! implementation of the `DocumentGateway` port from the `core` crate. Documents
//! live in one PostgreSQL table as JSONB, keyed by `(collection, key)`.

use async_trait::async_trait;
use career_portal_core::domain::{Collection, Document, StoredDocument};
use career_portal_core::ports::{DocumentGateway, PortError, PortResult};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::debug;
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A document store adapter that implements the `DocumentGateway` port.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    /// Creates a new `PgDocumentStore`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct DocumentRecord {
    key: String,
    fields: Json<Document>,
}
impl DocumentRecord {
    fn to_domain(self) -> StoredDocument {
        StoredDocument {
            key: self.key,
            fields: self.fields.0,
        }
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

//=========================================================================================
// `DocumentGateway` Trait Implementation
//=========================================================================================

#[async_trait]
impl DocumentGateway for PgDocumentStore {
    async fn list_all(&self, collection: Collection) -> PortResult<Vec<StoredDocument>> {
        let records = sqlx::query_as::<_, DocumentRecord>(
            "SELECT key, fields FROM documents WHERE collection = $1 ORDER BY created_at ASC, key ASC",
        )
        .bind(collection.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        debug!(%collection, count = records.len(), "listed documents");
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn get_one(&self, collection: Collection, key: &str) -> PortResult<Document> {
        let record = sqlx::query_as::<_, DocumentRecord>(
            "SELECT key, fields FROM documents WHERE collection = $1 AND key = $2",
        )
        .bind(collection.as_str())
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| PortError::NotFound(format!("{collection}/{key}")))?;

        Ok(record.to_domain().fields)
    }

    async fn patch_fields(
        &self,
        collection: Collection,
        key: &str,
        fields: Document,
    ) -> PortResult<()> {
        // `||` on JSONB replaces the named top-level keys and keeps the rest.
        sqlx::query(
            "INSERT INTO documents (collection, key, fields) VALUES ($1, $2, $3)
             ON CONFLICT (collection, key)
             DO UPDATE SET fields = documents.fields || EXCLUDED.fields, updated_at = now()",
        )
        .bind(collection.as_str())
        .bind(key)
        .bind(Json(fields))
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(())
    }

    async fn add_document(&self, collection: Collection, fields: Document) -> PortResult<String> {
        let key = Uuid::new_v4().simple().to_string();
        sqlx::query("INSERT INTO documents (collection, key, fields) VALUES ($1, $2, $3)")
            .bind(collection.as_str())
            .bind(&key)
            .bind(Json(fields))
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(key)
    }
}
