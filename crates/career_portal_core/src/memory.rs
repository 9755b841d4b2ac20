//! crates/career_portal_core/src/memory.rs
//!
//! An in-process `DocumentGateway`. Collections keep insertion order.
//! Used by tests and by the API service when it runs without a database.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

use crate::domain::{Collection, Document, StoredDocument};
use crate::ports::{DocumentGateway, PortError, PortResult};

#[derive(Default)]
pub struct InMemoryDocumentStore {
    collections: Mutex<HashMap<Collection, Vec<StoredDocument>>>,
    patch_calls: AtomicUsize,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Collection, Vec<StoredDocument>>> {
        self.collections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Inserts or replaces a document.
    pub fn insert(&self, collection: Collection, key: impl Into<String>, fields: Document) {
        let key = key.into();
        let mut collections = self.lock();
        let docs = collections.entry(collection).or_default();
        match docs.iter_mut().find(|d| d.key == key) {
            Some(existing) => existing.fields = fields,
            None => docs.push(StoredDocument { key, fields }),
        }
    }

    pub fn document(&self, collection: Collection, key: &str) -> Option<Document> {
        self.lock()
            .get(&collection)?
            .iter()
            .find(|d| d.key == key)
            .map(|d| d.fields.clone())
    }

    /// Number of `patch_fields` calls served so far.
    pub fn patch_count(&self) -> usize {
        self.patch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentGateway for InMemoryDocumentStore {
    async fn list_all(&self, collection: Collection) -> PortResult<Vec<StoredDocument>> {
        Ok(self.lock().get(&collection).cloned().unwrap_or_default())
    }

    async fn get_one(&self, collection: Collection, key: &str) -> PortResult<Document> {
        self.document(collection, key)
            .ok_or_else(|| PortError::NotFound(format!("{collection}/{key}")))
    }

    async fn patch_fields(
        &self,
        collection: Collection,
        key: &str,
        fields: Document,
    ) -> PortResult<()> {
        self.patch_calls.fetch_add(1, Ordering::SeqCst);
        let mut collections = self.lock();
        let docs = collections.entry(collection).or_default();
        match docs.iter_mut().find(|d| d.key == key) {
            Some(existing) => existing.fields.extend(fields),
            None => docs.push(StoredDocument {
                key: key.to_string(),
                fields,
            }),
        }
        Ok(())
    }

    async fn add_document(&self, collection: Collection, fields: Document) -> PortResult<String> {
        let key = Uuid::new_v4().simple().to_string();
        self.lock()
            .entry(collection)
            .or_default()
            .push(StoredDocument {
                key: key.clone(),
                fields,
            });
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn patch_merges_top_level_fields() {
        let store = InMemoryDocumentStore::new();
        store.insert(Collection::Jobs, "j1", doc(json!({ "title": "A", "salary": 1 })));

        store
            .patch_fields(Collection::Jobs, "j1", doc(json!({ "salary": 2, "Applicant_1": "a@x.com" })))
            .await
            .unwrap();

        assert_eq!(
            store.document(Collection::Jobs, "j1").unwrap(),
            doc(json!({ "title": "A", "salary": 2, "Applicant_1": "a@x.com" }))
        );
        assert_eq!(store.patch_count(), 1);
    }

    #[tokio::test]
    async fn patch_creates_missing_documents() {
        let store = InMemoryDocumentStore::new();
        store
            .patch_fields(Collection::Users, "u1", doc(json!({ "profile": {} })))
            .await
            .unwrap();
        assert!(store.get_one(Collection::Users, "u1").await.is_ok());
    }

    #[tokio::test]
    async fn get_one_reports_missing_keys() {
        let store = InMemoryDocumentStore::new();
        let err = store.get_one(Collection::Jobs, "nope").await.unwrap_err();
        assert!(matches!(err, PortError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_keeps_insertion_order() {
        let store = InMemoryDocumentStore::new();
        store.insert(Collection::Resources, "b", Document::new());
        store.insert(Collection::Resources, "a", Document::new());
        let key = store.add_document(Collection::Resources, Document::new()).await.unwrap();

        let keys: Vec<_> = store
            .list_all(Collection::Resources)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.key)
            .collect();
        assert_eq!(keys, vec!["b".to_string(), "a".to_string(), key]);
    }
}
