//! In-memory store backends
//!
//! Used by the test suite and selectable at runtime with
//! `STORE_BACKEND=memory` for local development without a Firebase project.
//! Documents live in insertion order per collection, matching the
//! "store-native ordering" the gateways expose.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{BlobError, BlobStore, DocumentStore, Fields, StoreError, StoredDocument};

#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, Vec<StoredDocument>>>,
    next_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn generate_id(&self) -> String {
        format!("mem-{}", self.next_id.fetch_add(1, Ordering::Relaxed) + 1)
    }

    /// Number of documents currently held in `collection`.
    pub async fn len(&self, collection: &str) -> usize {
        self.collections
            .lock()
            .await
            .get(collection)
            .map(Vec::len)
            .unwrap_or(0)
    }

    pub async fn is_empty(&self, collection: &str) -> bool {
        self.len(collection).await == 0
    }
}

fn matches(doc: &StoredDocument, filter: &Fields) -> bool {
    filter
        .iter()
        .all(|(field, value)| doc.fields.get(field) == Some(value))
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn query_equal(&self, collection: &str, filter: &Fields) -> Result<Vec<StoredDocument>, StoreError> {
        let collections = self.collections.lock().await;
        let docs = collections
            .get(collection)
            .map(|docs| docs.iter().filter(|d| matches(d, filter)).cloned().collect())
            .unwrap_or_default();
        Ok(docs)
    }

    async fn insert(&self, collection: &str, fields: Fields) -> Result<String, StoreError> {
        let id = self.generate_id();
        let mut collections = self.collections.lock().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .push(StoredDocument { id: id.clone(), fields });
        Ok(id)
    }

    async fn upsert_merge(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        let mut collections = self.collections.lock().await;
        let docs = collections.entry(collection.to_string()).or_default();
        match docs.iter_mut().find(|d| d.id == id) {
            Some(doc) => {
                doc.fields.extend(fields);
            }
            None => docs.push(StoredDocument {
                id: id.to_string(),
                fields,
            }),
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let mut collections = self.collections.lock().await;
        if let Some(docs) = collections.get_mut(collection) {
            docs.retain(|d| d.id != id);
        }
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<StoredDocument>, StoreError> {
        let collections = self.collections.lock().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| d.id == id))
            .cloned())
    }
}

#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.blobs.lock().await.contains_key(key)
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn upload(&self, key: &str, _content_type: &str, bytes: Vec<u8>) -> Result<String, BlobError> {
        self.blobs.lock().await.insert(key.to_string(), bytes);
        Ok(format!("memory://{}", key))
    }

    async fn delete(&self, key: &str) -> Result<(), BlobError> {
        self.blobs.lock().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FieldValue;

    fn named(name: &str) -> Fields {
        let mut fields = Fields::new();
        fields.insert("name".to_string(), FieldValue::str(name));
        fields
    }

    #[tokio::test]
    async fn query_matches_all_filter_fields_exactly() {
        let store = MemoryStore::new();
        store.insert("topics", named("WW2")).await.unwrap();
        let mut scoped = named("WW2");
        scoped.insert("subjectId".to_string(), FieldValue::str("s1"));
        store.insert("topics", scoped.clone()).await.unwrap();

        let hits = store.query_equal("topics", &scoped).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].fields, scoped);

        // Case-sensitive: no partial or case-insensitive matching.
        let hits = store.query_equal("topics", &named("ww2")).await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn upsert_merge_creates_then_overwrites_in_place() {
        let store = MemoryStore::new();
        let mut fields = Fields::new();
        fields.insert("notificationText".to_string(), FieldValue::str("v1"));
        store.upsert_merge("config", "main", fields).await.unwrap();

        let mut update = Fields::new();
        update.insert("notificationText".to_string(), FieldValue::str("v2"));
        store.upsert_merge("config", "main", update).await.unwrap();

        assert_eq!(store.len("config").await, 1);
        let doc = store.get("config", "main").await.unwrap().unwrap();
        assert_eq!(doc.fields.get("notificationText"), Some(&FieldValue::str("v2")));
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = MemoryStore::new();
        let id = store.insert("banners", Fields::new()).await.unwrap();
        store.delete("banners", &id).await.unwrap();
        store.delete("banners", &id).await.unwrap();
        assert!(store.is_empty("banners").await);
    }

    #[tokio::test]
    async fn blob_delete_tolerates_absent_keys() {
        let blobs = MemoryBlobStore::new();
        blobs.delete("banners/missing.jpg").await.unwrap();

        let url = blobs.upload("banners/b.jpg", "image/jpeg", vec![1, 2]).await.unwrap();
        assert_eq!(url, "memory://banners/b.jpg");
        blobs.delete("banners/b.jpg").await.unwrap();
        assert!(!blobs.contains("banners/b.jpg").await);
    }
}
