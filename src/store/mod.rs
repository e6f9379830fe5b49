//! Document and blob store gateways
//!
//! The bot persists structured records in a Firestore-style document store
//! and uploaded files in a Firebase-Storage-style blob store. Both are
//! consumed through small traits so handlers and tests stay independent of
//! the concrete backend (`firestore`/`blob` for production, `memory` for
//! tests and local development).

pub mod blob;
pub mod firestore;
pub mod memory;

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use blob::FirebaseBlobGateway;
pub use firestore::FirestoreGateway;
pub use memory::{MemoryBlobStore, MemoryStore};

/// Field map of one stored document, keyed by field name.
///
/// A `BTreeMap` keeps field order deterministic, which matters for the
/// `updateMask` query string and for test assertions.
pub type Fields = BTreeMap<String, FieldValue>;

/// A single typed field value in the Firestore wire encoding.
///
/// The externally tagged serde representation produces exactly the REST
/// JSON shape, e.g. `{"stringValue": "History"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    #[serde(rename = "stringValue")]
    Str(String),
    #[serde(rename = "timestampValue")]
    Timestamp(DateTime<Utc>),
    #[serde(rename = "arrayValue")]
    Array(ArrayValue),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayValue {
    #[serde(default)]
    pub values: Vec<FieldValue>,
}

impl FieldValue {
    pub fn str(value: impl Into<String>) -> Self {
        Self::Str(value.into())
    }

    pub fn string_array<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Array(ArrayValue {
            values: values.into_iter().map(|v| Self::Str(v.into())).collect(),
        })
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

/// One document as returned from the store: generated id plus fields.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub fields: Fields,
}

/// Errors from the document store gateway
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("store returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("malformed store response: {0}")]
    Decode(String),
}

/// Errors from the blob store gateway
#[derive(Debug, Error)]
pub enum BlobError {
    #[error("blob request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("blob store returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// Equality-filtered document storage.
///
/// The interface mirrors what the conversation flows actually consume:
/// exact-match queries, inserts with generated ids, an upsert-merge for the
/// singleton notice record, and delete/read by id.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns every document in `collection` whose fields exactly equal all
    /// entries of `filter`. An empty filter lists the whole collection.
    async fn query_equal(&self, collection: &str, filter: &Fields) -> Result<Vec<StoredDocument>, StoreError>;

    /// Inserts a new document and returns its generated id.
    async fn insert(&self, collection: &str, fields: Fields) -> Result<String, StoreError>;

    /// Creates or updates the document at a known id, merging `fields` into
    /// whatever is already stored there.
    async fn upsert_merge(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError>;

    /// Deletes a document by id. Deleting an absent document is not an error.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    /// Reads a document by id.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<StoredDocument>, StoreError>;
}

/// Named-key blob storage for uploaded files.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Uploads `bytes` under `key` and returns a publicly fetchable URL.
    async fn upload(&self, key: &str, content_type: &str, bytes: Vec<u8>) -> Result<String, BlobError>;

    /// Deletes the blob under `key`. Idempotent: an absent key succeeds.
    async fn delete(&self, key: &str) -> Result<(), BlobError>;
}

/// Looks up a document by exact field equality, inserting it when absent.
///
/// When more than one document matches, the first one in store order wins;
/// callers must not depend on which one that is. There is no cross-request
/// locking, so concurrent writers can still race and create duplicates —
/// an accepted limitation under the single-admin assumption.
pub async fn find_or_create(
    store: &dyn DocumentStore,
    collection: &str,
    match_fields: Fields,
) -> Result<String, StoreError> {
    let matches = store.query_equal(collection, &match_fields).await?;
    if let Some(doc) = matches.into_iter().next() {
        return Ok(doc.id);
    }
    store.insert(collection, match_fields).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_value_serializes_to_firestore_shape() {
        let v = serde_json::to_value(FieldValue::str("History")).unwrap();
        assert_eq!(v, serde_json::json!({"stringValue": "History"}));

        let arr = serde_json::to_value(FieldValue::string_array(["a", "b"])).unwrap();
        assert_eq!(
            arr,
            serde_json::json!({"arrayValue": {"values": [
                {"stringValue": "a"},
                {"stringValue": "b"}
            ]}})
        );
    }

    #[test]
    fn field_value_roundtrips_through_json() {
        let original = FieldValue::string_array(["Paris", "London"]);
        let json = serde_json::to_string(&original).unwrap();
        let back: FieldValue = serde_json::from_str(&json).unwrap();
        assert_eq!(original, back);
    }

    #[test]
    fn as_str_only_matches_strings() {
        assert_eq!(FieldValue::str("x").as_str(), Some("x"));
        assert_eq!(FieldValue::string_array(["x"]).as_str(), None);
    }
}
