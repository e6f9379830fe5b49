//! Firestore REST gateway
//!
//! Talks to the Firestore v1 REST API with plain `reqwest` calls. Only the
//! small surface the bot needs is implemented: `:runQuery` with equality
//! filters, `createDocument`, `patch` with an update mask (upsert-merge),
//! `delete` and `get`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::core::config;
use super::{DocumentStore, Fields, StoreError, StoredDocument};

const FIRESTORE_HOST: &str = "https://firestore.googleapis.com/v1";

/// Document store backed by the Firestore REST API.
pub struct FirestoreGateway {
    http: reqwest::Client,
    /// `projects/{project}/databases/(default)/documents`
    root: String,
    token: Option<String>,
}

/// Document shape on the REST wire. `name` is the full resource path.
#[derive(Debug, Serialize, Deserialize)]
struct RestDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default)]
    fields: Option<Fields>,
}

/// One row of a `:runQuery` response; rows without a document carry only
/// read metadata and are skipped.
#[derive(Debug, Deserialize)]
struct QueryRow {
    #[serde(default)]
    document: Option<RestDocument>,
}

impl FirestoreGateway {
    /// Builds a gateway from the process configuration.
    pub fn from_config(http: reqwest::Client) -> Self {
        Self::new(
            http,
            config::firebase::PROJECT_ID.as_str(),
            config::firebase::ACCESS_TOKEN.clone(),
        )
    }

    pub fn new(http: reqwest::Client, project_id: &str, token: Option<String>) -> Self {
        Self {
            http,
            root: format!("projects/{}/databases/(default)/documents", project_id),
            token,
        }
    }

    fn url(&self, suffix: &str) -> String {
        format!("{}/{}{}", FIRESTORE_HOST, self.root, suffix)
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Api { status, body })
    }
}

/// Extracts the document id from a full Firestore resource name
/// (`projects/.../documents/subjects/aB3x` -> `aB3x`).
fn doc_id_from_name(name: &str) -> String {
    name.rsplit('/').next().unwrap_or(name).to_string()
}

/// Builds the `:runQuery` request body for an exact-equality lookup.
///
/// All filter fields must match (`AND` composite); an empty filter selects
/// the whole collection.
fn build_query(collection: &str, filter: &Fields) -> serde_json::Value {
    let mut query = json!({
        "from": [{"collectionId": collection}],
    });

    let filters: Vec<serde_json::Value> = filter
        .iter()
        .map(|(field, value)| {
            json!({
                "fieldFilter": {
                    "field": {"fieldPath": field},
                    "op": "EQUAL",
                    "value": value,
                }
            })
        })
        .collect();

    match filters.len() {
        0 => {}
        1 => {
            query["where"] = filters.into_iter().next().unwrap_or_default();
        }
        _ => {
            query["where"] = json!({
                "compositeFilter": {"op": "AND", "filters": filters}
            });
        }
    }

    json!({"structuredQuery": query})
}

#[async_trait]
impl DocumentStore for FirestoreGateway {
    async fn query_equal(&self, collection: &str, filter: &Fields) -> Result<Vec<StoredDocument>, StoreError> {
        let body = build_query(collection, filter);
        let response = self
            .authorize(self.http.post(self.url(":runQuery")))
            .json(&body)
            .send()
            .await?;
        let rows: Vec<QueryRow> = Self::check(response).await?.json().await?;

        let mut documents = Vec::new();
        for row in rows {
            let Some(doc) = row.document else { continue };
            let name = doc
                .name
                .ok_or_else(|| StoreError::Decode("query row document without a name".to_string()))?;
            documents.push(StoredDocument {
                id: doc_id_from_name(&name),
                fields: doc.fields.unwrap_or_default(),
            });
        }
        Ok(documents)
    }

    async fn insert(&self, collection: &str, fields: Fields) -> Result<String, StoreError> {
        let body = RestDocument {
            name: None,
            fields: Some(fields),
        };
        let response = self
            .authorize(self.http.post(self.url(&format!("/{}", collection))))
            .json(&body)
            .send()
            .await?;
        let created: RestDocument = Self::check(response).await?.json().await?;
        let name = created
            .name
            .ok_or_else(|| StoreError::Decode("created document without a name".to_string()))?;
        Ok(doc_id_from_name(&name))
    }

    async fn upsert_merge(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        // The update mask restricts the patch to the supplied fields, which
        // gives Firestore's merge semantics: absent fields stay untouched and
        // a missing document is created.
        let mask: Vec<(&str, &String)> = fields.keys().map(|k| ("updateMask.fieldPaths", k)).collect();
        let body = RestDocument {
            name: None,
            fields: Some(fields.clone()),
        };
        let response = self
            .authorize(self.http.patch(self.url(&format!("/{}/{}", collection, id))))
            .query(&mask)
            .json(&body)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let response = self
            .authorize(self.http.delete(self.url(&format!("/{}/{}", collection, id))))
            .send()
            .await?;
        // Firestore answers 200 for deletes of absent documents already;
        // treat an explicit 404 the same way.
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(());
        }
        Self::check(response).await?;
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<StoredDocument>, StoreError> {
        let response = self
            .authorize(self.http.get(self.url(&format!("/{}/{}", collection, id))))
            .send()
            .await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let doc: RestDocument = Self::check(response).await?.json().await?;
        let name = doc
            .name
            .ok_or_else(|| StoreError::Decode("document without a name".to_string()))?;
        Ok(Some(StoredDocument {
            id: doc_id_from_name(&name),
            fields: doc.fields.unwrap_or_default(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FieldValue;
    use pretty_assertions::assert_eq;

    #[test]
    fn doc_id_is_last_path_segment() {
        assert_eq!(
            doc_id_from_name("projects/p/databases/(default)/documents/subjects/aB3x"),
            "aB3x"
        );
        assert_eq!(doc_id_from_name("bare"), "bare");
    }

    #[test]
    fn query_without_filter_selects_whole_collection() {
        let body = build_query("banners", &Fields::new());
        assert_eq!(
            body,
            serde_json::json!({
                "structuredQuery": {"from": [{"collectionId": "banners"}]}
            })
        );
    }

    #[test]
    fn single_filter_uses_plain_field_filter() {
        let mut filter = Fields::new();
        filter.insert("name".to_string(), FieldValue::str("History"));
        let body = build_query("subjects", &filter);

        assert_eq!(
            body["structuredQuery"]["where"]["fieldFilter"]["op"],
            serde_json::json!("EQUAL")
        );
        assert_eq!(
            body["structuredQuery"]["where"]["fieldFilter"]["value"],
            serde_json::json!({"stringValue": "History"})
        );
    }

    #[test]
    fn multiple_filters_compose_with_and() {
        let mut filter = Fields::new();
        filter.insert("name".to_string(), FieldValue::str("WW2"));
        filter.insert("subjectId".to_string(), FieldValue::str("s1"));
        let body = build_query("topics", &filter);

        let composite = &body["structuredQuery"]["where"]["compositeFilter"];
        assert_eq!(composite["op"], serde_json::json!("AND"));
        assert_eq!(composite["filters"].as_array().map(Vec::len), Some(2));
    }
}
