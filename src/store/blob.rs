//! Firebase Storage REST gateway for uploaded files

use async_trait::async_trait;

use crate::core::config;
use super::{BlobError, BlobStore};

const STORAGE_HOST: &str = "https://firebasestorage.googleapis.com/v0";

/// Blob store backed by the Firebase Storage REST API.
///
/// Uploaded objects are expected to be publicly readable (bucket rules are a
/// deployment concern); the returned URL is the canonical
/// `storage.googleapis.com` form the content apps fetch from.
pub struct FirebaseBlobGateway {
    http: reqwest::Client,
    bucket: String,
    token: Option<String>,
}

impl FirebaseBlobGateway {
    /// Builds a gateway from the process configuration.
    pub fn from_config(http: reqwest::Client) -> Self {
        Self::new(
            http,
            config::firebase::STORAGE_BUCKET.clone(),
            config::firebase::ACCESS_TOKEN.clone(),
        )
    }

    pub fn new(http: reqwest::Client, bucket: String, token: Option<String>) -> Self {
        Self { http, bucket, token }
    }

    fn object_url(&self, key: &str) -> String {
        format!(
            "{}/b/{}/o/{}",
            STORAGE_HOST,
            self.bucket,
            urlencoding::encode(key)
        )
    }

    fn public_url(&self, key: &str) -> String {
        format!("https://storage.googleapis.com/{}/{}", self.bucket, key)
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

#[async_trait]
impl BlobStore for FirebaseBlobGateway {
    async fn upload(&self, key: &str, content_type: &str, bytes: Vec<u8>) -> Result<String, BlobError> {
        let url = format!(
            "{}/b/{}/o?name={}",
            STORAGE_HOST,
            self.bucket,
            urlencoding::encode(key)
        );
        let response = self
            .authorize(self.http.post(url))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BlobError::Api { status, body });
        }
        Ok(self.public_url(key))
    }

    async fn delete(&self, key: &str) -> Result<(), BlobError> {
        let response = self.authorize(self.http.delete(self.object_url(key))).send().await?;

        let status = response.status();
        // Absent blobs are fine: the index record must still be deletable
        // after a partial earlier cleanup.
        if status == reqwest::StatusCode::NOT_FOUND || status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(BlobError::Api { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> FirebaseBlobGateway {
        FirebaseBlobGateway::new(reqwest::Client::new(), "demo.appspot.com".to_string(), None)
    }

    #[test]
    fn object_url_encodes_the_key() {
        let url = gateway().object_url("banners/banner_1.jpg");
        assert!(url.ends_with("/o/banners%2Fbanner_1.jpg"));
    }

    #[test]
    fn public_url_keeps_the_key_readable() {
        let url = gateway().public_url("notes/note_1.pdf");
        assert_eq!(url, "https://storage.googleapis.com/demo.appspot.com/notes/note_1.pdf");
    }
}
