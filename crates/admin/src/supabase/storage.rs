//! Object storage client for product images.
//!
//! Objects are written with
//! `POST {SUPABASE_URL}/storage/v1/object/{bucket}/{path}` and served from
//! `{SUPABASE_URL}/storage/v1/object/public/{bucket}/{path}`.

use std::sync::Arc;

use axum::body::Bytes;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use thiserror::Error;
use url::Url;

use maison_core::upload::ImageKind;

use crate::config::SupabaseConfig;
use crate::services::upload::ObjectStorage;

/// Errors that can occur when writing to storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service refused the write.
    #[error("storage API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to build a request URL or header.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Storage client authenticated with the service role key.
#[derive(Clone)]
pub struct SupabaseStorageClient {
    inner: Arc<StorageClientInner>,
}

struct StorageClientInner {
    client: reqwest::Client,
    base_url: Url,
    bucket: String,
}

impl SupabaseStorageClient {
    /// Create a new storage client for `bucket`.
    ///
    /// # Errors
    ///
    /// Returns error if the key is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &SupabaseConfig, bucket: &str) -> Result<Self, StorageError> {
        let key = config.service_role_key.expose_secret();
        let mut headers = HeaderMap::new();
        headers.insert(
            "apikey",
            HeaderValue::from_str(key)
                .map_err(|e| StorageError::Parse(format!("Invalid API key format: {e}")))?,
        );
        headers.insert(
            "authorization",
            HeaderValue::from_str(&format!("Bearer {key}"))
                .map_err(|e| StorageError::Parse(format!("Invalid API key format: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(60))
            .build()?;

        Ok(Self {
            inner: Arc::new(StorageClientInner {
                client,
                base_url: config.url.clone(),
                bucket: bucket.to_owned(),
            }),
        })
    }

    fn object_url(&self, path: &str) -> Result<Url, StorageError> {
        self.inner
            .base_url
            .join(&format!("storage/v1/object/{}/{path}", self.inner.bucket))
            .map_err(|e| StorageError::Parse(format!("Invalid storage URL: {e}")))
    }
}

impl ObjectStorage for SupabaseStorageClient {
    #[tracing::instrument(skip(self, body), fields(bucket = %self.inner.bucket, bytes = body.len()))]
    async fn put(&self, path: &str, kind: ImageKind, body: Bytes) -> Result<(), StorageError> {
        let response = self
            .inner
            .client
            .post(self.object_url(path)?)
            .header(CONTENT_TYPE, kind.content_type())
            .header("cache-control", "max-age=31536000")
            .header("x-upsert", "false")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let message = response.text().await.unwrap_or_default();
        Err(StorageError::Api {
            status: status.as_u16(),
            message,
        })
    }

    fn public_url(&self, path: &str) -> String {
        let base = self.inner.base_url.as_str().trim_end_matches('/');
        format!(
            "{base}/storage/v1/object/public/{}/{path}",
            self.inner.bucket
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::test_config;

    #[test]
    fn test_urls() {
        let config = test_config();
        let client = SupabaseStorageClient::new(&config.supabase, &config.storage_bucket).unwrap();
        assert_eq!(
            client.object_url("products/1-a1b2c3d4.jpg").unwrap().as_str(),
            "http://127.0.0.1:9/storage/v1/object/product-images/products/1-a1b2c3d4.jpg"
        );
        assert_eq!(
            client.public_url("products/1-a1b2c3d4.jpg"),
            "http://127.0.0.1:9/storage/v1/object/public/product-images/products/1-a1b2c3d4.jpg"
        );
    }
}
