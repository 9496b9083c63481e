//! HTTP object store client (storage API with bucket-scoped signing).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, instrument};

use deckshare_core::config::StorageConfig;
use deckshare_core::error::{AppError, ErrorKind};
use deckshare_core::result::AppResult;
use deckshare_core::traits::BlobStore;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignRequest {
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct SignResponse {
    #[serde(rename = "signedURL", alias = "signedUrl")]
    signed_url: String,
}

/// Blob store backed by an HTTP storage API.
#[derive(Debug, Clone)]
pub struct HttpBlobStore {
    client: Client,
    base_url: String,
    bucket: String,
    service_key: String,
}

impl HttpBlobStore {
    /// Create a new client. Every request is bounded by `timeout_ms`.
    pub fn new(config: &StorageConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(concat!("deckshare/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            bucket: config.bucket.clone(),
            service_key: config.service_key.clone(),
        })
    }

    fn sign_endpoint(&self, path: &str) -> String {
        format!(
            "{}/object/sign/{}/{}",
            self.base_url,
            self.bucket,
            path.trim_start_matches('/')
        )
    }

    /// Turn the store's reply (often a path relative to the API root) into
    /// an absolute URL.
    fn absolute(&self, signed: &str) -> String {
        if signed.starts_with("http://") || signed.starts_with("https://") {
            signed.to_string()
        } else {
            format!("{}/{}", self.base_url, signed.trim_start_matches('/'))
        }
    }
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    #[instrument(skip(self), fields(bucket = %self.bucket))]
    async fn create_signed_url(&self, path: &str, ttl: Duration) -> AppResult<String> {
        let response = self
            .client
            .post(self.sign_endpoint(path))
            .bearer_auth(&self.service_key)
            .json(&SignRequest {
                expires_in: ttl.as_secs().max(1),
            })
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::ExternalService, "Blob store request failed", e)
            })?;

        let status = response.status();
        if !status.is_success() {
            error!(%status, "Blob store refused to sign URL");
            return Err(AppError::external_service(format!(
                "Blob store returned {status} while signing URL"
            )));
        }

        let body: SignResponse = response.json().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                "Blob store returned an unreadable signing response",
                e,
            )
        })?;

        Ok(self.absolute(&body.signed_url))
    }

    async fn health_check(&self) -> AppResult<bool> {
        let response = self
            .client
            .get(format!("{}/bucket/{}", self.base_url, self.bucket))
            .bearer_auth(&self.service_key)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::ExternalService, "Blob store unreachable", e)
            })?;
        Ok(response.status().is_success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> HttpBlobStore {
        HttpBlobStore::new(&StorageConfig {
            base_url: "https://files.example.com/storage/v1/".to_string(),
            bucket: "decks".to_string(),
            service_key: "key".to_string(),
            timeout_ms: 3000,
        })
        .unwrap()
    }

    #[test]
    fn test_sign_endpoint() {
        assert_eq!(
            store().sign_endpoint("/user-1/pitch.pdf"),
            "https://files.example.com/storage/v1/object/sign/decks/user-1/pitch.pdf"
        );
    }

    #[test]
    fn test_absolute_url() {
        let s = store();
        assert_eq!(
            s.absolute("/object/sign/decks/a.pdf?token=x"),
            "https://files.example.com/storage/v1/object/sign/decks/a.pdf?token=x"
        );
        assert_eq!(s.absolute("https://cdn.example.com/a"), "https://cdn.example.com/a");
    }

    #[test]
    fn test_sign_response_field_names() {
        let body: SignResponse = serde_json::from_str(r#"{"signedURL":"/x"}"#).unwrap();
        assert_eq!(body.signed_url, "/x");
    }
}
