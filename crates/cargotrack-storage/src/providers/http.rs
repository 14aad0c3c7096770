//! Storage REST API provider (requires the `http` feature).
//!
//! Talks to a Supabase-style `/storage/v1` endpoint: objects are uploaded
//! with `POST /object/{bucket}/{key}`, signed with
//! `POST /object/sign/{bucket}/{key}`, and removed with
//! `DELETE /object/{bucket}` carrying a list of prefixes.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use cargotrack_core::config::HttpStorageConfig;
use cargotrack_core::error::{AppError, ErrorKind};
use cargotrack_core::result::AppResult;
use cargotrack_core::traits::{ObjectStore, SignedUrl};

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

#[derive(Debug, Serialize)]
struct RemoveRequest<'a> {
    prefixes: [&'a str; 1],
}

/// Object store backed by a storage REST API.
#[derive(Debug, Clone)]
pub struct HttpObjectStore {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    bucket: String,
}

impl HttpObjectStore {
    /// Create a new HTTP object store.
    pub fn new(config: &HttpStorageConfig, bucket: &str) -> AppResult<Self> {
        if config.base_url.is_empty() {
            return Err(AppError::configuration(
                "storage.http.base_url is required for the http provider",
            ));
        }
        info!(base_url = %config.base_url, bucket, "Initializing HTTP object store");

        let client = reqwest::Client::builder().build().map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
        })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            bucket: bucket.to_string(),
        })
    }

    fn storage_url(&self, path: &str) -> String {
        format!("{}/storage/v1{}", self.base_url, path)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header("apikey", &self.api_key)
    }

    /// Turn a non-success response into a storage error carrying the body.
    async fn check(response: reqwest::Response, action: &str) -> AppResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(AppError::storage(format!(
            "Storage API {action} failed with {status}: {body}"
        )))
    }
}

fn transport_error(action: &str, e: reqwest::Error) -> AppError {
    AppError::with_source(
        ErrorKind::Storage,
        format!("Storage API {action} request failed: {e}"),
        e,
    )
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    fn provider_type(&self) -> &str {
        "http"
    }

    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> AppResult<()> {
        let url = self.storage_url(&format!("/object/{}/{}", self.bucket, key));
        debug!(%url, size = data.len(), "Uploading blob");

        let response = self
            .authorized(self.client.post(&url))
            .header(CONTENT_TYPE, content_type)
            .header("x-upsert", "true")
            .body(data)
            .send()
            .await
            .map_err(|e| transport_error("upload", e))?;
        Self::check(response, "upload").await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let url = self.storage_url(&format!("/object/{}", self.bucket));
        debug!(%url, key, "Removing blob");

        let response = self
            .authorized(self.client.delete(&url))
            .json(&RemoveRequest { prefixes: [key] })
            .send()
            .await
            .map_err(|e| transport_error("remove", e))?;
        Self::check(response, "remove").await?;
        Ok(())
    }

    async fn signed_url(&self, key: &str, ttl: Duration) -> AppResult<SignedUrl> {
        let url = self.storage_url(&format!("/object/sign/{}/{}", self.bucket, key));
        let expires_in = ttl.as_secs();

        let response = self
            .authorized(self.client.post(&url))
            .json(&SignRequest { expires_in })
            .send()
            .await
            .map_err(|e| transport_error("sign", e))?;
        let signed: SignResponse = Self::check(response, "sign")
            .await?
            .json()
            .await
            .map_err(|e| transport_error("sign", e))?;

        let url = if signed.signed_url.starts_with("http") {
            signed.signed_url
        } else {
            self.storage_url(&signed.signed_url)
        };
        Ok(SignedUrl { url, expires_in })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> HttpObjectStore {
        HttpObjectStore::new(
            &HttpStorageConfig {
                base_url: "https://project.storage.test/".into(),
                api_key: "service-key".into(),
            },
            "uploads",
        )
        .unwrap()
    }

    #[test]
    fn test_storage_url_strips_trailing_slash() {
        assert_eq!(
            store().storage_url("/object/uploads/u1/1_a.pdf"),
            "https://project.storage.test/storage/v1/object/uploads/u1/1_a.pdf"
        );
    }

    #[test]
    fn test_missing_base_url_is_configuration_error() {
        let err = HttpObjectStore::new(&HttpStorageConfig::default(), "uploads").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[test]
    fn test_sign_response_accepts_both_spellings() {
        let a: SignResponse = serde_json::from_str(r#"{"signedURL":"/object/sign/x"}"#).unwrap();
        let b: SignResponse = serde_json::from_str(r#"{"signedUrl":"/object/sign/x"}"#).unwrap();
        assert_eq!(a.signed_url, b.signed_url);
    }
}
