//! Object store trait for the external blob storage collaborator.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// A time-limited retrieval link issued by the object store.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SignedUrl {
    /// The capability-bearing URL.
    pub url: String,
    /// Seconds until the URL stops working.
    pub expires_in: u64,
}

/// Trait for external blob storage backends.
///
/// Implementations exist for S3-compatible stores, a storage REST API,
/// and an in-memory store. One instance is constructed at startup and
/// shared through the application state.
#[async_trait]
pub trait ObjectStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "s3", "http", "memory").
    fn provider_type(&self) -> &str;

    /// Write a blob under the given key, replacing any existing object.
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> AppResult<()>;

    /// Delete the blob stored under the given key.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Issue a signed retrieval URL valid for `ttl`.
    async fn signed_url(&self, key: &str, ttl: Duration) -> AppResult<SignedUrl>;
}
