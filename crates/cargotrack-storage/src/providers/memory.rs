//! In-memory object store for tests and local development.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use tracing::debug;

use cargotrack_core::error::AppError;
use cargotrack_core::result::AppResult;
use cargotrack_core::traits::{ObjectStore, SignedUrl};

/// A stored blob.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub data: Bytes,
    pub content_type: String,
}

/// Object store that keeps blobs in a DashMap.
///
/// Signed URLs are deterministic (`memory://{bucket}/{key}?expires_in=N`).
/// Deletes can be made to fail via [`MemoryObjectStore::fail_deletes`].
#[derive(Debug, Clone)]
pub struct MemoryObjectStore {
    bucket: String,
    objects: Arc<DashMap<String, StoredObject>>,
    fail_deletes: Arc<AtomicBool>,
}

impl MemoryObjectStore {
    /// Create an empty store for the given bucket.
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: Arc::new(DashMap::new()),
            fail_deletes: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Make every subsequent delete fail (or succeed again).
    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Whether a blob exists under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.objects.contains_key(key)
    }

    /// Fetch a stored blob.
    pub fn get(&self, key: &str) -> Option<StoredObject> {
        self.objects.get(key).map(|o| o.clone())
    }

    /// Number of stored blobs.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> AppResult<()> {
        debug!(key, size = data.len(), "Storing blob in memory");
        self.objects.insert(
            key.to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(AppError::storage(format!("Delete of '{key}' rejected")));
        }
        self.objects.remove(key);
        Ok(())
    }

    async fn signed_url(&self, key: &str, ttl: Duration) -> AppResult<SignedUrl> {
        if !self.objects.contains_key(key) {
            return Err(AppError::storage(format!("Object '{key}' not found")));
        }
        Ok(SignedUrl {
            url: format!(
                "memory://{}/{}?expires_in={}",
                self.bucket,
                key,
                ttl.as_secs()
            ),
            expires_in: ttl.as_secs(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_sign_delete() {
        let store = MemoryObjectStore::new("uploads");
        store
            .put("u1/1_a.pdf", Bytes::from_static(b"%PDF"), "application/pdf")
            .await
            .unwrap();
        assert!(store.contains("u1/1_a.pdf"));

        let signed = store
            .signed_url("u1/1_a.pdf", Duration::from_secs(3600))
            .await
            .unwrap();
        assert_eq!(signed.url, "memory://uploads/u1/1_a.pdf?expires_in=3600");
        assert_eq!(signed.expires_in, 3600);

        store.delete("u1/1_a.pdf").await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_fail_deletes_switch() {
        let store = MemoryObjectStore::new("uploads");
        store.put("k", Bytes::from_static(b"x"), "text/plain").await.unwrap();

        store.fail_deletes(true);
        assert!(store.delete("k").await.is_err());
        assert!(store.contains("k"));

        store.fail_deletes(false);
        store.delete("k").await.unwrap();
        assert!(!store.contains("k"));
    }
}
