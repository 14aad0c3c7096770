//! Construct the configured object store.

use std::sync::Arc;

use tracing::info;

use cargotrack_core::config::StorageConfig;
use cargotrack_core::error::AppError;
use cargotrack_core::result::AppResult;
use cargotrack_core::traits::ObjectStore;

use crate::providers::MemoryObjectStore;

/// Build the object store selected by `storage.provider`.
pub async fn build_object_store(config: &StorageConfig) -> AppResult<Arc<dyn ObjectStore>> {
    let store: Arc<dyn ObjectStore> = match config.provider.as_str() {
        "memory" => Arc::new(MemoryObjectStore::new(&config.bucket)),
        #[cfg(feature = "s3")]
        "s3" => Arc::new(crate::providers::S3ObjectStore::new(&config.s3, &config.bucket).await?),
        #[cfg(feature = "http")]
        "http" => Arc::new(crate::providers::HttpObjectStore::new(
            &config.http,
            &config.bucket,
        )?),
        other => {
            return Err(AppError::configuration(format!(
                "Unsupported storage provider '{other}'"
            )));
        }
    };
    info!(provider = store.provider_type(), bucket = %config.bucket, "Object store ready");
    Ok(store)
}
