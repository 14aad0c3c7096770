//! Object storage configuration.

use serde::{Deserialize, Serialize};

/// Top-level storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Which provider to construct: `"s3"`, `"http"`, or `"memory"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Bucket that holds uploaded blobs.
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// Maximum upload size in bytes (default 50 MB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
    /// Lifetime of signed download URLs, in seconds.
    #[serde(default = "default_signed_url_ttl")]
    pub signed_url_ttl_seconds: u64,
    /// S3-compatible object storage configuration.
    #[serde(default)]
    pub s3: S3StorageConfig,
    /// HTTP storage API configuration.
    #[serde(default)]
    pub http: HttpStorageConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            bucket: default_bucket(),
            max_upload_size_bytes: default_max_upload(),
            signed_url_ttl_seconds: default_signed_url_ttl(),
            s3: S3StorageConfig::default(),
            http: HttpStorageConfig::default(),
        }
    }
}

/// S3-compatible object storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3StorageConfig {
    /// S3 endpoint URL (for non-AWS services like MinIO).
    #[serde(default)]
    pub endpoint: String,
    /// AWS region.
    #[serde(default = "default_region")]
    pub region: String,
    /// Access key ID.
    #[serde(default)]
    pub access_key: String,
    /// Secret access key.
    #[serde(default)]
    pub secret_key: String,
    /// Use path-style addressing (required by most self-hosted stores).
    #[serde(default)]
    pub force_path_style: bool,
}

impl Default for S3StorageConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            region: default_region(),
            access_key: String::new(),
            secret_key: String::new(),
            force_path_style: false,
        }
    }
}

/// Storage REST API configuration (Supabase-style `/storage/v1`).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HttpStorageConfig {
    /// Base URL of the storage service.
    #[serde(default)]
    pub base_url: String,
    /// API key sent as bearer token and `apikey` header.
    #[serde(default)]
    pub api_key: String,
}

fn default_provider() -> String {
    "memory".to_string()
}

fn default_bucket() -> String {
    "uploads".to_string()
}

fn default_max_upload() -> u64 {
    52_428_800 // 50 MB
}

fn default_signed_url_ttl() -> u64 {
    3600
}

fn default_region() -> String {
    "us-east-1".to_string()
}
