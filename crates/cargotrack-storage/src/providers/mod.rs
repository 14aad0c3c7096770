//! Object store provider implementations.

#[cfg(feature = "http")]
pub mod http;
pub mod memory;
#[cfg(feature = "s3")]
pub mod s3;

#[cfg(feature = "http")]
pub use http::HttpObjectStore;
pub use memory::MemoryObjectStore;
#[cfg(feature = "s3")]
pub use s3::S3ObjectStore;
