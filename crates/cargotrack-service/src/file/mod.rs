//! File relay between users through the object store.

pub mod service;

pub use service::{FileRelayService, UploadRequest};
