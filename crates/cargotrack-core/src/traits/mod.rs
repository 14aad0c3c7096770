//! Core traits defined in `cargotrack-core` and implemented by other crates.

pub mod storage;

pub use storage::{ObjectStore, SignedUrl};
