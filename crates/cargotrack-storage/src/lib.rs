//! # cargotrack-storage
//!
//! Object store providers for relayed files: S3-compatible stores, a
//! Supabase-style storage REST API, and an in-memory store. Also owns
//! blob key construction.

pub mod factory;
pub mod key;
pub mod providers;

pub use factory::build_object_store;
pub use key::{object_key, sanitize_filename};
pub use providers::MemoryObjectStore;
