//! # cargotrack-core
//!
//! Core crate for CargoTrack. Contains the configuration schemas, the
//! object store trait, and the unified error system.
//!
//! This crate has **no** internal dependencies on other CargoTrack crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
