//! User directory: profile sync, username lookup and bulk import.

pub mod import;
pub mod service;

pub use import::{ImportMode, ImportReport};
pub use service::DirectoryService;
