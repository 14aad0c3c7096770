//! Relayed file entities.

pub mod model;

pub use model::{FileUpload, NewFileUpload};
