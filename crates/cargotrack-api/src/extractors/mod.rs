//! Custom Axum extractors.

pub mod auth;
pub mod json;
pub mod path;

pub use auth::AuthUser;
pub use json::JsonBody;
pub use path::{PathId, parse_uuid};
