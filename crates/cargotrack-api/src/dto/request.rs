//! Request DTOs.

use serde::{Deserialize, Serialize};

/// Body of `PATCH /orders/{id}/status`.
///
/// Older clients send the field as `logistics_status`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    #[serde(default, alias = "logistics_status")]
    pub status: Option<String>,
}

/// Query of `GET /search-users`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchUsersParams {
    #[serde(default)]
    pub username: String,
}

/// Query of `GET /download`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DownloadParams {
    #[serde(default)]
    pub path: String,
}
