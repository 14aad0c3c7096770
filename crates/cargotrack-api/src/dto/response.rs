//! Response DTOs.

use serde::{Deserialize, Serialize};

use cargotrack_service::RequestContext;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// The caller as seen by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    pub email: String,
    pub username: String,
    pub role: Option<String>,
    pub is_admin: bool,
}

impl From<&RequestContext> for MeResponse {
    fn from(ctx: &RequestContext) -> Self {
        Self {
            email: ctx.principal.email.clone(),
            username: ctx.principal.display_name(),
            role: ctx.principal.role.clone(),
            is_admin: ctx.principal.is_admin,
        }
    }
}

/// A bare count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: i64,
}

/// Rows changed by a bulk update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkedResponse {
    pub marked: u64,
}

/// Simple acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Liveness and database reachability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
    pub storage: String,
}
