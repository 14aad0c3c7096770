//! The authenticated caller.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use cargotrack_core::error::AppError;

use crate::identity::claims::TokenClaims;

/// Identity derived from a verified (or, in development, decoded) token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    /// Identity provider user id (`sub`).
    pub subject: String,
    /// Email address. Always present.
    pub email: String,
    /// `user_metadata.username`, if set.
    pub username: Option<String>,
    /// `user_metadata.role`, if set.
    pub role: Option<String>,
    /// Whether the email matches the configured admin email exactly.
    pub is_admin: bool,
    /// Raw `user_metadata` object.
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl Principal {
    /// Build a principal from token claims.
    ///
    /// The email comes from `email` or, failing that, `user_metadata.email`.
    /// A token without an email is rejected.
    pub fn from_claims(claims: TokenClaims, admin_email: &str) -> Result<Self, AppError> {
        let metadata = claims.user_metadata.unwrap_or_default();
        let email = claims
            .email
            .filter(|e| !e.is_empty())
            .or_else(|| string_field(&metadata, "email"))
            .ok_or_else(|| AppError::authentication("Token does not carry an email"))?;

        let is_admin = !admin_email.is_empty() && email == admin_email;
        Ok(Self {
            subject: claims.sub,
            username: string_field(&metadata, "username"),
            role: string_field(&metadata, "role"),
            is_admin,
            email,
            metadata,
        })
    }

    /// A non-empty string field of `user_metadata`.
    pub fn meta(&self, key: &str) -> Option<String> {
        string_field(&self.metadata, key)
    }

    /// Username, falling back to the email local part.
    pub fn display_name(&self) -> String {
        self.username
            .clone()
            .unwrap_or_else(|| email_local_part(&self.email).to_string())
    }
}

/// The part of an email before `@`.
pub fn email_local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

fn string_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
