//! Identity provider and token verification configuration.

use serde::{Deserialize, Serialize};

/// Settings for resolving bearer credentials into principals.
///
/// Verification stages are attempted in order: JWKS (when `jwks_url` is
/// set), shared secret (when `jwt_secret` is set), then unverified claim
/// decoding (only when `allow_unverified` is true).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// URL of the provider's published JSON Web Key Set.
    #[serde(default)]
    pub jwks_url: Option<String>,
    /// Shared HMAC secret for HS256 verification.
    #[serde(default)]
    pub jwt_secret: Option<String>,
    /// Accept token claims without signature verification. Development only.
    #[serde(default)]
    pub allow_unverified: bool,
    /// Timeout for the JWKS fetch, in seconds.
    #[serde(default = "default_jwks_timeout")]
    pub jwks_timeout_seconds: u64,
    /// The single email address granted admin privileges.
    #[serde(default)]
    pub admin_email: String,
    /// Base URL of the identity provider (used for admin user listing).
    #[serde(default)]
    pub provider_url: String,
    /// Service key for the provider's admin API.
    #[serde(default)]
    pub service_key: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            jwks_url: None,
            jwt_secret: None,
            allow_unverified: false,
            jwks_timeout_seconds: default_jwks_timeout(),
            admin_email: String::new(),
            provider_url: String::new(),
            service_key: String::new(),
        }
    }
}

fn default_jwks_timeout() -> u64 {
    5
}
