//! Identity provider token claims.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The subset of provider claims CargoTrack reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the provider user id.
    pub sub: String,
    /// Top-level email claim.
    #[serde(default)]
    pub email: Option<String>,
    /// Free-form profile metadata.
    #[serde(default)]
    pub user_metadata: Option<Map<String, Value>>,
    /// Expiration timestamp (seconds since epoch).
    #[serde(default)]
    pub exp: Option<i64>,
}
