//! Request context carrying the authenticated principal.

use chrono::{DateTime, Utc};

use cargotrack_auth::Principal;

/// Context for the current authenticated request.
///
/// Built by the API layer from the resolved [`Principal`] and passed into
/// service methods so that every operation knows who is acting.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// The resolved caller.
    pub principal: Principal,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(principal: Principal) -> Self {
        Self {
            principal,
            request_time: Utc::now(),
        }
    }

    /// The caller's email.
    pub fn email(&self) -> &str {
        &self.principal.email
    }

    /// Returns whether the caller is the configured administrator.
    pub fn is_admin(&self) -> bool {
        self.principal.is_admin
    }
}

impl From<Principal> for RequestContext {
    fn from(principal: Principal) -> Self {
        Self::new(principal)
    }
}
