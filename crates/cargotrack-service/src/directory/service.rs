//! Local user profiles mirrored from the identity provider.

use std::sync::Arc;

use tracing::{debug, info};

use cargotrack_auth::Principal;
use cargotrack_auth::principal::email_local_part;
use cargotrack_core::config::DirectoryConfig;
use cargotrack_core::error::{AppError, ErrorKind};
use cargotrack_core::result::AppResult;
use cargotrack_database::ProfileStore;
use cargotrack_entity::profile::{ProfileData, UserProfile};

use crate::context::RequestContext;

/// Maintains and queries the profile directory.
#[derive(Debug, Clone)]
pub struct DirectoryService {
    /// Profile store.
    pub(crate) profiles: Arc<dyn ProfileStore>,
    /// Minimum search query length, in characters.
    search_min_length: usize,
    /// Maximum search results.
    search_limit: i64,
}

impl DirectoryService {
    /// Creates a new directory service.
    pub fn new(profiles: Arc<dyn ProfileStore>, config: &DirectoryConfig) -> Self {
        Self {
            profiles,
            search_min_length: config.search_min_length,
            search_limit: config.search_limit,
        }
    }

    /// Upserts the caller's profile from their token metadata.
    ///
    /// Every mutable field is replaced.
    pub async fn sync(&self, ctx: &RequestContext) -> AppResult<UserProfile> {
        let data = profile_from_principal(&ctx.principal);
        let profile = self.profiles.upsert(data).await?;
        info!(user_id = %profile.user_id, username = %profile.username, "Synced profile");
        Ok(profile)
    }

    /// Returns the caller's profile, creating it on first sight.
    ///
    /// An existing profile is never overwritten.
    pub async fn ensure(&self, ctx: &RequestContext) -> AppResult<UserProfile> {
        let principal = &ctx.principal;
        if let Some(existing) = self.profiles.find_by_user_id(&principal.subject).await? {
            return Ok(existing);
        }

        match self.profiles.insert(profile_from_principal(principal)).await {
            Ok(created) => {
                info!(user_id = %created.user_id, "Created profile on first lookup");
                Ok(created)
            }
            Err(e) if e.is(ErrorKind::Conflict) => {
                debug!(user_id = %principal.subject, "Profile created concurrently or email taken");
                if let Some(profile) = self.profiles.find_by_user_id(&principal.subject).await? {
                    return Ok(profile);
                }
                self.profiles
                    .find_by_email(&principal.email)
                    .await?
                    .ok_or(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Case-insensitive username substring search, excluding the caller.
    pub async fn search(&self, ctx: &RequestContext, query: &str) -> AppResult<Vec<UserProfile>> {
        let query = query.trim();
        if query.chars().count() < self.search_min_length {
            return Err(AppError::validation(format!(
                "Search query must be at least {} characters",
                self.search_min_length
            )));
        }
        self.profiles
            .search_by_username(query, ctx.email(), self.search_limit)
            .await
    }

    /// Lists every profile. Administrator only.
    pub async fn list_all(&self, ctx: &RequestContext) -> AppResult<Vec<UserProfile>> {
        if !ctx.is_admin() {
            return Err(AppError::authorization(
                "Only an administrator can list all profiles",
            ));
        }
        self.profiles.list_all().await
    }

    /// Looks up a profile by email, case-insensitively.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<UserProfile>> {
        self.profiles.find_by_email(email).await
    }

    /// Resolves a username to its profile.
    ///
    /// A miss is a validation error naming the username, e.g.
    /// `Shipper 'ghost' not found`.
    pub async fn resolve_username(&self, username: &str, label: &str) -> AppResult<UserProfile> {
        let username = username.trim();
        self.profiles
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::validation(format!("{label} '{username}' not found")))
    }
}

/// Profile fields for a principal.
///
/// The username falls back from `username` to `name` to the email local
/// part; the telephone from `telephone` to `phone`.
pub fn profile_from_principal(principal: &Principal) -> ProfileData {
    let username = principal
        .username
        .clone()
        .or_else(|| principal.meta("name"))
        .unwrap_or_else(|| email_local_part(&principal.email).to_string());

    fill_profile(
        principal.subject.clone(),
        principal.email.clone(),
        username,
        |key| principal.meta(key),
    )
}

pub(crate) fn fill_profile(
    user_id: String,
    email: String,
    username: String,
    field: impl Fn(&str) -> Option<String>,
) -> ProfileData {
    ProfileData {
        user_id,
        email,
        username,
        role: field("role").unwrap_or_default(),
        telephone: field("telephone")
            .or_else(|| field("phone"))
            .unwrap_or_default(),
        country: field("country").unwrap_or_default(),
        city: field("city").unwrap_or_default(),
        address: field("address").unwrap_or_default(),
        postcode: field("postcode").unwrap_or_default(),
    }
}
