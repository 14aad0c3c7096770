//! User profile repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use cargotrack_core::error::{AppError, ErrorKind};
use cargotrack_core::result::AppResult;
use cargotrack_entity::profile::{ProfileData, UserProfile};

use super::{contains_pattern, write_error};
use crate::store::ProfileStore;

/// Repository for the user directory.
#[derive(Debug, Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    /// Create a new profile repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for ProfileRepository {
    async fn find_by_user_id(&self, user_id: &str) -> AppResult<Option<UserProfile>> {
        sqlx::query_as::<_, UserProfile>("SELECT * FROM user_profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find profile", e))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserProfile>> {
        sqlx::query_as::<_, UserProfile>(
            "SELECT * FROM user_profiles WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find profile by email", e)
        })
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<UserProfile>> {
        sqlx::query_as::<_, UserProfile>(
            "SELECT * FROM user_profiles WHERE LOWER(username) = LOWER($1) \
             ORDER BY created_at LIMIT 1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find profile by username", e)
        })
    }

    async fn insert(&self, data: ProfileData) -> AppResult<UserProfile> {
        let conflict = format!("Profile for '{}' already exists", data.email);
        sqlx::query_as::<_, UserProfile>(
            "INSERT INTO user_profiles (user_id, email, username, role, telephone, country, \
             city, address, postcode) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
        )
        .bind(&data.user_id)
        .bind(&data.email)
        .bind(&data.username)
        .bind(&data.role)
        .bind(&data.telephone)
        .bind(&data.country)
        .bind(&data.city)
        .bind(&data.address)
        .bind(&data.postcode)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(e, "Failed to create profile", conflict))
    }

    async fn upsert(&self, data: ProfileData) -> AppResult<UserProfile> {
        let conflict = format!("Email '{}' belongs to another profile", data.email);
        sqlx::query_as::<_, UserProfile>(
            "INSERT INTO user_profiles (user_id, email, username, role, telephone, country, \
             city, address, postcode) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             ON CONFLICT (user_id) DO UPDATE SET email = EXCLUDED.email, \
             username = EXCLUDED.username, role = EXCLUDED.role, \
             telephone = EXCLUDED.telephone, country = EXCLUDED.country, \
             city = EXCLUDED.city, address = EXCLUDED.address, \
             postcode = EXCLUDED.postcode, updated_at = NOW() \
             RETURNING *",
        )
        .bind(&data.user_id)
        .bind(&data.email)
        .bind(&data.username)
        .bind(&data.role)
        .bind(&data.telephone)
        .bind(&data.country)
        .bind(&data.city)
        .bind(&data.address)
        .bind(&data.postcode)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(e, "Failed to upsert profile", conflict))
    }

    async fn search_by_username(
        &self,
        query: &str,
        exclude_email: &str,
        limit: i64,
    ) -> AppResult<Vec<UserProfile>> {
        let pattern = contains_pattern(query);
        sqlx::query_as::<_, UserProfile>(
            "SELECT * FROM user_profiles \
             WHERE username ILIKE $1 ESCAPE '\\' AND LOWER(email) <> LOWER($2) \
             ORDER BY LOWER(username) LIMIT $3",
        )
        .bind(&pattern)
        .bind(exclude_email)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to search profiles", e))
    }

    async fn list_all(&self) -> AppResult<Vec<UserProfile>> {
        sqlx::query_as::<_, UserProfile>("SELECT * FROM user_profiles ORDER BY LOWER(username)")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list profiles", e))
    }
}
