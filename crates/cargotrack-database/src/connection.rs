//! PostgreSQL pool setup and liveness.

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use cargotrack_core::config::DatabaseConfig;
use cargotrack_core::error::{AppError, ErrorKind};
use cargotrack_core::result::AppResult;

/// The pool shared by every repository.
#[derive(Debug, Clone)]
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    /// Validate the URL and open the pool.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        config.validate()?;
        info!(
            url = %config.redacted_url(),
            max_connections = config.max_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
            .connect(&config.url)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Cannot reach {}", config.redacted_url()),
                    e,
                )
            })?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// `SELECT 1`, used by `GET /health`.
pub async fn ping(pool: &PgPool) -> AppResult<bool> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await
        .map(|v| v == 1)
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_non_postgres_url_fails_before_connecting() {
        let err = DatabasePool::connect(&DatabaseConfig {
            url: "sqlite://cargotrack.db".into(),
            max_connections: 1,
            acquire_timeout_seconds: 1,
        })
        .await
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }
}
