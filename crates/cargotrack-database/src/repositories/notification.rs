//! Notification repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use cargotrack_core::error::{AppError, ErrorKind};
use cargotrack_core::result::AppResult;
use cargotrack_entity::notification::{NewNotification, Notification};

use crate::store::{NotificationStore, RecipientExcess};

/// Repository for the notification feed.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Create a new notification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for NotificationRepository {
    async fn insert(&self, notification: NewNotification) -> AppResult<Notification> {
        sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications (user_email, order_id, order_status, message) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(&notification.user_email)
        .bind(&notification.order_id)
        .bind(notification.order_status)
        .bind(&notification.message)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create notification", e))
    }

    async fn list_for(&self, user_email: &str, limit: i64) -> AppResult<Vec<Notification>> {
        sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE user_email = $1 \
             ORDER BY created_at DESC LIMIT $2",
        )
        .bind(user_email)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list notifications", e))
    }

    async fn mark_read(&self, id: Uuid, user_email: &str) -> AppResult<bool> {
        let result =
            sqlx::query("UPDATE notifications SET is_read = TRUE WHERE id = $1 AND user_email = $2")
                .bind(id)
                .bind(user_email)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark read", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn mark_all_read(&self, user_email: &str) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE user_email = $1 AND is_read = FALSE",
        )
        .bind(user_email)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark all read", e))?;
        Ok(result.rows_affected())
    }

    async fn count_unread(&self, user_email: &str) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_email = $1 AND is_read = FALSE",
        )
        .bind(user_email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count unread", e))
    }

    async fn count_for(&self, user_email: &str) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE user_email = $1")
            .bind(user_email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count notifications", e)
            })
    }

    async fn trim_for(&self, user_email: &str, keep: i64) -> AppResult<u64> {
        let result = sqlx::query(
            "DELETE FROM notifications WHERE id IN (\
                SELECT id FROM notifications WHERE user_email = $1 \
                ORDER BY created_at DESC OFFSET $2\
             )",
        )
        .bind(user_email)
        .bind(keep)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to trim notifications", e))?;
        Ok(result.rows_affected())
    }

    async fn excess_by_recipient(&self, keep: i64) -> AppResult<Vec<RecipientExcess>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT user_email, COUNT(*) FROM notifications \
             GROUP BY user_email HAVING COUNT(*) > $1 ORDER BY user_email",
        )
        .bind(keep)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count notifications", e)
        })?;

        Ok(rows
            .into_iter()
            .map(|(user_email, total)| RecipientExcess {
                user_email,
                total,
                excess: total - keep,
            })
            .collect())
    }

    async fn trim_all(&self, keep: i64) -> AppResult<u64> {
        let result = sqlx::query(
            "DELETE FROM notifications WHERE id IN (\
                SELECT id FROM (\
                    SELECT id, ROW_NUMBER() OVER (PARTITION BY user_email ORDER BY created_at DESC) as r_num \
                    FROM notifications\
                ) t WHERE t.r_num > $1\
             )",
        )
        .bind(keep)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to trim notifications", e))?;
        Ok(result.rows_affected())
    }
}
