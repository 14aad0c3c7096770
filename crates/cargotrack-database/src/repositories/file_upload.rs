//! File upload repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use cargotrack_core::error::{AppError, ErrorKind};
use cargotrack_core::result::AppResult;
use cargotrack_core::types::Scope;
use cargotrack_entity::file::{FileUpload, NewFileUpload};

use crate::store::FileUploadStore;

/// Repository for relayed file records.
#[derive(Debug, Clone)]
pub struct FileUploadRepository {
    pool: PgPool,
}

impl FileUploadRepository {
    /// Create a new file upload repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileUploadStore for FileUploadRepository {
    async fn insert(&self, upload: NewFileUpload) -> AppResult<FileUpload> {
        sqlx::query_as::<_, FileUpload>(
            "INSERT INTO file_uploads (file_path, file_name, uploaded_by, uploaded_by_name, \
             recipient_email, recipient_name, file_size, content_type) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(&upload.file_path)
        .bind(&upload.file_name)
        .bind(&upload.uploaded_by)
        .bind(&upload.uploaded_by_name)
        .bind(&upload.recipient_email)
        .bind(&upload.recipient_name)
        .bind(upload.file_size)
        .bind(&upload.content_type)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to record upload", e))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<FileUpload>> {
        sqlx::query_as::<_, FileUpload>("SELECT * FROM file_uploads WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find upload", e))
    }

    async fn find_by_path(&self, file_path: &str) -> AppResult<Vec<FileUpload>> {
        sqlx::query_as::<_, FileUpload>(
            "SELECT * FROM file_uploads WHERE file_path = $1 ORDER BY created_at DESC",
        )
        .bind(file_path)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find upload", e))
    }

    async fn list(&self, scope: &Scope) -> AppResult<Vec<FileUpload>> {
        sqlx::query_as::<_, FileUpload>(
            "SELECT * FROM file_uploads \
             WHERE ($1::text IS NULL OR uploaded_by = $1 OR recipient_email = $1) \
             ORDER BY created_at DESC",
        )
        .bind(scope.party())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list uploads", e))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM file_uploads WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete upload", e))?;
        Ok(result.rows_affected() > 0)
    }
}
