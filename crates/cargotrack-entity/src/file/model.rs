//! Relayed file record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A file sent from one user to another through the relay.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FileUpload {
    /// Unique record identifier.
    pub id: Uuid,
    /// Object store key of the blob.
    pub file_path: String,
    /// Original filename as uploaded.
    pub file_name: String,
    /// Uploader email.
    pub uploaded_by: String,
    /// Uploader display name.
    pub uploaded_by_name: String,
    /// Recipient email.
    pub recipient_email: String,
    /// Recipient display name (may be empty).
    pub recipient_name: String,
    /// Size in bytes.
    pub file_size: Option<i64>,
    /// MIME type reported at upload.
    pub content_type: String,
    /// Upload timestamp.
    pub created_at: DateTime<Utc>,
}

impl FileUpload {
    /// Emails of the uploader and recipient.
    pub fn party_emails(&self) -> [&str; 2] {
        [&self.uploaded_by, &self.recipient_email]
    }
}

/// Data required to record an upload.
#[derive(Debug, Clone)]
pub struct NewFileUpload {
    pub file_path: String,
    pub file_name: String,
    pub uploaded_by: String,
    pub uploaded_by_name: String,
    pub recipient_email: String,
    pub recipient_name: String,
    pub file_size: Option<i64>,
    pub content_type: String,
}

impl NewFileUpload {
    pub fn into_file_upload(self, created_at: DateTime<Utc>) -> FileUpload {
        FileUpload {
            id: Uuid::new_v4(),
            file_path: self.file_path,
            file_name: self.file_name,
            uploaded_by: self.uploaded_by,
            uploaded_by_name: self.uploaded_by_name,
            recipient_email: self.recipient_email,
            recipient_name: self.recipient_name,
            file_size: self.file_size,
            content_type: self.content_type,
            created_at,
        }
    }
}
