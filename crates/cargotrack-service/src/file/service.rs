//! Upload, signed download, listing and deletion of relayed files.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use cargotrack_auth::acl::{can_access, list_scope};
use cargotrack_core::config::StorageConfig;
use cargotrack_core::error::AppError;
use cargotrack_core::result::AppResult;
use cargotrack_core::traits::{ObjectStore, SignedUrl};
use cargotrack_database::FileUploadStore;
use cargotrack_entity::file::{FileUpload, NewFileUpload};
use cargotrack_storage::object_key;

use crate::context::RequestContext;
use crate::directory::DirectoryService;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// A file received from the client.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Original filename as sent by the client.
    pub file_name: String,
    /// Declared content type, if any.
    pub content_type: Option<String>,
    /// File contents.
    pub data: Bytes,
    /// Recipient username, or an email for older clients. The
    /// administrator when absent.
    pub recipient: Option<String>,
}

/// Relays files between an uploader and a recipient.
#[derive(Debug, Clone)]
pub struct FileRelayService {
    /// Upload records.
    uploads: Arc<dyn FileUploadStore>,
    /// Blob storage.
    objects: Arc<dyn ObjectStore>,
    /// Recipient resolution.
    directory: Arc<DirectoryService>,
    /// Default recipient.
    admin_email: String,
    /// Maximum accepted payload size in bytes.
    max_upload_size: u64,
    /// Lifetime of issued download links.
    signed_url_ttl: Duration,
}

impl FileRelayService {
    /// Creates a new file relay service.
    pub fn new(
        uploads: Arc<dyn FileUploadStore>,
        objects: Arc<dyn ObjectStore>,
        directory: Arc<DirectoryService>,
        admin_email: String,
        config: &StorageConfig,
    ) -> Self {
        Self {
            uploads,
            objects,
            directory,
            admin_email,
            max_upload_size: config.max_upload_size_bytes,
            signed_url_ttl: Duration::from_secs(config.signed_url_ttl_seconds),
        }
    }

    /// Stores the blob, then records the upload.
    ///
    /// If recording fails the blob is removed again, best-effort.
    pub async fn upload(&self, ctx: &RequestContext, request: UploadRequest) -> AppResult<FileUpload> {
        if request.data.is_empty() {
            return Err(AppError::validation("Uploaded file is empty"));
        }
        let size = request.data.len() as u64;
        if size > self.max_upload_size {
            return Err(AppError::validation(format!(
                "File exceeds maximum upload size of {} bytes",
                self.max_upload_size
            )));
        }

        let (recipient_email, recipient_name) =
            self.resolve_recipient(request.recipient.as_deref()).await?;

        let key = object_key(&ctx.principal.subject, &request.file_name, Utc::now());
        let content_type = request
            .content_type
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

        self.objects
            .put(&key, request.data, &content_type)
            .await?;

        let record = NewFileUpload {
            file_path: key.clone(),
            file_name: request.file_name,
            uploaded_by: ctx.email().to_string(),
            uploaded_by_name: ctx.principal.display_name(),
            recipient_email,
            recipient_name,
            file_size: i64::try_from(size).ok(),
            content_type,
        };

        match self.uploads.insert(record).await {
            Ok(upload) => {
                info!(
                    file_path = %upload.file_path,
                    uploaded_by = %upload.uploaded_by,
                    recipient = %upload.recipient_email,
                    size,
                    "File uploaded"
                );
                Ok(upload)
            }
            Err(e) => {
                if let Err(cleanup) = self.objects.delete(&key).await {
                    warn!(file_path = %key, error = %cleanup, "Failed to remove orphaned blob");
                }
                Err(e)
            }
        }
    }

    /// Issues a signed download link for a stored blob.
    pub async fn download(&self, ctx: &RequestContext, path: &str) -> AppResult<SignedUrl> {
        let path = path.trim();
        if path.is_empty() {
            return Err(AppError::validation("Missing path"));
        }

        let records = self.uploads.find_by_path(path).await?;
        if records.is_empty() {
            return Err(AppError::not_found("File not found"));
        }
        if !records.iter().any(|r| can_access(&ctx.principal, r)) {
            return Err(AppError::authorization("You do not have access to this file"));
        }

        self.objects.signed_url(path, self.signed_url_ttl).await
    }

    /// Lists uploads the caller sent or received, newest first.
    pub async fn list(&self, ctx: &RequestContext) -> AppResult<Vec<FileUpload>> {
        self.uploads.list(&list_scope(&ctx.principal)).await
    }

    /// Deletes an upload. The uploader, the recipient or the administrator
    /// may do so.
    ///
    /// A failed blob delete is logged and ignored; removing the row is what
    /// makes the deletion stick.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        let upload = self
            .uploads
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;

        if !can_access(&ctx.principal, &upload) {
            return Err(AppError::authorization(
                "Only the uploader, the recipient or an administrator can delete this file",
            ));
        }

        if let Err(e) = self.objects.delete(&upload.file_path).await {
            warn!(file_path = %upload.file_path, error = %e, "Blob delete failed; removing record anyway");
        }

        if !self.uploads.delete(upload.id).await? {
            return Err(AppError::not_found("File not found"));
        }
        info!(file_path = %upload.file_path, deleted_by = %ctx.email(), "File deleted");
        Ok(())
    }

    async fn resolve_recipient(&self, recipient: Option<&str>) -> AppResult<(String, String)> {
        match recipient.map(str::trim).filter(|r| !r.is_empty()) {
            None => {
                if self.admin_email.is_empty() {
                    return Err(AppError::validation(
                        "No recipient given and no administrator is configured",
                    ));
                }
                let name = self
                    .directory
                    .find_by_email(&self.admin_email)
                    .await?
                    .map(|p| p.username)
                    .unwrap_or_else(|| "Administrator".to_string());
                Ok((self.admin_email.clone(), name))
            }
            Some(email) if email.contains('@') => {
                let name = self
                    .directory
                    .find_by_email(email)
                    .await?
                    .map(|p| p.username)
                    .unwrap_or_default();
                Ok((email.to_string(), name))
            }
            Some(username) => {
                let profile = self.directory.resolve_username(username, "Recipient").await?;
                Ok((profile.email, profile.username))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cargotrack_core::error::ErrorKind;

    use crate::testing::{self, ADMIN, Harness};

    const CLERK: &str = "clerk@acme.test";

    fn request(recipient: Option<&str>) -> UploadRequest {
        UploadRequest {
            file_name: "Bill of Lading (final).pdf".into(),
            content_type: Some("application/pdf".into()),
            data: Bytes::from_static(b"%PDF-1.7"),
            recipient: recipient.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_upload_defaults_to_admin_and_sanitises_key() {
        let h = Harness::new().await;
        let upload = h.files.upload(&testing::ctx(CLERK), request(None)).await.unwrap();

        assert_eq!(upload.recipient_email, ADMIN);
        assert_eq!(upload.recipient_name, "admin");
        assert_eq!(upload.uploaded_by_name, "clerk");
        assert_eq!(upload.file_size, Some(8));
        assert!(upload.file_path.starts_with("sub-clerk/"));
        assert!(upload.file_path.ends_with("_Bill_of_Lading__final_.pdf"));
        assert!(h.objects.contains(&upload.file_path));
    }

    #[tokio::test]
    async fn test_recipient_username_and_raw_email() {
        let h = Harness::new().await;
        let by_name = h.files.upload(&testing::ctx(CLERK), request(Some("Globex"))).await.unwrap();
        assert_eq!(by_name.recipient_email, "buyer@globex.test");
        assert_eq!(by_name.recipient_name, "globex");

        let mut raw = request(Some("stranger@else.test"));
        raw.file_name = "packing-list.xlsx".into();
        let by_email = h.files.upload(&testing::ctx(CLERK), raw).await.unwrap();
        assert_eq!(by_email.recipient_email, "stranger@else.test");
        assert_eq!(by_email.recipient_name, "");

        let err = h
            .files
            .upload(&testing::ctx(CLERK), request(Some("ghost")))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(h.objects.len(), 2);
    }

    #[tokio::test]
    async fn test_rejects_empty_and_oversized() {
        let h = Harness::new().await;
        let mut empty = request(None);
        empty.data = Bytes::new();
        assert_eq!(
            h.files.upload(&testing::ctx(CLERK), empty).await.unwrap_err().kind,
            ErrorKind::Validation
        );

        let mut big = request(None);
        big.data = Bytes::from(vec![0u8; 1025]);
        assert_eq!(
            h.files.upload(&testing::ctx(CLERK), big).await.unwrap_err().kind,
            ErrorKind::Validation
        );
        assert!(h.objects.is_empty());
    }

    #[tokio::test]
    async fn test_download_requires_a_party() {
        let h = Harness::new().await;
        let upload = h.files.upload(&testing::ctx(CLERK), request(None)).await.unwrap();

        let link = h.files.download(&testing::ctx(ADMIN), &upload.file_path).await.unwrap();
        assert_eq!(link.expires_in, 3600);
        assert!(link.url.contains(&upload.file_path));

        let err = h
            .files
            .download(&testing::ctx("nosy@else.test"), &upload.file_path)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);

        let err = h.files.download(&testing::ctx(CLERK), "nope/key").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        let err = h.files.download(&testing::ctx(CLERK), " ").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_list_is_scoped() {
        let h = Harness::new().await;
        h.files.upload(&testing::ctx(CLERK), request(None)).await.unwrap();
        h.files.upload(&testing::ctx(CLERK), request(Some("globex"))).await.unwrap();

        assert_eq!(h.files.list(&testing::ctx(CLERK)).await.unwrap().len(), 2);
        assert_eq!(h.files.list(&testing::ctx(ADMIN)).await.unwrap().len(), 2);
        assert_eq!(h.files.list(&testing::ctx("buyer@globex.test")).await.unwrap().len(), 1);
        assert!(h.files.list(&testing::ctx("nosy@else.test")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_survives_blob_failure() {
        let h = Harness::new().await;
        let upload = h.files.upload(&testing::ctx(CLERK), request(None)).await.unwrap();

        let err = h
            .files
            .delete(&testing::ctx("nosy@else.test"), upload.id)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);

        h.objects.fail_deletes(true);
        h.files.delete(&testing::ctx(ADMIN), upload.id).await.unwrap();
        assert!(h.files.list(&testing::ctx(CLERK)).await.unwrap().is_empty());
        assert!(h.objects.contains(&upload.file_path));
    }
}
