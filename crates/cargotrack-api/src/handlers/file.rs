//! File relay handlers.

use axum::Json;
use axum::extract::{Multipart, Query, State};
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;

use cargotrack_core::error::AppError;
use cargotrack_core::traits::SignedUrl;
use cargotrack_entity::file::FileUpload;
use cargotrack_service::UploadRequest;

use crate::dto::request::DownloadParams;
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, PathId};
use crate::state::AppState;

fn multipart_error(e: MultipartError) -> AppError {
    AppError::validation(format!("Invalid multipart body: {}", e.body_text()))
}

/// POST /upload
///
/// Multipart fields: `file` (required) and `recipient` (optional).
pub async fn upload(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<FileUpload>>), ApiError> {
    let mut file = None;
    let mut recipient = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or("file").to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(multipart_error)?;
                file = Some((file_name, content_type, data));
            }
            Some("recipient") => {
                recipient = Some(field.text().await.map_err(multipart_error)?);
            }
            _ => {}
        }
    }

    let (file_name, content_type, data) =
        file.ok_or_else(|| AppError::validation("No file provided"))?;

    let upload = state
        .file_service
        .upload(
            &auth,
            UploadRequest {
                file_name,
                content_type,
                data,
                recipient,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(upload))))
}

/// GET /download?path=
pub async fn download(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<DownloadParams>,
) -> Result<Json<ApiResponse<SignedUrl>>, ApiError> {
    let link = state.file_service.download(&auth, &params.path).await?;
    Ok(Json(ApiResponse::ok(link)))
}

/// GET /files
pub async fn list_files(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<FileUpload>>>, ApiError> {
    let files = state.file_service.list(&auth).await?;
    Ok(Json(ApiResponse::ok(files)))
}

/// DELETE /files/{id}
pub async fn delete_file(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(id): PathId,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.file_service.delete(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("File deleted"))))
}
