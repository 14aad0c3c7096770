//! Caller identity and user directory handlers.

use axum::Json;
use axum::extract::{Query, State};

use cargotrack_entity::profile::UserProfile;

use crate::dto::request::SearchUsersParams;
use crate::dto::response::{ApiResponse, MeResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /me
///
/// Creates the caller's directory profile on first sight.
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<MeResponse>>, ApiError> {
    state.directory_service.ensure(&auth).await?;
    Ok(Json(ApiResponse::ok(MeResponse::from(auth.context()))))
}

/// GET /search-users?username=
pub async fn search_users(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<SearchUsersParams>,
) -> Result<Json<ApiResponse<Vec<UserProfile>>>, ApiError> {
    state.directory_service.ensure(&auth).await?;
    let profiles = state
        .directory_service
        .search(&auth, &params.username)
        .await?;
    Ok(Json(ApiResponse::ok(profiles)))
}

/// POST /sync-profile
pub async fn sync_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    let profile = state.directory_service.sync(&auth).await?;
    Ok(Json(ApiResponse::ok(profile)))
}
