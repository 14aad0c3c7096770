//! Administrator-only handlers.

use axum::Json;
use axum::extract::State;

use cargotrack_entity::profile::UserProfile;

use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /admin/profiles
pub async fn list_profiles(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<UserProfile>>>, ApiError> {
    let profiles = state.directory_service.list_all(&auth).await?;
    Ok(Json(ApiResponse::ok(profiles)))
}
