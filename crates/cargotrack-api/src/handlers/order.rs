//! Order handlers.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;

use cargotrack_core::error::AppError;
use cargotrack_entity::order::Order;
use cargotrack_service::{OrderInput, OrderPatch, OrderQuery};

use crate::dto::request::StatusUpdateRequest;
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, JsonBody, PathId};
use crate::state::AppState;

/// GET /orders
pub async fn list_orders(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<OrderQuery>,
) -> Result<Json<ApiResponse<Vec<Order>>>, ApiError> {
    let orders = state.order_service.list(&auth, query).await?;
    Ok(Json(ApiResponse::ok(orders)))
}

/// POST /orders
pub async fn create_order(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(input): JsonBody<OrderInput>,
) -> Result<(StatusCode, Json<ApiResponse<Order>>), ApiError> {
    let order = state.order_service.create(&auth, input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(order))))
}

/// GET /orders/{id}
pub async fn get_order(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(id): PathId,
) -> Result<Json<ApiResponse<Order>>, ApiError> {
    let order = state.order_service.get(&auth, id).await?;
    Ok(Json(ApiResponse::ok(order)))
}

/// PUT /orders/{id}
pub async fn replace_order(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(id): PathId,
    JsonBody(input): JsonBody<OrderInput>,
) -> Result<Json<ApiResponse<Order>>, ApiError> {
    let order = state.order_service.replace(&auth, id, input).await?;
    Ok(Json(ApiResponse::ok(order)))
}

/// PATCH /orders/{id}
pub async fn patch_order(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(id): PathId,
    JsonBody(patch): JsonBody<OrderPatch>,
) -> Result<Json<ApiResponse<Order>>, ApiError> {
    let order = state.order_service.patch(&auth, id, patch).await?;
    Ok(Json(ApiResponse::ok(order)))
}

/// DELETE /orders/{id}
pub async fn delete_order(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(id): PathId,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.order_service.delete(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Order deleted"))))
}

/// PATCH /orders/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(id): PathId,
    JsonBody(req): JsonBody<StatusUpdateRequest>,
) -> Result<Json<ApiResponse<Order>>, ApiError> {
    let status = req
        .status
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::validation("status is required"))?;
    let order = state.order_service.update_status(&auth, id, &status).await?;
    Ok(Json(ApiResponse::ok(order)))
}
