//! Route definitions for the CargoTrack HTTP API.
//!
//! The router receives `AppState` and passes it to all handlers via Axum's
//! `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, patch, post},
};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Room for multipart boundaries and the `recipient` field on top of the
/// file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let max_upload = usize::try_from(state.config.storage.max_upload_size_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD);

    let api_routes = Router::new()
        .merge(order_routes())
        .merge(user_routes())
        .merge(file_routes())
        .merge(notification_routes())
        .merge(admin_routes())
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::timeout::request_timeout,
        ));

    Router::new()
        .merge(api_routes)
        .route("/health", get(handlers::health::health))
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors::build_cors_layer(&state.config.server.cors))
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Order CRUD and status changes
fn order_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/orders",
            get(handlers::order::list_orders).post(handlers::order::create_order),
        )
        .route(
            "/orders/{id}",
            get(handlers::order::get_order)
                .put(handlers::order::replace_order)
                .patch(handlers::order::patch_order)
                .delete(handlers::order::delete_order),
        )
        .route("/orders/{id}/status", patch(handlers::order::update_status))
}

/// Caller identity and directory
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(handlers::user::me))
        .route("/search-users", get(handlers::user::search_users))
        .route("/sync-profile", post(handlers::user::sync_profile))
}

/// File relay
fn file_routes() -> Router<AppState> {
    Router::new()
        .route("/upload", post(handlers::file::upload))
        .route("/download", get(handlers::file::download))
        .route("/files", get(handlers::file::list_files))
        .route("/files/{id}", axum::routing::delete(handlers::file::delete_file))
}

/// Notification feed
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(handlers::notification::list_notifications))
        .route(
            "/notifications/unread-count",
            get(handlers::notification::unread_count),
        )
        .route(
            "/notifications/read-all",
            patch(handlers::notification::mark_all_read),
        )
        .route(
            "/notifications/{id}/read",
            patch(handlers::notification::mark_read),
        )
}

/// Administrator-only endpoints
fn admin_routes() -> Router<AppState> {
    Router::new().route("/admin/profiles", get(handlers::admin::list_profiles))
}
