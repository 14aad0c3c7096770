//! Application builder: wires stores, object store and services into an
//! Axum app and serves it.

use std::sync::Arc;

use axum::Router;
use sqlx::PgPool;
use tracing::info;

use cargotrack_core::config::AppConfig;
use cargotrack_core::error::{AppError, ErrorKind};
use cargotrack_storage::build_object_store;

use crate::router::build_router;
use crate::state::{AppState, StoreSet};

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Runs the CargoTrack server on PostgreSQL with the configured object store.
pub async fn run_server(config: AppConfig, db_pool: PgPool) -> Result<(), AppError> {
    info!(
        provider = %config.storage.provider,
        bucket = %config.storage.bucket,
        "Initializing object store"
    );
    let object_store = build_object_store(&config.storage).await?;

    if config.identity.admin_email.is_empty() {
        tracing::warn!("identity.admin_email is empty; uploads without a recipient will be rejected");
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let stores = StoreSet::postgres(&db_pool);
    let state = AppState::new(config, stores, Arc::clone(&object_store), Some(db_pool))?;
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        AppError::with_source(ErrorKind::Internal, format!("Failed to bind {addr}"), e)
    })?;
    info!(%addr, "CargoTrack server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Internal, "Server error", e))?;

    info!("CargoTrack server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
