//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use sqlx::PgPool;

use cargotrack_auth::IdentityResolver;
use cargotrack_core::config::AppConfig;
use cargotrack_core::result::AppResult;
use cargotrack_core::traits::ObjectStore;
use cargotrack_database::repositories::{
    FileUploadRepository, NotificationRepository, OrderRepository, ProfileRepository,
};
use cargotrack_database::{
    FileUploadStore, MemoryDatabase, NotificationStore, OrderStore, ProfileStore,
};
use cargotrack_service::{DirectoryService, FileRelayService, NotificationService, OrderService};

/// The four persistence handles the services run on.
#[derive(Debug, Clone)]
pub struct StoreSet {
    pub orders: Arc<dyn OrderStore>,
    pub notifications: Arc<dyn NotificationStore>,
    pub uploads: Arc<dyn FileUploadStore>,
    pub profiles: Arc<dyn ProfileStore>,
}

impl StoreSet {
    /// PostgreSQL repositories sharing one pool.
    pub fn postgres(pool: &PgPool) -> Self {
        Self {
            orders: Arc::new(OrderRepository::new(pool.clone())),
            notifications: Arc::new(NotificationRepository::new(pool.clone())),
            uploads: Arc::new(FileUploadRepository::new(pool.clone())),
            profiles: Arc::new(ProfileRepository::new(pool.clone())),
        }
    }

    /// One in-memory database behind every handle.
    pub fn memory(db: Arc<MemoryDatabase>) -> Self {
        Self {
            orders: db.clone(),
            notifications: db.clone(),
            uploads: db.clone(),
            profiles: db,
        }
    }
}

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// PostgreSQL pool, absent when running on the in-memory store
    pub db_pool: Option<PgPool>,
    /// Bearer token verification
    pub identity: Arc<IdentityResolver>,
    /// Blob storage
    pub object_store: Arc<dyn ObjectStore>,

    /// Order service
    pub order_service: Arc<OrderService>,
    /// Notification service
    pub notification_service: Arc<NotificationService>,
    /// File relay service
    pub file_service: Arc<FileRelayService>,
    /// User directory service
    pub directory_service: Arc<DirectoryService>,
}

impl AppState {
    /// Wire every service from configuration, stores and the object store.
    pub fn new(
        config: AppConfig,
        stores: StoreSet,
        object_store: Arc<dyn ObjectStore>,
        db_pool: Option<PgPool>,
    ) -> AppResult<Self> {
        let identity = Arc::new(IdentityResolver::new(&config.identity)?);
        let admin_email = config.identity.admin_email.clone();

        let directory_service = Arc::new(DirectoryService::new(
            stores.profiles.clone(),
            &config.directory,
        ));
        let notification_service = Arc::new(NotificationService::new(
            stores.notifications.clone(),
            config.notifications.max_per_recipient,
        ));
        let order_service = Arc::new(OrderService::new(
            stores.orders.clone(),
            directory_service.clone(),
            notification_service.clone(),
            admin_email.clone(),
        ));
        let file_service = Arc::new(FileRelayService::new(
            stores.uploads.clone(),
            object_store.clone(),
            directory_service.clone(),
            admin_email,
            &config.storage,
        ));

        Ok(Self {
            config: Arc::new(config),
            db_pool,
            identity,
            object_store,
            order_service,
            notification_service,
            file_service,
            directory_service,
        })
    }
}
