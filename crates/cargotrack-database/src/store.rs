//! Persistence traits consumed by the service layer.
//!
//! Each trait has a PostgreSQL implementation in [`crate::repositories`]
//! and an in-memory implementation in [`crate::memory`].

use std::fmt::Debug;

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use cargotrack_core::result::AppResult;
use cargotrack_core::types::Scope;
use cargotrack_entity::file::{FileUpload, NewFileUpload};
use cargotrack_entity::notification::{NewNotification, Notification};
use cargotrack_entity::order::{LogisticsStatus, NewOrder, Order};
use cargotrack_entity::profile::{ProfileData, UserProfile};

/// Filters for listing orders.
#[derive(Debug, Clone)]
pub struct OrderFilter {
    /// Visibility scope of the caller.
    pub scope: Scope,
    /// Exact match on the human-readable order id.
    pub order_id: Option<String>,
    /// Exact match on the logistics status.
    pub status: Option<LogisticsStatus>,
    /// Case-insensitive substring over order id and locations.
    pub query: Option<String>,
}

impl OrderFilter {
    /// A filter with only a scope.
    pub fn scoped(scope: Scope) -> Self {
        Self {
            scope,
            order_id: None,
            status: None,
            query: None,
        }
    }

    /// Whether the order passes every filter.
    pub fn matches(&self, order: &Order) -> bool {
        if !self.scope.includes(order.party_emails()) {
            return false;
        }
        if let Some(ref id) = self.order_id {
            if &order.order_id != id {
                return false;
            }
        }
        if let Some(status) = self.status {
            if order.logistics_status != status {
                return false;
            }
        }
        if let Some(ref q) = self.query {
            let q = q.to_lowercase();
            let hit = [
                &order.order_id,
                &order.loading_location,
                &order.port_airport_departure,
                &order.port_airport_arrival,
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(&q));
            if !hit {
                return false;
            }
        }
        true
    }
}

/// Per-recipient count of rows above the notification cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipientExcess {
    pub user_email: String,
    pub total: i64,
    pub excess: i64,
}

/// Order persistence.
#[async_trait]
pub trait OrderStore: Send + Sync + Debug + 'static {
    /// Insert a new order. A duplicate `order_id` is a conflict.
    async fn insert(&self, order: NewOrder) -> AppResult<Order>;

    /// Find an order by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Order>>;

    /// List orders matching the filter, newest first.
    async fn list(&self, filter: &OrderFilter) -> AppResult<Vec<Order>>;

    /// Overwrite the mutable columns of an existing order.
    ///
    /// `created_by` and `created_at` are never written.
    async fn update(&self, order: &Order) -> AppResult<Order>;

    /// Set the logistics status of an order.
    async fn set_status(&self, id: Uuid, status: LogisticsStatus) -> AppResult<Order>;

    /// Delete an order. Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// Notification feed persistence.
#[async_trait]
pub trait NotificationStore: Send + Sync + Debug + 'static {
    /// Insert an unread notification stamped with the current time.
    async fn insert(&self, notification: NewNotification) -> AppResult<Notification>;

    /// The recipient's notifications, newest first.
    async fn list_for(&self, user_email: &str, limit: i64) -> AppResult<Vec<Notification>>;

    /// Mark one notification read. Returns false when it does not exist or
    /// belongs to someone else.
    async fn mark_read(&self, id: Uuid, user_email: &str) -> AppResult<bool>;

    /// Mark all of the recipient's unread notifications read.
    async fn mark_all_read(&self, user_email: &str) -> AppResult<u64>;

    /// Count the recipient's unread notifications.
    async fn count_unread(&self, user_email: &str) -> AppResult<i64>;

    /// Count the recipient's notifications.
    async fn count_for(&self, user_email: &str) -> AppResult<i64>;

    /// Delete the recipient's oldest notifications beyond `keep`.
    async fn trim_for(&self, user_email: &str, keep: i64) -> AppResult<u64>;

    /// Recipients holding more than `keep` notifications.
    async fn excess_by_recipient(&self, keep: i64) -> AppResult<Vec<RecipientExcess>>;

    /// Trim every recipient down to `keep`.
    async fn trim_all(&self, keep: i64) -> AppResult<u64>;
}

/// Relayed file record persistence.
#[async_trait]
pub trait FileUploadStore: Send + Sync + Debug + 'static {
    async fn insert(&self, upload: NewFileUpload) -> AppResult<FileUpload>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<FileUpload>>;

    /// Every record pointing at the given blob key.
    async fn find_by_path(&self, file_path: &str) -> AppResult<Vec<FileUpload>>;

    /// Records visible in the scope, newest first.
    async fn list(&self, scope: &Scope) -> AppResult<Vec<FileUpload>>;

    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// User directory persistence.
#[async_trait]
pub trait ProfileStore: Send + Sync + Debug + 'static {
    async fn find_by_user_id(&self, user_id: &str) -> AppResult<Option<UserProfile>>;

    /// Case-insensitive email lookup.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserProfile>>;

    /// Case-insensitive exact username lookup.
    async fn find_by_username(&self, username: &str) -> AppResult<Option<UserProfile>>;

    /// Insert a profile. An existing `user_id` or email is a conflict.
    async fn insert(&self, data: ProfileData) -> AppResult<UserProfile>;

    /// Insert or fully replace the profile keyed by `user_id`.
    async fn upsert(&self, data: ProfileData) -> AppResult<UserProfile>;

    /// Case-insensitive substring search on username, ordered by username.
    async fn search_by_username(
        &self,
        query: &str,
        exclude_email: &str,
        limit: i64,
    ) -> AppResult<Vec<UserProfile>>;

    /// All profiles ordered by username.
    async fn list_all(&self) -> AppResult<Vec<UserProfile>>;
}
