//! In-memory implementation of every store trait.
//!
//! Rows live in DashMaps. A monotonically increasing sequence number breaks
//! `created_at` ties so "newest first" is stable.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;
use uuid::Uuid;

use cargotrack_core::error::AppError;
use cargotrack_core::result::AppResult;
use cargotrack_core::types::Scope;
use cargotrack_entity::file::{FileUpload, NewFileUpload};
use cargotrack_entity::notification::{NewNotification, Notification};
use cargotrack_entity::order::{LogisticsStatus, NewOrder, Order};
use cargotrack_entity::profile::{ProfileData, UserProfile};

use crate::store::{
    FileUploadStore, NotificationStore, OrderFilter, OrderStore, ProfileStore, RecipientExcess,
};

/// A row plus its insertion sequence.
#[derive(Debug, Clone)]
struct Stored<T> {
    seq: u64,
    row: T,
}

/// In-memory database holding orders, notifications, uploads and profiles.
#[derive(Debug, Default)]
pub struct MemoryDatabase {
    seq: AtomicU64,
    orders: DashMap<Uuid, Stored<Order>>,
    order_ids: DashMap<String, Uuid>,
    notifications: DashMap<Uuid, Stored<Notification>>,
    uploads: DashMap<Uuid, Stored<FileUpload>>,
    profiles: DashMap<String, Stored<UserProfile>>,
}

impl MemoryDatabase {
    /// Create an empty database.
    pub fn new() -> Self {
        Self::default()
    }

    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::SeqCst)
    }

    /// Notifications of one recipient, newest first.
    fn recipient_rows(&self, user_email: &str) -> Vec<Stored<Notification>> {
        let mut rows: Vec<_> = self
            .notifications
            .iter()
            .filter(|e| e.row.user_email == user_email)
            .map(|e| e.value().clone())
            .collect();
        rows.sort_by_key(|s| Reverse((s.row.created_at, s.seq)));
        rows
    }

    fn email_taken(&self, email: &str, except_user_id: &str) -> bool {
        self.profiles.iter().any(|e| {
            e.row.user_id != except_user_id && e.row.email.eq_ignore_ascii_case(email)
        })
    }
}

/// Sort stored rows newest first and unwrap them.
fn newest_first<T, F>(mut rows: Vec<Stored<T>>, created_at: F) -> Vec<T>
where
    F: Fn(&T) -> chrono::DateTime<Utc>,
{
    rows.sort_by_key(|s| Reverse((created_at(&s.row), s.seq)));
    rows.into_iter().map(|s| s.row).collect()
}

#[async_trait]
impl OrderStore for MemoryDatabase {
    async fn insert(&self, order: NewOrder) -> AppResult<Order> {
        let row = order.into_order(Utc::now());
        match self.order_ids.entry(row.order_id.clone()) {
            Entry::Occupied(_) => {
                return Err(AppError::conflict(format!(
                    "Order '{}' already exists",
                    row.order_id
                )));
            }
            Entry::Vacant(slot) => {
                slot.insert(row.id);
            }
        }
        let seq = self.next_seq();
        self.orders.insert(
            row.id,
            Stored {
                seq,
                row: row.clone(),
            },
        );
        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Order>> {
        Ok(self.orders.get(&id).map(|s| s.row.clone()))
    }

    async fn list(&self, filter: &OrderFilter) -> AppResult<Vec<Order>> {
        let rows = self
            .orders
            .iter()
            .filter(|e| filter.matches(&e.row))
            .map(|e| e.value().clone())
            .collect();
        Ok(newest_first(rows, |o: &Order| o.created_at))
    }

    async fn update(&self, order: &Order) -> AppResult<Order> {
        let previous_id = self
            .orders
            .get(&order.id)
            .map(|s| s.row.order_id.clone())
            .ok_or_else(|| AppError::not_found(format!("Order {} not found", order.id)))?;

        if previous_id != order.order_id {
            match self.order_ids.entry(order.order_id.clone()) {
                Entry::Occupied(_) => {
                    return Err(AppError::conflict(format!(
                        "Order '{}' already exists",
                        order.order_id
                    )));
                }
                Entry::Vacant(slot) => {
                    slot.insert(order.id);
                }
            }
            self.order_ids.remove(&previous_id);
        }

        let mut stored = self
            .orders
            .get_mut(&order.id)
            .ok_or_else(|| AppError::not_found(format!("Order {} not found", order.id)))?;
        let created_by = stored.row.created_by.clone();
        let created_at = stored.row.created_at;
        stored.row = Order {
            created_by,
            created_at,
            ..order.clone()
        };
        Ok(stored.row.clone())
    }

    async fn set_status(&self, id: Uuid, status: LogisticsStatus) -> AppResult<Order> {
        let mut stored = self
            .orders
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Order {id} not found")))?;
        stored.row.logistics_status = status;
        Ok(stored.row.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        match self.orders.remove(&id) {
            Some((_, stored)) => {
                self.order_ids.remove(&stored.row.order_id);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl NotificationStore for MemoryDatabase {
    async fn insert(&self, notification: NewNotification) -> AppResult<Notification> {
        let row = notification.into_notification(Utc::now());
        let seq = self.next_seq();
        self.notifications.insert(
            row.id,
            Stored {
                seq,
                row: row.clone(),
            },
        );
        Ok(row)
    }

    async fn list_for(&self, user_email: &str, limit: i64) -> AppResult<Vec<Notification>> {
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(self
            .recipient_rows(user_email)
            .into_iter()
            .take(limit)
            .map(|s| s.row)
            .collect())
    }

    async fn mark_read(&self, id: Uuid, user_email: &str) -> AppResult<bool> {
        match self.notifications.get_mut(&id) {
            Some(mut stored) if stored.row.user_email == user_email => {
                stored.row.is_read = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn mark_all_read(&self, user_email: &str) -> AppResult<u64> {
        let mut count = 0;
        for mut entry in self.notifications.iter_mut() {
            if entry.row.user_email == user_email && !entry.row.is_read {
                entry.row.is_read = true;
                count += 1;
            }
        }
        Ok(count)
    }

    async fn count_unread(&self, user_email: &str) -> AppResult<i64> {
        Ok(self
            .notifications
            .iter()
            .filter(|e| e.row.user_email == user_email && !e.row.is_read)
            .count() as i64)
    }

    async fn count_for(&self, user_email: &str) -> AppResult<i64> {
        Ok(self
            .notifications
            .iter()
            .filter(|e| e.row.user_email == user_email)
            .count() as i64)
    }

    async fn trim_for(&self, user_email: &str, keep: i64) -> AppResult<u64> {
        let keep = usize::try_from(keep).unwrap_or(0);
        let mut removed = 0;
        for stale in self.recipient_rows(user_email).into_iter().skip(keep) {
            if self.notifications.remove(&stale.row.id).is_some() {
                removed += 1;
            }
        }
        if removed > 0 {
            debug!(user_email, removed, "Trimmed notifications");
        }
        Ok(removed)
    }

    async fn excess_by_recipient(&self, keep: i64) -> AppResult<Vec<RecipientExcess>> {
        let mut counts: HashMap<String, i64> = HashMap::new();
        for entry in self.notifications.iter() {
            *counts.entry(entry.row.user_email.clone()).or_insert(0) += 1;
        }
        let mut excess: Vec<_> = counts
            .into_iter()
            .filter(|(_, total)| *total > keep)
            .map(|(user_email, total)| RecipientExcess {
                user_email,
                total,
                excess: total - keep,
            })
            .collect();
        excess.sort_by(|a, b| a.user_email.cmp(&b.user_email));
        Ok(excess)
    }

    async fn trim_all(&self, keep: i64) -> AppResult<u64> {
        let mut removed = 0;
        for recipient in self.excess_by_recipient(keep).await? {
            removed += self.trim_for(&recipient.user_email, keep).await?;
        }
        Ok(removed)
    }
}

#[async_trait]
impl FileUploadStore for MemoryDatabase {
    async fn insert(&self, upload: NewFileUpload) -> AppResult<FileUpload> {
        let row = upload.into_file_upload(Utc::now());
        let seq = self.next_seq();
        self.uploads.insert(
            row.id,
            Stored {
                seq,
                row: row.clone(),
            },
        );
        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<FileUpload>> {
        Ok(self.uploads.get(&id).map(|s| s.row.clone()))
    }

    async fn find_by_path(&self, file_path: &str) -> AppResult<Vec<FileUpload>> {
        let rows = self
            .uploads
            .iter()
            .filter(|e| e.row.file_path == file_path)
            .map(|e| e.value().clone())
            .collect();
        Ok(newest_first(rows, |f: &FileUpload| f.created_at))
    }

    async fn list(&self, scope: &Scope) -> AppResult<Vec<FileUpload>> {
        let rows = self
            .uploads
            .iter()
            .filter(|e| scope.includes(e.row.party_emails()))
            .map(|e| e.value().clone())
            .collect();
        Ok(newest_first(rows, |f: &FileUpload| f.created_at))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.uploads.remove(&id).is_some())
    }
}

#[async_trait]
impl ProfileStore for MemoryDatabase {
    async fn find_by_user_id(&self, user_id: &str) -> AppResult<Option<UserProfile>> {
        Ok(self.profiles.get(user_id).map(|s| s.row.clone()))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserProfile>> {
        Ok(self
            .profiles
            .iter()
            .find(|e| e.row.email.eq_ignore_ascii_case(email))
            .map(|e| e.row.clone()))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<UserProfile>> {
        let wanted = username.to_lowercase();
        Ok(self
            .profiles
            .iter()
            .filter(|e| e.row.username.to_lowercase() == wanted)
            .min_by_key(|e| e.seq)
            .map(|e| e.row.clone()))
    }

    async fn insert(&self, data: ProfileData) -> AppResult<UserProfile> {
        if self.email_taken(&data.email, &data.user_id) {
            return Err(AppError::conflict(format!(
                "Profile for '{}' already exists",
                data.email
            )));
        }
        let seq = self.next_seq();
        match self.profiles.entry(data.user_id.clone()) {
            Entry::Occupied(_) => Err(AppError::conflict(format!(
                "Profile for '{}' already exists",
                data.email
            ))),
            Entry::Vacant(slot) => {
                let row = data.into_profile(Utc::now());
                slot.insert(Stored {
                    seq,
                    row: row.clone(),
                });
                Ok(row)
            }
        }
    }

    async fn upsert(&self, data: ProfileData) -> AppResult<UserProfile> {
        if self.email_taken(&data.email, &data.user_id) {
            return Err(AppError::conflict(format!(
                "Email '{}' belongs to another profile",
                data.email
            )));
        }
        let now = Utc::now();
        let seq = self.next_seq();
        let mut stored = self
            .profiles
            .entry(data.user_id.clone())
            .or_insert_with(|| Stored {
                seq,
                row: data.clone().into_profile(now),
            });
        stored.row.apply(data, now);
        Ok(stored.row.clone())
    }

    async fn search_by_username(
        &self,
        query: &str,
        exclude_email: &str,
        limit: i64,
    ) -> AppResult<Vec<UserProfile>> {
        let needle = query.to_lowercase();
        let mut hits: Vec<UserProfile> = self
            .profiles
            .iter()
            .filter(|e| e.row.username.to_lowercase().contains(&needle))
            .filter(|e| !e.row.email.eq_ignore_ascii_case(exclude_email))
            .map(|e| e.row.clone())
            .collect();
        hits.sort_by_key(|p| p.username.to_lowercase());
        hits.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(hits)
    }

    async fn list_all(&self) -> AppResult<Vec<UserProfile>> {
        let mut all: Vec<UserProfile> = self.profiles.iter().map(|e| e.row.clone()).collect();
        all.sort_by_key(|p| p.username.to_lowercase());
        Ok(all)
    }
}
