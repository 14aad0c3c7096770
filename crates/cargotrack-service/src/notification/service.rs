//! Notification append, listing and read-state management.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use cargotrack_core::error::AppError;
use cargotrack_core::result::AppResult;
use cargotrack_database::NotificationStore;
use cargotrack_entity::notification::{NewNotification, Notification};
use cargotrack_entity::order::Order;

use super::rules::status_change_recipients;
use crate::context::RequestContext;

/// Manages per-recipient notification feeds.
#[derive(Debug, Clone)]
pub struct NotificationService {
    /// Notification store.
    store: Arc<dyn NotificationStore>,
    /// Soft cap on rows kept per recipient.
    max_per_recipient: i64,
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(store: Arc<dyn NotificationStore>, max_per_recipient: i64) -> Self {
        Self {
            store,
            max_per_recipient,
        }
    }

    /// The per-recipient cap.
    pub fn max_per_recipient(&self) -> i64 {
        self.max_per_recipient
    }

    /// Appends an unread notification, then trims the recipient's feed.
    ///
    /// Count and trim are separate statements, so concurrent appends can
    /// leave a feed briefly over the cap until the next trim.
    pub async fn append(&self, notification: NewNotification) -> AppResult<Notification> {
        let recipient = notification.user_email.clone();
        let created = self.store.insert(notification).await?;

        let total = self.store.count_for(&recipient).await?;
        if total > self.max_per_recipient {
            let removed = self
                .store
                .trim_for(&recipient, self.max_per_recipient)
                .await?;
            debug!(recipient = %recipient, removed, "Trimmed notification feed");
        }

        Ok(created)
    }

    /// Notifies the interested parties of an order about its new status.
    pub async fn notify_status_change(
        &self,
        order: &Order,
        actor_email: &str,
        admin_email: &str,
    ) -> AppResult<Vec<Notification>> {
        let recipients = status_change_recipients(order, actor_email, admin_email);
        let mut sent = Vec::with_capacity(recipients.len());

        for recipient in recipients {
            let notice = NewNotification::status_change(
                recipient,
                &order.order_id,
                order.logistics_status,
            );
            sent.push(self.append(notice).await?);
        }

        info!(
            order_id = %order.order_id,
            status = %order.logistics_status,
            recipients = sent.len(),
            "Status change notifications sent"
        );
        Ok(sent)
    }

    /// Lists the caller's notifications, newest first.
    pub async fn list(&self, ctx: &RequestContext) -> AppResult<Vec<Notification>> {
        self.store
            .list_for(ctx.email(), self.max_per_recipient)
            .await
    }

    /// Marks one of the caller's notifications as read.
    pub async fn mark_read(&self, ctx: &RequestContext, notification_id: Uuid) -> AppResult<()> {
        if self.store.mark_read(notification_id, ctx.email()).await? {
            Ok(())
        } else {
            Err(AppError::not_found("Notification not found"))
        }
    }

    /// Marks every unread notification of the caller as read.
    pub async fn mark_all_read(&self, ctx: &RequestContext) -> AppResult<u64> {
        let updated = self.store.mark_all_read(ctx.email()).await?;
        info!(user_email = %ctx.email(), updated, "Marked all notifications read");
        Ok(updated)
    }

    /// Gets the caller's unread notification count.
    pub async fn unread_count(&self, ctx: &RequestContext) -> AppResult<i64> {
        self.store.count_unread(ctx.email()).await
    }
}
