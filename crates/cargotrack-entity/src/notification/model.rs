//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::order::LogisticsStatus;

/// A status-change notice delivered to one recipient.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: Uuid,
    /// Recipient email.
    pub user_email: String,
    /// Human-readable order identifier. Not a foreign key.
    pub order_id: String,
    /// The status the order moved to.
    pub order_status: LogisticsStatus,
    /// Notification body text.
    pub message: String,
    /// Whether the recipient has read this notification.
    pub is_read: bool,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Check if the notification has been read.
    pub fn is_unread(&self) -> bool {
        !self.is_read
    }
}

/// Data required to append a notification.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_email: String,
    pub order_id: String,
    pub order_status: LogisticsStatus,
    pub message: String,
}

impl NewNotification {
    /// Build the standard status-change notice for an order.
    pub fn status_change(
        user_email: impl Into<String>,
        order_id: &str,
        status: LogisticsStatus,
    ) -> Self {
        Self {
            user_email: user_email.into(),
            order_id: order_id.to_string(),
            order_status: status,
            message: format!("Order {order_id} status changed to {}", status.label()),
        }
    }

    /// Materialise the row as unread with the given timestamp.
    pub fn into_notification(self, created_at: DateTime<Utc>) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            user_email: self.user_email,
            order_id: self.order_id,
            order_status: self.order_status,
            message: self.message,
            is_read: false,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_change_message() {
        let n = NewNotification::status_change("a@b.test", "ORD-7", LogisticsStatus::Arrived);
        assert_eq!(n.message, "Order ORD-7 status changed to Arrived");

        let row = n.into_notification(Utc::now());
        assert!(row.is_unread());
        assert_eq!(row.order_status, LogisticsStatus::Arrived);
    }
}
