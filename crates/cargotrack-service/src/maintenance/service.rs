//! Notification feed cleanup across all recipients.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use cargotrack_core::result::AppResult;
use cargotrack_database::{NotificationStore, RecipientExcess};

/// Outcome of a cleanup run.
#[derive(Debug, Clone, Serialize)]
pub struct CleanupReport {
    /// Recipients over the cap, with how many rows they hold and exceed by.
    pub recipients: Vec<RecipientExcess>,
    /// Rows deleted; zero on a dry run.
    pub deleted: u64,
    pub dry_run: bool,
}

impl CleanupReport {
    /// Rows over the cap across every recipient.
    pub fn total_excess(&self) -> i64 {
        self.recipients.iter().map(|r| r.excess).sum()
    }
}

/// Batch jobs run from the CLI.
#[derive(Debug, Clone)]
pub struct MaintenanceService {
    notifications: Arc<dyn NotificationStore>,
    max_per_recipient: i64,
}

impl MaintenanceService {
    /// Creates a new maintenance service.
    pub fn new(notifications: Arc<dyn NotificationStore>, max_per_recipient: i64) -> Self {
        Self {
            notifications,
            max_per_recipient,
        }
    }

    /// Trims every recipient's feed to the newest `max_per_recipient` rows.
    pub async fn cleanup_notifications(&self, dry_run: bool) -> AppResult<CleanupReport> {
        let recipients = self
            .notifications
            .excess_by_recipient(self.max_per_recipient)
            .await?;

        let deleted = if dry_run || recipients.is_empty() {
            0
        } else {
            self.notifications.trim_all(self.max_per_recipient).await?
        };

        let report = CleanupReport {
            recipients,
            deleted,
            dry_run,
        };
        info!(
            recipients = report.recipients.len(),
            excess = report.total_excess(),
            deleted,
            dry_run,
            "Notification cleanup finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cargotrack_database::MemoryDatabase;
    use cargotrack_entity::notification::NewNotification;
    use cargotrack_entity::order::LogisticsStatus;

    async fn seeded(per_recipient: &[(&str, usize)]) -> Arc<MemoryDatabase> {
        let db = Arc::new(MemoryDatabase::new());
        for (email, count) in per_recipient {
            for n in 0..*count {
                let notice = NewNotification::status_change(
                    *email,
                    &format!("ORD-{n}"),
                    LogisticsStatus::Arrived,
                );
                NotificationStore::insert(db.as_ref(), notice).await.unwrap();
            }
        }
        db
    }

    #[tokio::test]
    async fn test_dry_run_reports_without_deleting() {
        let db = seeded(&[("a@x.test", 7), ("b@x.test", 3)]).await;
        let svc = MaintenanceService::new(db.clone(), 5);

        let report = svc.cleanup_notifications(true).await.unwrap();
        assert_eq!(report.recipients.len(), 1);
        assert_eq!(report.recipients[0].user_email, "a@x.test");
        assert_eq!(report.total_excess(), 2);
        assert_eq!(report.deleted, 0);
        assert_eq!(db.count_for("a@x.test").await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_cleanup_keeps_newest() {
        let db = seeded(&[("a@x.test", 7), ("b@x.test", 3)]).await;
        let svc = MaintenanceService::new(db.clone(), 5);

        let report = svc.cleanup_notifications(false).await.unwrap();
        assert_eq!(report.deleted, 2);

        let feed = db.list_for("a@x.test", 50).await.unwrap();
        assert_eq!(feed.len(), 5);
        assert_eq!(feed[0].order_id, "ORD-6");
        assert_eq!(feed[4].order_id, "ORD-2");
        assert_eq!(db.count_for("b@x.test").await.unwrap(), 3);
    }
}
