//! Notification feed maintenance.

use std::sync::Arc;

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use cargotrack_core::config::AppConfig;
use cargotrack_core::error::AppError;
use cargotrack_database::repositories::NotificationRepository;
use cargotrack_service::MaintenanceService;

use crate::output::{self, OutputFormat};

/// Arguments for cleanup-notifications
#[derive(Debug, Args)]
pub struct CleanupArgs {
    /// Report what would be deleted without deleting
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Serialize, Tabled)]
struct ExcessRow {
    /// Recipient
    recipient: String,
    /// Rows held
    total: i64,
    /// Rows over the cap
    excess: i64,
}

/// Execute cleanup-notifications
pub async fn execute(
    args: &CleanupArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let pool = super::create_db_pool(config).await?;
    let maintenance = MaintenanceService::new(
        Arc::new(NotificationRepository::new(pool)),
        config.notifications.max_per_recipient,
    );

    let report = maintenance.cleanup_notifications(args.dry_run).await?;

    if format == OutputFormat::Json {
        output::print_item(&report, format);
        return Ok(());
    }

    let rows: Vec<ExcessRow> = report
        .recipients
        .iter()
        .map(|r| ExcessRow {
            recipient: r.user_email.clone(),
            total: r.total,
            excess: r.excess,
        })
        .collect();
    output::print_list(&rows, format);

    if report.dry_run {
        output::print_warning(&format!(
            "Dry run: {} notification(s) would be deleted",
            report.total_excess()
        ));
    } else {
        output::print_success(&format!("Deleted {} notification(s)", report.deleted));
    }
    Ok(())
}
