//! Profile directory commands.

use std::sync::Arc;

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use cargotrack_auth::ProviderAdminClient;
use cargotrack_core::config::AppConfig;
use cargotrack_core::error::AppError;
use cargotrack_database::ProfileStore;
use cargotrack_database::repositories::ProfileRepository;
use cargotrack_entity::profile::UserProfile;
use cargotrack_service::{DirectoryService, ImportMode};

use crate::output::{self, OutputFormat};

pub const SYNC_MODE: ImportMode = ImportMode::CreateMissing;
pub const POPULATE_MODE: ImportMode = ImportMode::CreateOrUpdate;

/// Arguments for sync-users and populate-profiles
#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Report what would change without writing
    #[arg(long)]
    pub dry_run: bool,
}

/// Profile display row for table output
#[derive(Debug, Serialize, Tabled)]
struct ProfileRow {
    /// Username
    username: String,
    /// Email
    email: String,
    /// Role
    role: String,
    /// Country
    country: String,
    /// Updated at
    updated_at: String,
}

impl From<&UserProfile> for ProfileRow {
    fn from(p: &UserProfile) -> Self {
        Self {
            username: p.username.clone(),
            email: p.email.clone(),
            role: p.role.clone(),
            country: p.country.clone(),
            updated_at: p.updated_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Pull every provider user and import them into the directory.
pub async fn import(
    args: &ImportArgs,
    mode: ImportMode,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let client = ProviderAdminClient::new(&config.identity)?;
    let pool = super::create_db_pool(config).await?;
    let directory = DirectoryService::new(
        Arc::new(ProfileRepository::new(pool)),
        &config.directory,
    );

    let users = client.list_users().await?;
    let report = directory.import(&users, mode, args.dry_run).await?;

    match format {
        OutputFormat::Json => output::print_item(&report, format),
        OutputFormat::Table => {
            let prefix = if report.dry_run { "Dry run: " } else { "" };
            output::print_kv("Provider users", &users.len().to_string());
            output::print_kv("Created", &report.created.to_string());
            output::print_kv("Updated", &report.updated.to_string());
            output::print_kv("Unchanged", &report.unchanged.to_string());
            output::print_kv("Skipped", &report.skipped.to_string());
            output::print_success(&format!("{prefix}profile import finished"));
        }
    }
    Ok(())
}

/// Execute the profiles command
pub async fn list(config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let pool = super::create_db_pool(config).await?;
    let profiles = ProfileRepository::new(pool).list_all().await?;
    let rows: Vec<ProfileRow> = profiles.iter().map(ProfileRow::from).collect();
    output::print_list(&rows, format);
    Ok(())
}
