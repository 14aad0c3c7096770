//! CLI command definitions and dispatch.

pub mod migrate;
pub mod notifications;
pub mod profiles;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use cargotrack_core::config::AppConfig;
use cargotrack_core::error::AppError;
use cargotrack_database::DatabasePool;

/// CargoTrack shipment tracking backend
#[derive(Debug, Parser)]
#[command(name = "cargotrack", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Environment overlay loaded from `config/<env>.toml`
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve(serve::ServeArgs),
    /// Apply database migrations
    Migrate,
    /// Trim every notification feed to the configured cap
    CleanupNotifications(notifications::CleanupArgs),
    /// Create profiles for provider users that have none
    SyncUsers(profiles::ImportArgs),
    /// Create missing profiles and refresh changed ones from the provider
    PopulateProfiles(profiles::ImportArgs),
    /// List every user profile
    Profiles,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = AppConfig::load(&self.config, &self.env)?;
        match &self.command {
            Commands::Serve(args) => serve::execute(args, config).await,
            Commands::Migrate => migrate::execute(&config).await,
            Commands::CleanupNotifications(args) => {
                notifications::execute(args, &config, self.format).await
            }
            Commands::SyncUsers(args) => {
                profiles::import(args, profiles::SYNC_MODE, &config, self.format).await
            }
            Commands::PopulateProfiles(args) => {
                profiles::import(args, profiles::POPULATE_MODE, &config, self.format).await
            }
            Commands::Profiles => profiles::list(&config, self.format).await,
        }
    }
}

/// Connect to the configured database.
pub async fn create_db_pool(config: &AppConfig) -> Result<sqlx::PgPool, AppError> {
    let pool = DatabasePool::connect(&config.database).await?;
    Ok(pool.pool().clone())
}
