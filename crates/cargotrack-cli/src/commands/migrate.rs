//! Database migrations.

use cargotrack_core::config::AppConfig;
use cargotrack_core::error::AppError;

use crate::output;

/// Apply every pending migration.
pub async fn execute(config: &AppConfig) -> Result<(), AppError> {
    let pool = super::create_db_pool(config).await?;
    println!("Running database migrations...");
    cargotrack_database::migration::run_migrations(&pool).await?;
    output::print_success("All migrations applied successfully.");
    Ok(())
}
