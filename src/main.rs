//! CargoTrack Server
//!
//! Loads configuration, prepares the database and starts the HTTP API.

use tracing_subscriber::{EnvFilter, fmt};

use cargotrack_core::config::AppConfig;
use cargotrack_core::error::AppError;
use cargotrack_database::DatabasePool;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load configuration from file, environment overlay and variables.
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_path =
        std::env::var("CARGOTRACK_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());
    let env = std::env::var("CARGOTRACK_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&config_path, &env)
}

fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting CargoTrack v{}", env!("CARGO_PKG_VERSION"));

    tracing::info!("Connecting to database...");
    let pool = DatabasePool::connect(&config.database).await?;

    tracing::info!("Running database migrations...");
    cargotrack_database::migration::run_migrations(pool.pool()).await?;

    cargotrack_api::run_server(config, pool.pool().clone()).await
}
