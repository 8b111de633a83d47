use tracing::{error, info, warn};

use filedepot::file::{FileStorage, TaskQueue};
use filedepot::web::{AppState, WebServer};
use filedepot::{Config, Database};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load_with_env("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    // Initialize logging
    if let Err(e) = filedepot::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        filedepot::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = run(config).await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> filedepot::Result<()> {
    config.validate()?;

    info!("filedepot - per-user file storage");

    let db = Database::open(&config.database.path).await?;
    info!("Database opened at {}", config.database.path);

    let storage = FileStorage::new(&config.files.storage_path)?;
    match storage.cleanup_staging() {
        Ok(0) => {}
        Ok(n) => info!(removed = n, "Removed leftover staged uploads"),
        Err(e) => warn!(error = %e, "Failed to clean staging directory"),
    }

    let (tasks, worker) = TaskQueue::start(db.clone());

    let app_state = AppState::new(db, storage, tasks)
        .with_max_file_size(config.files.max_file_size_mb)
        .with_default_quota(config.files.default_quota_mb);
    let server = WebServer::new(&config.server, app_state)?;

    server.run(shutdown_signal()).await?;

    // The router, and with it the last queue handle, is gone once the server
    // returns; the worker drains what is left and exits.
    if let Err(e) = worker.await {
        warn!(error = %e, "Deferred task worker ended abnormally");
    }

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
