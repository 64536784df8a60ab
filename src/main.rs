use std::sync::Arc;

use tracing::info;

use orgdrive::drive::{DriveService, PurgeSweeper, ServiceOptions};
use orgdrive::storage::LocalBlobStorage;
use orgdrive::web::WebServer;
use orgdrive::{Config, Database, Result};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = match Config::load("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };

    // Initialize logging
    if let Err(e) = orgdrive::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        orgdrive::logging::init_console_only(&config.logging.level);
    }

    info!("orgdrive - multi-tenant file-sharing backend");

    let db = Database::connect(&config.database.path).await?;
    let storage = Arc::new(LocalBlobStorage::new(&config.storage.path)?);
    info!("Blob storage initialized at {}", config.storage.path);

    let service = Arc::new(DriveService::new(
        db.pool().clone(),
        storage,
        ServiceOptions {
            case_insensitive_search: config.search.case_insensitive,
            upload_token_ttl_secs: config.storage.upload_token_ttl_secs,
        },
    ));

    // Purge soft-deleted files in the background
    let sweeper = PurgeSweeper::with_interval(
        service.clone(),
        config.storage.purge_interval_secs,
        config.storage.purge_grace_secs,
    );
    tokio::spawn(async move {
        sweeper.run().await;
    });

    let server = WebServer::new(&config.server, &config.webhook, service)?;
    server.run().await
}
