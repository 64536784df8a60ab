//! Background purge sweeper.
//!
//! Files marked `should_delete` are invisible to normal listings but stay
//! in the database so they can be restored. This task makes the deletion
//! permanent once the grace period has passed, erasing the row and the
//! blob. It runs entirely outside the core's request transactions.

use std::sync::Arc;

use tokio::time::{interval, Duration};
use tracing::{debug, error, info};

use crate::drive::DriveService;

/// Default sweep interval in seconds (5 minutes).
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 300;

/// Periodic purger of soft-deleted files.
pub struct PurgeSweeper {
    service: Arc<DriveService>,
    sweep_interval: Duration,
    grace_secs: u64,
}

impl PurgeSweeper {
    /// Create a new sweeper with the default interval.
    pub fn new(service: Arc<DriveService>, grace_secs: u64) -> Self {
        Self {
            service,
            sweep_interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
            grace_secs,
        }
    }

    /// Create a new sweeper with a custom interval.
    pub fn with_interval(service: Arc<DriveService>, interval_secs: u64, grace_secs: u64) -> Self {
        Self {
            service,
            sweep_interval: Duration::from_secs(interval_secs),
            grace_secs,
        }
    }

    /// Run the sweeper loop indefinitely.
    pub async fn run(&self) {
        info!(
            "Purge sweeper started (interval: {}s, grace: {}s)",
            self.sweep_interval.as_secs(),
            self.grace_secs
        );

        let mut timer = interval(self.sweep_interval);

        loop {
            timer.tick().await;
            self.sweep_once().await;
        }
    }

    /// Run a single sweep pass.
    pub async fn sweep_once(&self) {
        match self.service.purge_pending(self.grace_secs).await {
            Ok(0) => debug!("No files due for purge"),
            Ok(n) => info!("Purged {} file(s)", n),
            Err(e) => error!("Purge pass failed: {}", e),
        }
    }
}
