//! API handlers for the orgdrive Web API.

pub mod blobs;
pub mod files;
pub mod users;
pub mod webhook;

pub use blobs::*;
pub use files::*;
pub use users::*;
pub use webhook::*;

use std::sync::Arc;

use crate::drive::DriveService;

/// Shared application state for handlers.
pub struct AppState {
    /// The core drive service.
    pub service: Arc<DriveService>,
    /// Shared secret for the identity webhook. Empty disables the check.
    pub webhook_secret: String,
}

impl AppState {
    /// Create new application state.
    pub fn new(service: Arc<DriveService>, webhook_secret: impl Into<String>) -> Self {
        Self {
            service,
            webhook_secret: webhook_secret.into(),
        }
    }
}
