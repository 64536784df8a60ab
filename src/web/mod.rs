//! Web API module for orgdrive.
//!
//! REST surface over the drive service, plus the identity-provider
//! webhook and blob upload/download endpoints.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use identity::Identity;
pub use router::create_router;
pub use server::WebServer;
