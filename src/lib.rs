//! orgdrive - multi-tenant file-sharing backend.
//!
//! Users belong to organizations; files and favorites are partitioned by
//! org (or by a user's personal workspace). The core service enforces
//! authentication and org-scoped access on every operation, with soft
//! delete/restore semantics and a background purge sweeper.

pub mod access;
pub mod config;
pub mod db;
pub mod drive;
pub mod error;
pub mod favorite;
pub mod file;
pub mod logging;
pub mod storage;
pub mod user;
pub mod web;

pub use access::{CallerIdentity, Scope};
pub use config::Config;
pub use db::Database;
pub use drive::{DriveService, FileFilter, FileListing, PurgeSweeper, ServiceOptions};
pub use error::{DriveError, Result};
pub use favorite::{Favorite, FavoriteRepository};
pub use file::{FileRecord, FileRepository, NewFileRecord};
pub use storage::{BlobStorage, LocalBlobStorage};
pub use user::{NewUser, OrgMembership, OrgRole, User, UserProfile, UserRepository};
pub use web::WebServer;
