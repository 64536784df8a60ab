//! Core drive service: identity, membership, files, and favorites behind
//! one access-controlled surface.

mod service;
mod sweeper;

pub use service::{DriveService, FileFilter, FileListing, ServiceOptions};
pub use sweeper::PurgeSweeper;
