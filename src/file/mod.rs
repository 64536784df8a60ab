//! Org-scoped file metadata.

mod repository;
mod types;

pub use repository::FileRepository;
pub use types::{FileRecord, NewFileRecord};
