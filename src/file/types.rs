//! File metadata types.

use serde::Serialize;

/// Metadata for one uploaded file.
///
/// The row never holds file content; `blob_ref` is an opaque reference into
/// the blob-storage collaborator.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct FileRecord {
    /// Unique file ID.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Opaque blob storage reference.
    pub blob_ref: String,
    /// Organization (or personal workspace) the file belongs to.
    pub org_id: String,
    /// File type label (e.g. "image", "csv", "pdf", "document").
    pub kind: String,
    /// Soft-delete flag. True means pending permanent deletion.
    pub should_delete: bool,
    /// When the file was soft-deleted (cleared on restore).
    pub deleted_at: Option<String>,
    /// When the file record was created.
    pub created_at: String,
}

/// Data for creating a new file record.
#[derive(Debug, Clone)]
pub struct NewFileRecord {
    /// Display name.
    pub name: String,
    /// Opaque blob storage reference.
    pub blob_ref: String,
    /// Target organization.
    pub org_id: String,
    /// File type label.
    pub kind: String,
}
