//! Blob storage for orgdrive.
//!
//! The core persists only opaque blob references; this module owns the
//! bytes. [`LocalBlobStorage`] keeps blobs in a sharded directory tree:
//!
//! ```text
//! {base_path}/
//! ├── ab/
//! │   └── ab12cd34567890abcdef123456789012.png
//! ├── cd/
//! │   └── cd90ab1234567890abcdef1234567890.bin
//! └── ...
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::{DriveError, Result};

/// Abstract blob-storage collaborator.
///
/// Failures surface as [`DriveError::Storage`] or I/O errors, except
/// `resolve_url`, which degrades to `None` when the blob is missing.
pub trait BlobStorage: Send + Sync {
    /// Store content, returning an opaque reference.
    fn store(&self, content: &[u8], content_type: &str) -> Result<String>;

    /// Load the content behind a reference.
    fn load(&self, blob_ref: &str) -> Result<Vec<u8>>;

    /// Resolve a display URL for a reference, or None if the blob is gone.
    fn resolve_url(&self, blob_ref: &str) -> Result<Option<String>>;

    /// Delete a blob. Returns true if it existed.
    fn delete(&self, blob_ref: &str) -> Result<bool>;
}

/// Local filesystem blob storage with UUID references.
#[derive(Debug, Clone)]
pub struct LocalBlobStorage {
    /// Base directory for blob storage.
    base_path: PathBuf,
}

impl LocalBlobStorage {
    /// Create a new LocalBlobStorage rooted at the given path.
    ///
    /// The base directory is created if it doesn't exist.
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path)?;

        Ok(Self { base_path })
    }

    /// Get the base path of this storage.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Map a reference to its sharded path.
    fn blob_path(&self, blob_ref: &str) -> PathBuf {
        let shard = &blob_ref[..2.min(blob_ref.len())];
        self.base_path.join(shard).join(blob_ref)
    }

    /// References are generated here and must never carry path components.
    fn validate_ref(blob_ref: &str) -> Result<()> {
        let valid = !blob_ref.is_empty()
            && blob_ref
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
        if !valid {
            return Err(DriveError::Storage(format!(
                "invalid blob reference: {blob_ref}"
            )));
        }
        Ok(())
    }

    /// Pick a file extension for a content type, falling back to "bin".
    fn extension_for(content_type: &str) -> &'static str {
        mime_guess::get_mime_extensions_str(content_type)
            .and_then(|exts| exts.first())
            .copied()
            .unwrap_or("bin")
    }
}

impl BlobStorage for LocalBlobStorage {
    fn store(&self, content: &[u8], content_type: &str) -> Result<String> {
        let ext = Self::extension_for(content_type);
        let blob_ref = format!("{}.{ext}", Uuid::new_v4().simple());

        let path = self.blob_path(&blob_ref);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;

        Ok(blob_ref)
    }

    fn load(&self, blob_ref: &str) -> Result<Vec<u8>> {
        Self::validate_ref(blob_ref)?;

        match fs::read(self.blob_path(blob_ref)) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(DriveError::NotFound(format!("blob {blob_ref}")))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn resolve_url(&self, blob_ref: &str) -> Result<Option<String>> {
        Self::validate_ref(blob_ref)?;

        if self.blob_path(blob_ref).exists() {
            Ok(Some(format!("/api/blobs/{blob_ref}")))
        } else {
            Ok(None)
        }
    }

    fn delete(&self, blob_ref: &str) -> Result<bool> {
        Self::validate_ref(blob_ref)?;

        match fs::remove_file(self.blob_path(blob_ref)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, LocalBlobStorage) {
        let dir = TempDir::new().unwrap();
        let storage = LocalBlobStorage::new(dir.path()).unwrap();
        (dir, storage)
    }

    #[test]
    fn test_store_and_load() {
        let (_dir, storage) = setup();

        let blob_ref = storage.store(b"hello", "text/plain").unwrap();
        assert!(!blob_ref.is_empty());

        let content = storage.load(&blob_ref).unwrap();
        assert_eq!(content, b"hello");
    }

    #[test]
    fn test_store_shards_by_prefix() {
        let (dir, storage) = setup();

        let blob_ref = storage.store(b"data", "application/octet-stream").unwrap();
        let expected = dir.path().join(&blob_ref[..2]).join(&blob_ref);
        assert!(expected.exists());
    }

    #[test]
    fn test_resolve_url() {
        let (_dir, storage) = setup();

        let blob_ref = storage.store(b"data", "text/plain").unwrap();
        let url = storage.resolve_url(&blob_ref).unwrap();
        assert_eq!(url, Some(format!("/api/blobs/{blob_ref}")));
    }

    #[test]
    fn test_resolve_url_missing_blob() {
        let (_dir, storage) = setup();

        let url = storage.resolve_url("deadbeef.bin").unwrap();
        assert!(url.is_none());
    }

    #[test]
    fn test_load_missing_blob() {
        let (_dir, storage) = setup();

        let err = storage.load("deadbeef.bin").unwrap_err();
        assert!(matches!(err, DriveError::NotFound(_)));
    }

    #[test]
    fn test_delete() {
        let (_dir, storage) = setup();

        let blob_ref = storage.store(b"data", "text/plain").unwrap();
        assert!(storage.delete(&blob_ref).unwrap());
        assert!(!storage.delete(&blob_ref).unwrap());
        assert!(storage.resolve_url(&blob_ref).unwrap().is_none());
    }

    #[test]
    fn test_path_traversal_rejected() {
        let (_dir, storage) = setup();

        assert!(storage.load("../etc/passwd").is_err());
        assert!(storage.resolve_url("a/b").is_err());
        assert!(storage.delete("").is_err());
    }
}
