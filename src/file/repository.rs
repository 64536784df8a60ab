//! File metadata repository.

use sqlx::SqlitePool;

use super::types::{FileRecord, NewFileRecord};
use crate::{DriveError, Result};

const FILE_COLUMNS: &str =
    "id, name, blob_ref, org_id, kind, should_delete, deleted_at, created_at";

/// Repository for file metadata operations.
pub struct FileRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> FileRepository<'a> {
    /// Create a new FileRepository with the given pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new file record. `should_delete` starts false.
    pub async fn create(&self, new_file: &NewFileRecord) -> Result<FileRecord> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO files (name, blob_ref, org_id, kind) VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(&new_file.name)
        .bind(&new_file.blob_ref)
        .bind(&new_file.org_id)
        .bind(&new_file.kind)
        .fetch_one(self.pool)
        .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DriveError::NotFound("file".to_string()))
    }

    /// Get a file by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<FileRecord>> {
        let file = sqlx::query_as::<_, FileRecord>(&format!(
            "SELECT {FILE_COLUMNS} FROM files WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(file)
    }

    /// List an organization's files, in insertion order.
    ///
    /// `deleted` selects the soft-deleted view; the default listing
    /// excludes files pending deletion.
    pub async fn list_by_org(&self, org_id: &str, deleted: bool) -> Result<Vec<FileRecord>> {
        let files = sqlx::query_as::<_, FileRecord>(&format!(
            "SELECT {FILE_COLUMNS} FROM files WHERE org_id = ? AND should_delete = ? ORDER BY id"
        ))
        .bind(org_id)
        .bind(deleted)
        .fetch_all(self.pool)
        .await?;

        Ok(files)
    }

    /// Set or clear the soft-delete flag. Returns false if no such file.
    ///
    /// Setting the flag stamps `deleted_at`; clearing it removes the stamp.
    /// Both directions are idempotent.
    pub async fn set_should_delete(&self, id: i64, should_delete: bool) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE files
             SET should_delete = ?,
                 deleted_at = CASE WHEN ? THEN datetime('now') ELSE NULL END
             WHERE id = ?",
        )
        .bind(should_delete)
        .bind(should_delete)
        .bind(id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List files pending deletion whose soft delete is older than
    /// `grace_secs` seconds. Consumed by the purge sweeper only.
    pub async fn list_pending_delete(&self, grace_secs: u64) -> Result<Vec<FileRecord>> {
        let files = sqlx::query_as::<_, FileRecord>(&format!(
            "SELECT {FILE_COLUMNS} FROM files
             WHERE should_delete = 1
               AND deleted_at IS NOT NULL
               AND deleted_at <= datetime('now', ?)
             ORDER BY id"
        ))
        .bind(format!("-{grace_secs} seconds"))
        .fetch_all(self.pool)
        .await?;

        Ok(files)
    }

    /// Permanently erase a file row, provided it is still pending deletion.
    ///
    /// Returns false when the row is absent or has been restored since it
    /// was listed; a restore committed between listing and purging must win.
    pub async fn purge(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = ? AND should_delete = 1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    async fn setup() -> Database {
        Database::connect_in_memory().await.unwrap()
    }

    fn test_file(name: &str, org_id: &str) -> NewFileRecord {
        NewFileRecord {
            name: name.to_string(),
            blob_ref: format!("blob-{name}"),
            org_id: org_id.to_string(),
            kind: "document".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let db = setup().await;
        let repo = FileRepository::new(db.pool());

        let file = repo.create(&test_file("test-file", "org-123")).await.unwrap();
        assert_eq!(file.name, "test-file");
        assert_eq!(file.org_id, "org-123");
        assert!(!file.should_delete);
        assert!(file.deleted_at.is_none());

        let fetched = repo.get_by_id(file.id).await.unwrap().unwrap();
        assert_eq!(fetched.blob_ref, "blob-test-file");
    }

    #[tokio::test]
    async fn test_list_by_org_scoping() {
        let db = setup().await;
        let repo = FileRepository::new(db.pool());

        repo.create(&test_file("a", "org-123")).await.unwrap();
        repo.create(&test_file("b", "org-123")).await.unwrap();
        repo.create(&test_file("c", "org-456")).await.unwrap();

        let files = repo.list_by_org("org-123", false).await.unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].name, "a");
        assert_eq!(files[1].name, "b");
    }

    #[tokio::test]
    async fn test_soft_delete_and_restore() {
        let db = setup().await;
        let repo = FileRepository::new(db.pool());

        let file = repo.create(&test_file("test-file", "org-123")).await.unwrap();

        assert!(repo.set_should_delete(file.id, true).await.unwrap());
        let marked = repo.get_by_id(file.id).await.unwrap().unwrap();
        assert!(marked.should_delete);
        assert!(marked.deleted_at.is_some());

        // Deleted files leave the default view and appear in the deleted view
        assert!(repo.list_by_org("org-123", false).await.unwrap().is_empty());
        assert_eq!(repo.list_by_org("org-123", true).await.unwrap().len(), 1);

        assert!(repo.set_should_delete(file.id, false).await.unwrap());
        let restored = repo.get_by_id(file.id).await.unwrap().unwrap();
        assert!(!restored.should_delete);
        assert!(restored.deleted_at.is_none());
    }

    #[tokio::test]
    async fn test_set_should_delete_idempotent() {
        let db = setup().await;
        let repo = FileRepository::new(db.pool());

        let file = repo.create(&test_file("test-file", "org-123")).await.unwrap();

        repo.set_should_delete(file.id, true).await.unwrap();
        repo.set_should_delete(file.id, true).await.unwrap();
        assert!(repo.get_by_id(file.id).await.unwrap().unwrap().should_delete);

        repo.set_should_delete(file.id, false).await.unwrap();
        repo.set_should_delete(file.id, false).await.unwrap();
        assert!(!repo.get_by_id(file.id).await.unwrap().unwrap().should_delete);
    }

    #[tokio::test]
    async fn test_set_should_delete_missing_file() {
        let db = setup().await;
        let repo = FileRepository::new(db.pool());

        assert!(!repo.set_should_delete(999, true).await.unwrap());
    }

    #[tokio::test]
    async fn test_pending_delete_and_purge() {
        let db = setup().await;
        let repo = FileRepository::new(db.pool());

        let file = repo.create(&test_file("test-file", "org-123")).await.unwrap();
        repo.set_should_delete(file.id, true).await.unwrap();

        // Zero grace period surfaces the file immediately
        let pending = repo.list_pending_delete(0).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, file.id);

        // A long grace period hides it
        assert!(repo.list_pending_delete(3600).await.unwrap().is_empty());

        assert!(repo.purge(file.id).await.unwrap());
        assert!(repo.get_by_id(file.id).await.unwrap().is_none());
        assert!(!repo.purge(file.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_purge_skips_restored_file() {
        let db = setup().await;
        let repo = FileRepository::new(db.pool());

        let file = repo.create(&test_file("test-file", "org-123")).await.unwrap();
        repo.set_should_delete(file.id, true).await.unwrap();

        let pending = repo.list_pending_delete(0).await.unwrap();
        assert_eq!(pending.len(), 1);

        // A restore committed after the listing must win over the purge
        repo.set_should_delete(file.id, false).await.unwrap();

        assert!(!repo.purge(file.id).await.unwrap());
        let restored = repo.get_by_id(file.id).await.unwrap().unwrap();
        assert!(!restored.should_delete);
    }

    #[tokio::test]
    async fn test_purge_rejects_active_file() {
        let db = setup().await;
        let repo = FileRepository::new(db.pool());

        let file = repo.create(&test_file("test-file", "org-123")).await.unwrap();

        assert!(!repo.purge(file.id).await.unwrap());
        assert!(repo.get_by_id(file.id).await.unwrap().is_some());
    }
}
