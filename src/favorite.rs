//! Per-user, per-org file favorites.
//!
//! At most one favorite exists per (user, org, file) triple; the UNIQUE
//! index in the schema enforces it even under concurrent toggles.

use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::Result;

/// A user's favorite marker on one file within one org context.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct Favorite {
    /// Unique favorite ID.
    pub id: i64,
    /// The user who favorited.
    pub user_id: i64,
    /// The org context the favorite was made under.
    pub org_id: String,
    /// The favorited file.
    pub file_id: i64,
}

/// Repository for favorite operations.
pub struct FavoriteRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> FavoriteRepository<'a> {
    /// Create a new FavoriteRepository with the given pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Find the favorite for a (user, org, file) triple.
    pub async fn find(&self, user_id: i64, org_id: &str, file_id: i64) -> Result<Option<Favorite>> {
        let favorite = sqlx::query_as::<_, Favorite>(
            "SELECT id, user_id, org_id, file_id FROM favorites
             WHERE user_id = ? AND org_id = ? AND file_id = ?",
        )
        .bind(user_id)
        .bind(org_id)
        .bind(file_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(favorite)
    }

    /// List all favorites for a user within an org, in insertion order.
    pub async fn list_by_user_org(&self, user_id: i64, org_id: &str) -> Result<Vec<Favorite>> {
        let favorites = sqlx::query_as::<_, Favorite>(
            "SELECT id, user_id, org_id, file_id FROM favorites
             WHERE user_id = ? AND org_id = ? ORDER BY id",
        )
        .bind(user_id)
        .bind(org_id)
        .fetch_all(self.pool)
        .await?;

        Ok(favorites)
    }

    /// Toggle the favorite for a triple inside one transaction.
    ///
    /// Inserts when absent, deletes when present. Returns whether the file
    /// is favorited after the call.
    pub async fn toggle(&self, user_id: i64, org_id: &str, file_id: i64) -> Result<bool> {
        let mut tx: Transaction<'_, Sqlite> = self.pool.begin().await?;

        let existing: Option<i64> = sqlx::query_scalar(
            "SELECT id FROM favorites WHERE user_id = ? AND org_id = ? AND file_id = ?",
        )
        .bind(user_id)
        .bind(org_id)
        .bind(file_id)
        .fetch_optional(&mut *tx)
        .await?;

        let now_favorited = match existing {
            Some(id) => {
                sqlx::query("DELETE FROM favorites WHERE id = ?")
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                false
            }
            None => {
                sqlx::query("INSERT INTO favorites (user_id, org_id, file_id) VALUES (?, ?, ?)")
                    .bind(user_id)
                    .bind(org_id)
                    .bind(file_id)
                    .execute(&mut *tx)
                    .await?;
                true
            }
        };

        tx.commit().await?;
        Ok(now_favorited)
    }
}
