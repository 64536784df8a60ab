//! One-time upload token repository.
//!
//! Upload URLs returned by `generate_upload_url` embed a short-lived token.
//! The upload endpoint consumes the token exactly once; a second upload with
//! the same token is rejected.

use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{DriveError, Result};

/// Timestamp format compatible with SQLite's datetime('now').
const SQLITE_DATETIME: &str = "%Y-%m-%d %H:%M:%S";

/// One-time upload token entity.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UploadToken {
    /// Token ID.
    pub id: i64,
    /// Token string (embedded in the upload URL).
    pub token: String,
    /// Identity the token was issued to.
    pub token_identifier: String,
    /// Expiration timestamp.
    pub expires_at: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Used timestamp (None if not yet consumed).
    pub used_at: Option<String>,
}

impl UploadToken {
    /// Check if the token has been consumed.
    pub fn is_used(&self) -> bool {
        self.used_at.is_some()
    }
}

/// New upload token for creation.
pub struct NewUploadToken {
    /// Identity the token is issued to.
    pub token_identifier: String,
    /// Time to live in seconds.
    pub ttl_secs: u64,
}

/// Repository for upload token operations.
pub struct UploadTokenRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UploadTokenRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Issue a new upload token.
    pub async fn issue(&self, new_token: &NewUploadToken) -> Result<UploadToken> {
        let token = Uuid::new_v4().simple().to_string();
        let expires_at = (Utc::now() + Duration::seconds(new_token.ttl_secs as i64))
            .format(SQLITE_DATETIME)
            .to_string();

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO upload_tokens (token, token_identifier, expires_at)
             VALUES (?, ?, ?) RETURNING id",
        )
        .bind(&token)
        .bind(&new_token.token_identifier)
        .bind(&expires_at)
        .fetch_one(self.pool)
        .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DriveError::NotFound("upload token".to_string()))
    }

    /// Get an upload token by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<UploadToken>> {
        let token = sqlx::query_as::<_, UploadToken>(
            "SELECT id, token, token_identifier, expires_at, created_at, used_at
             FROM upload_tokens WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(token)
    }

    /// Get an upload token by its token string.
    pub async fn get_by_token(&self, token: &str) -> Result<Option<UploadToken>> {
        let token = sqlx::query_as::<_, UploadToken>(
            "SELECT id, token, token_identifier, expires_at, created_at, used_at
             FROM upload_tokens WHERE token = ?",
        )
        .bind(token)
        .fetch_optional(self.pool)
        .await?;

        Ok(token)
    }

    /// Check that a token exists, is unused, and is unexpired, without
    /// consuming it.
    pub async fn is_consumable(&self, token: &str) -> Result<bool> {
        let consumable: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM upload_tokens
             WHERE token = ? AND used_at IS NULL AND expires_at > datetime('now'))",
        )
        .bind(token)
        .fetch_one(self.pool)
        .await?;

        Ok(consumable)
    }

    /// Consume a token: marks it used if it is unused and unexpired.
    ///
    /// Returns the issuing identity on success, None if the token is
    /// unknown, already used, or expired. The single UPDATE makes the
    /// consumption atomic.
    pub async fn consume(&self, token: &str) -> Result<Option<String>> {
        let result = sqlx::query(
            "UPDATE upload_tokens SET used_at = datetime('now')
             WHERE token = ? AND used_at IS NULL AND expires_at > datetime('now')",
        )
        .bind(token)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        Ok(self
            .get_by_token(token)
            .await?
            .map(|t| t.token_identifier))
    }

    /// Delete expired tokens. Returns the number removed.
    pub async fn delete_expired(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM upload_tokens WHERE expires_at <= datetime('now')")
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
