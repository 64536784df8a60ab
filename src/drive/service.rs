//! Drive service.
//!
//! Every caller-facing operation follows the same sequence: resolve the
//! caller's identity, check access against the target org (or the org
//! resolved from a file id), then read or write through the repositories.
//! Authentication is checked strictly before authorization.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::access::{require_identity, require_scope, CallerIdentity};
use crate::db::{NewUploadToken, UploadTokenRepository};
use crate::favorite::{Favorite, FavoriteRepository};
use crate::file::{FileRecord, FileRepository, NewFileRecord};
use crate::storage::BlobStorage;
use crate::user::{NewUser, OrgRole, User, UserProfile, UserRepository};
use crate::{DriveError, Result};

/// Tunable service behavior.
#[derive(Debug, Clone)]
pub struct ServiceOptions {
    /// Whether name search ignores case.
    pub case_insensitive_search: bool,
    /// Lifetime of issued upload tokens.
    pub upload_token_ttl_secs: u64,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            case_insensitive_search: true,
            upload_token_ttl_secs: 600,
        }
    }
}

/// Filters applied by [`DriveService::get_files`].
#[derive(Debug, Clone, Default)]
pub struct FileFilter {
    /// Substring match against the file name, when non-empty.
    pub query: Option<String>,
    /// Exact match against the file type label.
    pub kind: Option<String>,
    /// Restrict to files the caller has favorited.
    pub favorites_only: bool,
    /// Show the soft-deleted view instead of the active one.
    pub deleted_only: bool,
}

/// One file in a listing, with its resolved URL and the caller's favorite
/// state.
#[derive(Debug, Clone, Serialize)]
pub struct FileListing {
    /// The file record.
    #[serde(flatten)]
    pub file: FileRecord,
    /// Display URL, None when the blob is missing.
    pub url: Option<String>,
    /// Whether the caller has favorited this file.
    pub is_favorited: bool,
}

/// The core service over users, memberships, files, and favorites.
pub struct DriveService {
    pool: SqlitePool,
    storage: Arc<dyn BlobStorage>,
    options: ServiceOptions,
}

impl DriveService {
    /// Create a new service over the given pool and blob storage.
    pub fn new(pool: SqlitePool, storage: Arc<dyn BlobStorage>, options: ServiceOptions) -> Self {
        Self {
            pool,
            storage,
            options,
        }
    }

    fn users(&self) -> UserRepository<'_> {
        UserRepository::new(&self.pool)
    }

    fn files(&self) -> FileRepository<'_> {
        FileRepository::new(&self.pool)
    }

    fn favorites(&self) -> FavoriteRepository<'_> {
        FavoriteRepository::new(&self.pool)
    }

    fn upload_tokens(&self) -> UploadTokenRepository<'_> {
        UploadTokenRepository::new(&self.pool)
    }

    /// Resolve the caller to a registered user, authentication first.
    async fn caller_user(&self, caller: Option<&CallerIdentity>, action: &str) -> Result<User> {
        let identity = require_identity(caller, action)?;
        self.get_user(identity.as_str()).await
    }

    // ---- Identity resolver ----

    /// Look up a user by identity token. Fails with NotFound when the
    /// identity was never registered.
    pub async fn get_user(&self, token_identifier: &str) -> Result<User> {
        self.users()
            .get_by_token(token_identifier)
            .await?
            .ok_or_else(|| DriveError::NotFound("user".to_string()))
    }

    /// Register a new user with no memberships.
    ///
    /// Invoked only by the identity provider's sign-in pipeline.
    pub async fn create_user(&self, new_user: NewUser) -> Result<User> {
        info!("Creating user for identity {}", new_user.token_identifier);
        self.users().create(&new_user).await
    }

    /// Overwrite a user's profile fields.
    pub async fn update_user(&self, token_identifier: &str, name: &str, image: &str) -> Result<()> {
        let updated = self
            .users()
            .update_profile(token_identifier, name, image)
            .await?;
        if !updated {
            return Err(DriveError::NotFound("user".to_string()));
        }
        Ok(())
    }

    /// Return the caller's own user record.
    ///
    /// Lenient on both ends: no identity and an identity with no user row
    /// both yield None.
    pub async fn get_me(&self, caller: Option<&CallerIdentity>) -> Result<Option<User>> {
        let Some(identity) = caller else {
            return Ok(None);
        };

        match self.get_user(identity.as_str()).await {
            Ok(user) => Ok(Some(user)),
            Err(DriveError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Public projection of a user's profile.
    pub async fn get_user_profile(&self, user_id: i64) -> Result<UserProfile> {
        let user = self
            .users()
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| DriveError::NotFound("user".to_string()))?;

        Ok(UserProfile {
            name: user.name,
            image: user.image,
        })
    }

    // ---- Membership manager ----

    /// Add an org membership, upserting the role when one already exists.
    pub async fn add_org_to_user(
        &self,
        token_identifier: &str,
        org_id: &str,
        role: OrgRole,
    ) -> Result<()> {
        let user = self.get_user(token_identifier).await?;
        self.users().upsert_membership(user.id, org_id, role).await
    }

    /// Replace the role of an existing membership.
    pub async fn update_role_in_org(
        &self,
        token_identifier: &str,
        org_id: &str,
        role: OrgRole,
    ) -> Result<()> {
        let user = self.get_user(token_identifier).await?;
        let updated = self
            .users()
            .update_membership_role(user.id, org_id, role)
            .await?;
        if !updated {
            return Err(DriveError::NotFound("membership".to_string()));
        }
        Ok(())
    }

    // ---- File metadata store ----

    /// Request a one-time upload URL.
    ///
    /// Requires an authenticated caller; the target org is chosen later,
    /// when the file record is created.
    pub async fn generate_upload_url(&self, caller: Option<&CallerIdentity>) -> Result<String> {
        let identity = require_identity(caller, "upload a file")?;

        let token = self
            .upload_tokens()
            .issue(&NewUploadToken {
                token_identifier: identity.as_str().to_string(),
                ttl_secs: self.options.upload_token_ttl_secs,
            })
            .await?;

        Ok(format!("/api/blobs/upload/{}", token.token))
    }

    /// Accept uploaded bytes against a one-time token, returning the blob
    /// reference to persist via `create_file`.
    pub async fn store_blob(
        &self,
        upload_token: &str,
        content: &[u8],
        content_type: &str,
    ) -> Result<String> {
        let tokens = self.upload_tokens();

        if !tokens.is_consumable(upload_token).await? {
            return Err(DriveError::Unauthenticated(
                "upload token is invalid or expired".to_string(),
            ));
        }

        // Store before consuming, so a storage failure leaves the token
        // usable for a retry against the same URL.
        let blob_ref = self.storage.store(content, content_type)?;

        let identity = match tokens.consume(upload_token).await? {
            Some(identity) => identity,
            None => {
                // Lost the race against a concurrent upload on the same token
                self.storage.delete(&blob_ref)?;
                return Err(DriveError::Unauthenticated(
                    "upload token is invalid or expired".to_string(),
                ));
            }
        };

        debug!("Stored blob {} for identity {}", blob_ref, identity);
        Ok(blob_ref)
    }

    /// Load the bytes behind a blob reference.
    ///
    /// The reference itself is the capability; it is only ever handed out
    /// through authorized listings and uploads.
    pub async fn load_blob(&self, blob_ref: &str) -> Result<Vec<u8>> {
        self.storage.load(blob_ref)
    }

    /// Create a file record in an org the caller belongs to.
    pub async fn create_file(
        &self,
        caller: Option<&CallerIdentity>,
        new_file: NewFileRecord,
    ) -> Result<FileRecord> {
        let user = self.caller_user(caller, "create a file").await?;
        require_scope(&user, &new_file.org_id)?;

        self.files().create(&new_file).await
    }

    /// List an org's files with filters, resolved URLs, and the caller's
    /// favorite state.
    pub async fn get_files(
        &self,
        caller: Option<&CallerIdentity>,
        org_id: &str,
        filter: &FileFilter,
    ) -> Result<Vec<FileListing>> {
        let user = self.caller_user(caller, "list files").await?;
        let scope = require_scope(&user, org_id)?;

        let files = self.files().list_by_org(scope.key(), filter.deleted_only).await?;

        let favorite_ids: HashSet<i64> = self
            .favorites()
            .list_by_user_org(user.id, scope.key())
            .await?
            .into_iter()
            .map(|f| f.file_id)
            .collect();

        let mut listings = Vec::new();
        for file in files {
            if let Some(query) = filter.query.as_deref() {
                if !query.is_empty() && !self.name_matches(&file.name, query) {
                    continue;
                }
            }
            if let Some(kind) = filter.kind.as_deref() {
                if file.kind != kind {
                    continue;
                }
            }

            let is_favorited = favorite_ids.contains(&file.id);
            if filter.favorites_only && !is_favorited {
                continue;
            }

            let url = self.storage.resolve_url(&file.blob_ref)?;
            listings.push(FileListing {
                file,
                url,
                is_favorited,
            });
        }

        Ok(listings)
    }

    fn name_matches(&self, name: &str, query: &str) -> bool {
        if self.options.case_insensitive_search {
            name.to_lowercase().contains(&query.to_lowercase())
        } else {
            name.contains(query)
        }
    }

    /// Soft-delete a file. Idempotent.
    pub async fn delete_file(&self, caller: Option<&CallerIdentity>, file_id: i64) -> Result<()> {
        self.set_file_deletion(caller, file_id, true, "delete a file")
            .await
    }

    /// Restore a soft-deleted file. Idempotent.
    pub async fn restore_file(&self, caller: Option<&CallerIdentity>, file_id: i64) -> Result<()> {
        self.set_file_deletion(caller, file_id, false, "restore a file")
            .await
    }

    async fn set_file_deletion(
        &self,
        caller: Option<&CallerIdentity>,
        file_id: i64,
        should_delete: bool,
        action: &str,
    ) -> Result<()> {
        let user = self.caller_user(caller, action).await?;

        let file = self
            .files()
            .get_by_id(file_id)
            .await?
            .ok_or_else(|| DriveError::NotFound("file".to_string()))?;

        require_scope(&user, &file.org_id)?;

        self.files().set_should_delete(file.id, should_delete).await?;
        Ok(())
    }

    // ---- Favorites store ----

    /// Toggle the caller's favorite on a file. Returns the new state.
    pub async fn toggle_favorite(
        &self,
        caller: Option<&CallerIdentity>,
        file_id: i64,
    ) -> Result<bool> {
        let user = self.caller_user(caller, "favorite a file").await?;

        let file = self
            .files()
            .get_by_id(file_id)
            .await?
            .ok_or_else(|| DriveError::NotFound("file".to_string()))?;

        let scope = require_scope(&user, &file.org_id)?;

        self.favorites().toggle(user.id, scope.key(), file.id).await
    }

    /// List all of the caller's favorites within an org.
    pub async fn get_all_favorites(
        &self,
        caller: Option<&CallerIdentity>,
        org_id: &str,
    ) -> Result<Vec<Favorite>> {
        let user = self.caller_user(caller, "list favorites").await?;
        let scope = require_scope(&user, org_id)?;

        self.favorites().list_by_user_org(user.id, scope.key()).await
    }

    // ---- Purge hook ----

    /// Permanently erase soft-deleted files older than the grace period,
    /// blobs included. Consumed by the sweeper, never by request handlers.
    pub async fn purge_pending(&self, grace_secs: u64) -> Result<u64> {
        let pending = self.files().list_pending_delete(grace_secs).await?;
        let mut purged = 0;

        for file in pending {
            // The guarded row delete decides: a restore committed after the
            // listing wins, and the blob is only touched once the row is
            // gone and the file can no longer be restored.
            if !self.files().purge(file.id).await? {
                debug!("Skipping file {} ({}), restored since listing", file.id, file.name);
                continue;
            }

            if let Err(e) = self.storage.delete(&file.blob_ref) {
                tracing::error!(
                    "Failed to delete blob {} for purged file {}: {}",
                    file.blob_ref,
                    file.id,
                    e
                );
            }

            debug!("Purged file {} ({})", file.id, file.name);
            purged += 1;
        }

        Ok(purged)
    }
}
