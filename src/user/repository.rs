//! User repository.
//!
//! CRUD over user rows and their organization memberships.

use sqlx::SqlitePool;

use super::types::{NewUser, OrgMembership, OrgRole, User};
use crate::{DriveError, Result};

/// Repository for user and membership operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository with the given pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new user with no memberships.
    ///
    /// Deduplication against an existing token is the identity provider's
    /// contract; a duplicate token violates the UNIQUE constraint.
    pub async fn create(&self, new_user: &NewUser) -> Result<User> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO users (token_identifier, name, image) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(&new_user.token_identifier)
        .bind(&new_user.name)
        .bind(&new_user.image)
        .fetch_one(self.pool)
        .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DriveError::NotFound("user".to_string()))
    }

    /// Get a user by ID, including memberships.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, token_identifier, name, image, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        self.with_memberships(user).await
    }

    /// Get a user by identity token, including memberships.
    pub async fn get_by_token(&self, token_identifier: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, token_identifier, name, image, created_at
             FROM users WHERE token_identifier = ?",
        )
        .bind(token_identifier)
        .fetch_optional(self.pool)
        .await?;

        self.with_memberships(user).await
    }

    /// Overwrite a user's profile fields. Returns false if no such user.
    pub async fn update_profile(
        &self,
        token_identifier: &str,
        name: &str,
        image: &str,
    ) -> Result<bool> {
        let result = sqlx::query("UPDATE users SET name = ?, image = ? WHERE token_identifier = ?")
            .bind(name)
            .bind(image)
            .bind(token_identifier)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Add a membership, or update its role when one already exists for
    /// the organization.
    pub async fn upsert_membership(&self, user_id: i64, org_id: &str, role: OrgRole) -> Result<()> {
        sqlx::query(
            "INSERT INTO org_memberships (user_id, org_id, role) VALUES (?, ?, ?)
             ON CONFLICT(user_id, org_id) DO UPDATE SET role = excluded.role",
        )
        .bind(user_id)
        .bind(org_id)
        .bind(role.as_str())
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Replace the role of an existing membership.
    ///
    /// Returns false when the user has no membership for the organization.
    pub async fn update_membership_role(
        &self,
        user_id: i64,
        org_id: &str,
        role: OrgRole,
    ) -> Result<bool> {
        let result =
            sqlx::query("UPDATE org_memberships SET role = ? WHERE user_id = ? AND org_id = ?")
                .bind(role.as_str())
                .bind(user_id)
                .bind(org_id)
                .execute(self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List a user's memberships in insertion order.
    pub async fn memberships(&self, user_id: i64) -> Result<Vec<OrgMembership>> {
        let memberships = sqlx::query_as::<_, OrgMembership>(
            "SELECT org_id, role FROM org_memberships WHERE user_id = ? ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(memberships)
    }

    async fn with_memberships(&self, user: Option<User>) -> Result<Option<User>> {
        match user {
            Some(mut user) => {
                user.org_ids = self.memberships(user.id).await?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    async fn setup() -> Database {
        Database::connect_in_memory().await.unwrap()
    }

    fn test_user(token: &str) -> NewUser {
        NewUser {
            token_identifier: token.to_string(),
            name: "Test User".to_string(),
            image: "test-image-url".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_by_token() {
        let db = setup().await;
        let repo = UserRepository::new(db.pool());

        let user = repo.create(&test_user("valid-token")).await.unwrap();
        assert_eq!(user.token_identifier, "valid-token");
        assert_eq!(user.name, "Test User");
        assert!(user.org_ids.is_empty());

        let fetched = repo.get_by_token("valid-token").await.unwrap().unwrap();
        assert_eq!(fetched.id, user.id);
    }

    #[tokio::test]
    async fn test_get_by_token_missing() {
        let db = setup().await;
        let repo = UserRepository::new(db.pool());

        let result = repo.get_by_token("invalid-token").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_update_profile() {
        let db = setup().await;
        let repo = UserRepository::new(db.pool());

        repo.create(&test_user("existing-token")).await.unwrap();

        let updated = repo
            .update_profile("existing-token", "Updated Name", "updated-image-url")
            .await
            .unwrap();
        assert!(updated);

        let user = repo.get_by_token("existing-token").await.unwrap().unwrap();
        assert_eq!(user.name, "Updated Name");
        assert_eq!(user.image, "updated-image-url");
    }

    #[tokio::test]
    async fn test_update_profile_missing_user() {
        let db = setup().await;
        let repo = UserRepository::new(db.pool());

        let updated = repo
            .update_profile("no-such-token", "Name", "image")
            .await
            .unwrap();
        assert!(!updated);
    }

    #[tokio::test]
    async fn test_membership_upsert() {
        let db = setup().await;
        let repo = UserRepository::new(db.pool());

        let user = repo.create(&test_user("user-token")).await.unwrap();

        repo.upsert_membership(user.id, "org-123", OrgRole::Member)
            .await
            .unwrap();

        let memberships = repo.memberships(user.id).await.unwrap();
        assert_eq!(
            memberships,
            vec![OrgMembership {
                org_id: "org-123".to_string(),
                role: OrgRole::Member,
            }]
        );

        // Upsert for the same org updates the role instead of duplicating
        repo.upsert_membership(user.id, "org-123", OrgRole::Admin)
            .await
            .unwrap();

        let memberships = repo.memberships(user.id).await.unwrap();
        assert_eq!(memberships.len(), 1);
        assert_eq!(memberships[0].role, OrgRole::Admin);
    }

    #[tokio::test]
    async fn test_update_membership_role() {
        let db = setup().await;
        let repo = UserRepository::new(db.pool());

        let user = repo.create(&test_user("user-token")).await.unwrap();
        repo.upsert_membership(user.id, "org-123", OrgRole::Member)
            .await
            .unwrap();

        let updated = repo
            .update_membership_role(user.id, "org-123", OrgRole::Admin)
            .await
            .unwrap();
        assert!(updated);

        let memberships = repo.memberships(user.id).await.unwrap();
        assert_eq!(memberships[0].role, OrgRole::Admin);
    }

    #[tokio::test]
    async fn test_update_membership_role_missing() {
        let db = setup().await;
        let repo = UserRepository::new(db.pool());

        let user = repo.create(&test_user("user-token")).await.unwrap();
        let updated = repo
            .update_membership_role(user.id, "org-999", OrgRole::Admin)
            .await
            .unwrap();
        assert!(!updated);
    }

    #[tokio::test]
    async fn test_memberships_preserve_insertion_order() {
        let db = setup().await;
        let repo = UserRepository::new(db.pool());

        let user = repo.create(&test_user("user-token")).await.unwrap();
        repo.upsert_membership(user.id, "org-b", OrgRole::Member)
            .await
            .unwrap();
        repo.upsert_membership(user.id, "org-a", OrgRole::Admin)
            .await
            .unwrap();

        let memberships = repo.memberships(user.id).await.unwrap();
        assert_eq!(memberships[0].org_id, "org-b");
        assert_eq!(memberships[1].org_id, "org-a");
    }
}
