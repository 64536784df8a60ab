//! User entity types.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Role a user holds within an organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum OrgRole {
    /// Regular organization member.
    Member,
    /// Organization administrator.
    Admin,
}

impl OrgRole {
    /// Get the string representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrgRole::Member => "member",
            OrgRole::Admin => "admin",
        }
    }
}

impl FromStr for OrgRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "member" => Ok(OrgRole::Member),
            "admin" => Ok(OrgRole::Admin),
            _ => Err(format!("unknown role: {s}")),
        }
    }
}

impl std::fmt::Display for OrgRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user's membership in one organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct OrgMembership {
    /// Organization identifier (opaque, issued by the identity provider).
    pub org_id: String,
    /// Role within the organization.
    pub role: OrgRole,
}

/// A registered user.
///
/// Memberships are loaded alongside the row in insertion order.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: i64,
    /// Stable opaque identity string from the identity provider.
    pub token_identifier: String,
    /// Display name.
    pub name: String,
    /// Profile image URL.
    pub image: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Organization memberships, at most one per org.
    #[sqlx(skip)]
    pub org_ids: Vec<OrgMembership>,
}

/// Data for creating a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Stable opaque identity string.
    pub token_identifier: String,
    /// Display name.
    pub name: String,
    /// Profile image URL.
    pub image: String,
}

/// Public projection of a user's non-sensitive fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    /// Display name.
    pub name: String,
    /// Profile image URL.
    pub image: String,
}
