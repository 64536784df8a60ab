//! Access control for org-scoped operations.
//!
//! Every caller-facing operation receives the caller identity as an explicit
//! `Option<&CallerIdentity>` and checks authentication strictly before
//! authorization. The org/personal dual meaning of a scope id is resolved
//! once, at the boundary, into a [`Scope`].

use serde::Serialize;

use crate::user::User;
use crate::{DriveError, Result};

/// The authenticated principal making a request.
///
/// An opaque stable string supplied by the identity provider; the core
/// never issues or validates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallerIdentity(pub String);

impl CallerIdentity {
    /// Create a caller identity from a token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Get the raw token string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CallerIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The tenant boundary a request operates under.
///
/// An org id in a request either names a shared organization the user
/// belongs to, or the user's own identity acting as a single-person
/// workspace. Resolving the distinction here keeps the equality check out
/// of every call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// A shared organization the user is a member of.
    Org(String),
    /// The user's personal workspace, keyed by their own identity token.
    Personal(String),
}

impl Scope {
    /// Resolve an org id against a user's memberships.
    ///
    /// Returns None when the user has no access to the scope.
    pub fn resolve(user: &User, org_id: &str) -> Option<Scope> {
        if user.org_ids.iter().any(|m| m.org_id == org_id) {
            return Some(Scope::Org(org_id.to_string()));
        }
        if user.token_identifier == org_id {
            return Some(Scope::Personal(org_id.to_string()));
        }
        None
    }

    /// The raw scope key, as stored on files and favorites.
    pub fn key(&self) -> &str {
        match self {
            Scope::Org(key) | Scope::Personal(key) => key,
        }
    }
}

/// Require a caller identity, failing with Unauthenticated otherwise.
pub fn require_identity<'a>(
    caller: Option<&'a CallerIdentity>,
    action: &str,
) -> Result<&'a CallerIdentity> {
    caller.ok_or_else(|| DriveError::Unauthenticated(format!("you must be logged in to {action}")))
}

/// Require that the user has access to the given org id.
pub fn require_scope(user: &User, org_id: &str) -> Result<Scope> {
    Scope::resolve(user, org_id)
        .ok_or_else(|| DriveError::Unauthorized("you do not have access to this org".to_string()))
}
