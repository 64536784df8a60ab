//! Request and response DTOs for the Web API.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::drive::FileListing;
use crate::favorite::Favorite;
use crate::user::{OrgMembership, OrgRole, User, UserProfile};

/// Standard success envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// Response payload.
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// Wrap a payload.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

// ---- Requests ----

/// POST /api/files request body.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateFileRequest {
    /// Display name.
    #[validate(length(min = 1, max = 255, message = "name must be 1-255 characters"))]
    pub name: String,
    /// Opaque blob reference returned by the upload endpoint.
    #[validate(length(min = 1, message = "blob_ref is required"))]
    pub blob_ref: String,
    /// Target organization id.
    #[validate(length(min = 1, message = "org_id is required"))]
    pub org_id: String,
    /// File type label.
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 64, message = "type must be 1-64 characters"))]
    pub kind: String,
}

/// GET /api/files query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ListFilesQuery {
    /// Target organization id.
    pub org_id: String,
    /// Substring to match against file names.
    pub query: Option<String>,
    /// Exact file type filter.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Restrict to the caller's favorites.
    #[serde(default)]
    pub favorites: bool,
    /// Show the soft-deleted view.
    #[serde(default)]
    pub deleted: bool,
}

/// GET /api/favorites query parameters.
#[derive(Debug, Deserialize)]
pub struct FavoritesQuery {
    /// Target organization id.
    pub org_id: String,
}

/// Identity-provider webhook event.
///
/// Mirrors the sign-in pipeline: user creation/update and org membership
/// creation/update.
#[derive(Debug, Deserialize)]
pub struct IdentityEvent {
    /// Event type, e.g. "user.created".
    #[serde(rename = "type")]
    pub event: String,
    /// Event payload.
    pub data: IdentityEventData,
}

/// Payload of an identity event. Fields are event-dependent.
#[derive(Debug, Deserialize)]
pub struct IdentityEventData {
    /// Stable opaque identity string.
    pub token_identifier: String,
    /// Display name (user events).
    #[serde(default)]
    pub name: String,
    /// Profile image URL (user events).
    #[serde(default)]
    pub image: String,
    /// Organization id (membership events).
    pub org_id: Option<String>,
    /// Role (membership events).
    pub role: Option<OrgRole>,
}

// ---- Responses ----

/// A user as exposed over the API.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// User ID.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Profile image URL.
    pub image: String,
    /// Organization memberships.
    pub org_ids: Vec<OrgMembership>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            image: user.image,
            org_ids: user.org_ids,
        }
    }
}

/// Public profile projection.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    /// Display name.
    pub name: String,
    /// Profile image URL.
    pub image: String,
}

impl From<UserProfile> for ProfileResponse {
    fn from(profile: UserProfile) -> Self {
        Self {
            name: profile.name,
            image: profile.image,
        }
    }
}

/// One file in a listing.
#[derive(Debug, Serialize)]
pub struct FileResponse {
    /// File ID.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// File type label.
    #[serde(rename = "type")]
    pub kind: String,
    /// Owning organization.
    pub org_id: String,
    /// Soft-delete flag.
    pub should_delete: bool,
    /// Resolved display URL, null when the blob is missing.
    pub url: Option<String>,
    /// Whether the caller has favorited the file.
    pub is_favorited: bool,
    /// Creation timestamp.
    pub created_at: String,
}

impl From<FileListing> for FileResponse {
    fn from(listing: FileListing) -> Self {
        Self {
            id: listing.file.id,
            name: listing.file.name,
            kind: listing.file.kind,
            org_id: listing.file.org_id,
            should_delete: listing.file.should_delete,
            url: listing.url,
            is_favorited: listing.is_favorited,
            created_at: listing.file.created_at,
        }
    }
}

/// A newly created file record.
#[derive(Debug, Serialize)]
pub struct CreatedFileResponse {
    /// File ID.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// File type label.
    #[serde(rename = "type")]
    pub kind: String,
    /// Owning organization.
    pub org_id: String,
}

/// A favorite marker.
#[derive(Debug, Serialize)]
pub struct FavoriteResponse {
    /// Favorite ID.
    pub id: i64,
    /// Favoriting user.
    pub user_id: i64,
    /// Org context.
    pub org_id: String,
    /// Favorited file.
    pub file_id: i64,
}

impl From<Favorite> for FavoriteResponse {
    fn from(favorite: Favorite) -> Self {
        Self {
            id: favorite.id,
            user_id: favorite.user_id,
            org_id: favorite.org_id,
            file_id: favorite.file_id,
        }
    }
}

/// POST /api/files/upload-url response.
#[derive(Debug, Serialize)]
pub struct UploadUrlResponse {
    /// One-time upload URL.
    pub url: String,
}

/// PUT /api/blobs/upload/{token} response.
#[derive(Debug, Serialize)]
pub struct BlobRefResponse {
    /// Opaque blob reference to persist via file creation.
    pub blob_ref: String,
}

/// POST /api/files/{id}/favorite response.
#[derive(Debug, Serialize)]
pub struct ToggleFavoriteResponse {
    /// Whether the file is favorited after the toggle.
    pub favorited: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_create_file_request_valid() {
        let req = CreateFileRequest {
            name: "test-file".to_string(),
            blob_ref: "abc123.bin".to_string(),
            org_id: "org-123".to_string(),
            kind: "document".to_string(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_file_request_empty_name() {
        let req = CreateFileRequest {
            name: String::new(),
            blob_ref: "abc123.bin".to_string(),
            org_id: "org-123".to_string(),
            kind: "document".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_file_request_type_alias() {
        let req: CreateFileRequest = serde_json::from_str(
            r#"{"name":"a","blob_ref":"b","org_id":"c","type":"image"}"#,
        )
        .unwrap();
        assert_eq!(req.kind, "image");
    }

    #[test]
    fn test_identity_event_parsing() {
        let event: IdentityEvent = serde_json::from_str(
            r#"{
                "type": "organizationMembership.created",
                "data": {"token_identifier": "user-token", "org_id": "org-123", "role": "member"}
            }"#,
        )
        .unwrap();
        assert_eq!(event.event, "organizationMembership.created");
        assert_eq!(event.data.org_id.as_deref(), Some("org-123"));
        assert_eq!(event.data.role, Some(OrgRole::Member));
    }
}
