//! User handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::web::dto::{ApiResponse, ProfileResponse, UserResponse};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::identity::Identity;

/// GET /api/me - The caller's own user record.
///
/// Returns null data for unauthenticated callers and for authenticated
/// callers whose identity has no profile yet.
pub async fn me(
    State(state): State<Arc<AppState>>,
    Identity(caller): Identity,
) -> Result<Json<ApiResponse<Option<UserResponse>>>, ApiError> {
    let user = state.service.get_me(caller.as_ref()).await?;

    Ok(Json(ApiResponse::new(user.map(UserResponse::from))))
}

/// GET /api/users/:id/profile - Public profile projection.
pub async fn get_user_profile(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<Json<ApiResponse<ProfileResponse>>, ApiError> {
    let profile = state.service.get_user_profile(user_id).await?;

    Ok(Json(ApiResponse::new(ProfileResponse::from(profile))))
}
