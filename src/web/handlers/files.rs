//! File and favorite handlers.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;
use validator::Validate;

use crate::drive::FileFilter;
use crate::file::NewFileRecord;
use crate::web::dto::{
    ApiResponse, CreateFileRequest, CreatedFileResponse, FavoriteResponse, FavoritesQuery,
    FileResponse, ListFilesQuery, ToggleFavoriteResponse, UploadUrlResponse,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::identity::Identity;

/// POST /api/files/upload-url - Request a one-time upload URL.
pub async fn generate_upload_url(
    State(state): State<Arc<AppState>>,
    Identity(caller): Identity,
) -> Result<Json<ApiResponse<UploadUrlResponse>>, ApiError> {
    let url = state.service.generate_upload_url(caller.as_ref()).await?;

    Ok(Json(ApiResponse::new(UploadUrlResponse { url })))
}

/// POST /api/files - Create a file record.
pub async fn create_file(
    State(state): State<Arc<AppState>>,
    Identity(caller): Identity,
    Json(request): Json<CreateFileRequest>,
) -> Result<Json<ApiResponse<CreatedFileResponse>>, ApiError> {
    request
        .validate()
        .map_err(ApiError::from_validation_errors)?;

    let file = state
        .service
        .create_file(
            caller.as_ref(),
            NewFileRecord {
                name: request.name,
                blob_ref: request.blob_ref,
                org_id: request.org_id,
                kind: request.kind,
            },
        )
        .await?;

    Ok(Json(ApiResponse::new(CreatedFileResponse {
        id: file.id,
        name: file.name,
        kind: file.kind,
        org_id: file.org_id,
    })))
}

/// GET /api/files - List an org's files with filters.
pub async fn get_files(
    State(state): State<Arc<AppState>>,
    Identity(caller): Identity,
    Query(query): Query<ListFilesQuery>,
) -> Result<Json<ApiResponse<Vec<FileResponse>>>, ApiError> {
    let filter = FileFilter {
        query: query.query,
        kind: query.kind,
        favorites_only: query.favorites,
        deleted_only: query.deleted,
    };

    let listings = state
        .service
        .get_files(caller.as_ref(), &query.org_id, &filter)
        .await?;

    let responses = listings.into_iter().map(FileResponse::from).collect();

    Ok(Json(ApiResponse::new(responses)))
}

/// DELETE /api/files/:id - Soft-delete a file.
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    Identity(caller): Identity,
    Path(file_id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.service.delete_file(caller.as_ref(), file_id).await?;

    Ok(Json(ApiResponse::new(())))
}

/// POST /api/files/:id/restore - Restore a soft-deleted file.
pub async fn restore_file(
    State(state): State<Arc<AppState>>,
    Identity(caller): Identity,
    Path(file_id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.service.restore_file(caller.as_ref(), file_id).await?;

    Ok(Json(ApiResponse::new(())))
}

/// POST /api/files/:id/favorite - Toggle the caller's favorite.
pub async fn toggle_favorite(
    State(state): State<Arc<AppState>>,
    Identity(caller): Identity,
    Path(file_id): Path<i64>,
) -> Result<Json<ApiResponse<ToggleFavoriteResponse>>, ApiError> {
    let favorited = state
        .service
        .toggle_favorite(caller.as_ref(), file_id)
        .await?;

    Ok(Json(ApiResponse::new(ToggleFavoriteResponse { favorited })))
}

/// GET /api/favorites - List the caller's favorites in an org.
pub async fn get_all_favorites(
    State(state): State<Arc<AppState>>,
    Identity(caller): Identity,
    Query(query): Query<FavoritesQuery>,
) -> Result<Json<ApiResponse<Vec<FavoriteResponse>>>, ApiError> {
    let favorites = state
        .service
        .get_all_favorites(caller.as_ref(), &query.org_id)
        .await?;

    let responses = favorites.into_iter().map(FavoriteResponse::from).collect();

    Ok(Json(ApiResponse::new(responses)))
}
