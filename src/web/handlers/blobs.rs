//! Blob upload and download handlers.
//!
//! Uploads go through one-time URLs issued by the files API; downloads are
//! the targets of the display URLs resolved in file listings.

use axum::{
    body::{Body, Bytes},
    extract::{Path, Query, State},
    http::{header, HeaderMap},
    response::Response,
    Json,
};
use std::sync::Arc;

use crate::web::dto::{ApiResponse, BlobRefResponse};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// Query parameters for blob downloads.
#[derive(Debug, serde::Deserialize)]
pub struct DownloadQuery {
    /// Display filename for the Content-Disposition header.
    pub name: Option<String>,
}

/// Generate a safe Content-Disposition header value.
///
/// Strips control characters (header injection) and uses RFC 5987 encoding
/// for non-ASCII filenames.
fn content_disposition_header(filename: &str) -> String {
    let sanitized: String = filename
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            '"' | '\\' => '_',
            _ => c,
        })
        .collect();

    if filename.is_ascii() && !filename.chars().any(|c| c.is_control() || c == '"' || c == '\\') {
        return format!("inline; filename=\"{filename}\"");
    }

    let encoded = urlencoding::encode(filename);

    format!("inline; filename=\"{sanitized}\"; filename*=UTF-8''{encoded}")
}

/// PUT /api/blobs/upload/:token - Upload bytes against a one-time token.
pub async fn upload_blob(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ApiResponse<BlobRefResponse>>, ApiError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream");

    let blob_ref = state.service.store_blob(&token, &body, content_type).await?;

    Ok(Json(ApiResponse::new(BlobRefResponse { blob_ref })))
}

/// GET /api/blobs/:ref - Serve blob bytes.
///
/// The opaque reference is the capability: listings only resolve URLs for
/// files the caller was authorized to see.
pub async fn download_blob(
    State(state): State<Arc<AppState>>,
    Path(blob_ref): Path<String>,
    Query(query): Query<DownloadQuery>,
) -> Result<Response, ApiError> {
    let content = state.service.load_blob(&blob_ref).await?;

    let content_type = mime_guess::from_path(&blob_ref)
        .first_or_octet_stream()
        .to_string();

    let disposition = content_disposition_header(query.name.as_deref().unwrap_or(&blob_ref));

    Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_DISPOSITION, disposition)
        .body(Body::from(content))
        .map_err(|e| ApiError::internal(e.to_string()))
}
