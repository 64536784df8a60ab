//! Router configuration for the Web API.

use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{
    create_file, delete_file, download_blob, generate_upload_url, get_all_favorites, get_files,
    get_user_profile, identity_webhook, me, restore_file, toggle_favorite, upload_blob, AppState,
};

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    let file_routes = Router::new()
        .route("/upload-url", post(generate_upload_url))
        .route("/", post(create_file).get(get_files))
        .route("/:id", delete(delete_file))
        .route("/:id/restore", post(restore_file))
        .route("/:id/favorite", post(toggle_favorite));

    let blob_routes = Router::new()
        .route("/upload/:token", put(upload_blob))
        .route("/:blob_ref", get(download_blob));

    let api_routes = Router::new()
        .nest("/files", file_routes)
        .nest("/blobs", blob_routes)
        .route("/favorites", get(get_all_favorites))
        .route("/me", get(me))
        .route("/users/:id/profile", get(get_user_profile))
        .route("/webhooks/identity", post(identity_webhook));

    Router::new()
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins)),
        )
        .with_state(app_state)
}

/// Create a CORS layer from the configured origins.
fn create_cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| o.parse::<HeaderValue>().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
