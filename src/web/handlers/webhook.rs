//! Identity-provider webhook handler.
//!
//! The provider delivers sign-in pipeline events here; this is the only
//! path that creates or mutates users and memberships. End-user clients
//! never call it.

use axum::{extract::State, http::HeaderMap, Json};
use std::sync::Arc;
use tracing::info;

use crate::user::NewUser;
use crate::web::dto::{ApiResponse, IdentityEvent};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// Header carrying the shared webhook secret.
pub const WEBHOOK_SECRET_HEADER: &str = "x-webhook-secret";

/// POST /api/webhooks/identity - Dispatch an identity event.
pub async fn identity_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(event): Json<IdentityEvent>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if !state.webhook_secret.is_empty() {
        let provided = headers
            .get(WEBHOOK_SECRET_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        if provided != state.webhook_secret {
            return Err(ApiError::unauthorized("invalid webhook secret"));
        }
    }

    info!(
        "Identity event {} for {}",
        event.event, event.data.token_identifier
    );

    let data = event.data;
    match event.event.as_str() {
        "user.created" => {
            state
                .service
                .create_user(NewUser {
                    token_identifier: data.token_identifier,
                    name: data.name,
                    image: data.image,
                })
                .await?;
        }
        "user.updated" => {
            state
                .service
                .update_user(&data.token_identifier, &data.name, &data.image)
                .await?;
        }
        "organizationMembership.created" => {
            let (org_id, role) = membership_fields(data.org_id, data.role)?;
            state
                .service
                .add_org_to_user(&data.token_identifier, &org_id, role)
                .await?;
        }
        "organizationMembership.updated" => {
            let (org_id, role) = membership_fields(data.org_id, data.role)?;
            state
                .service
                .update_role_in_org(&data.token_identifier, &org_id, role)
                .await?;
        }
        other => {
            return Err(ApiError::bad_request(format!(
                "unknown event type: {other}"
            )));
        }
    }

    Ok(Json(ApiResponse::new(())))
}

fn membership_fields(
    org_id: Option<String>,
    role: Option<crate::user::OrgRole>,
) -> Result<(String, crate::user::OrgRole), ApiError> {
    let org_id = org_id.ok_or_else(|| ApiError::bad_request("missing org_id"))?;
    let role = role.ok_or_else(|| ApiError::bad_request("missing role"))?;
    Ok((org_id, role))
}
