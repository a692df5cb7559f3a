//! Handlers for the owner's link listing and deletion.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde_json::json;
use tracing::info;

use crate::api::dto::links::{MessageResponse, UserUrlItem, UserUrlsResponse};
use crate::api::middleware::auth::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

/// Lists the caller's links, newest first.
///
/// # Endpoint
///
/// `GET /api/short/getUserUrls`
///
/// # Errors
///
/// Returns 404 Not Found when the caller has no links.
pub async fn user_urls_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<UserUrlsResponse>, AppError> {
    let links = state.link_service.list_user_links(&user.id).await?;

    let urls = links
        .into_iter()
        .map(|link| UserUrlItem {
            id: link.id,
            short_url: state.link_service.short_url(&link.alias),
            long_url: link.long_url,
            alias: link.alias,
            topic: link.topic,
            created_at: link.created_at,
        })
        .collect();

    Ok(Json(UserUrlsResponse { urls }))
}

/// Deletes one of the caller's links together with its analytics.
///
/// # Endpoint
///
/// `DELETE /api/short/{id}`
///
/// The path segment shares its route with the public redirect, so it is
/// received as a string; anything that is not a link id is a 404.
///
/// # Errors
///
/// Returns 404 Not Found if the id is unknown or owned by someone else.
pub async fn delete_link_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id: i64 = id
        .parse()
        .map_err(|_| AppError::not_found("URL not found", json!({ "id": id })))?;

    let link = state.link_service.delete_link(&user.id, id).await?;
    info!(alias = %link.alias, owner = %user.id, "Short link deleted");

    Ok(Json(MessageResponse {
        message: "URL deleted successfully".to_string(),
    }))
}
