//! Handler for link shortening endpoint.

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::info;
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::api::middleware::auth::CurrentUser;
use crate::application::services::CreateOutcome;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link for the authenticated user.
///
/// # Endpoint
///
/// `POST /api/short/shortURL`
///
/// # Request Body
///
/// ```json
/// { "longUrl": "https://example.com", "customAlias": "promo", "topic": "news" }
/// ```
///
/// # Responses
///
/// - **201 Created**: `{ "shortUrl": "...", "createdAt": "..." }`
/// - **200 OK**: the caller already shortened this URL:
///   `{ "shortUrl": "...", "message": "Long URL already exists" }`
///
/// # Errors
///
/// Returns 400 for missing fields, a malformed alias, or an alias that is
/// already taken.
pub async fn shorten_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<ShortenRequest>,
) -> Result<Response, AppError> {
    payload.validate()?;

    let outcome = state
        .link_service
        .create_short_link(
            &user.id,
            payload.long_url,
            payload.custom_alias,
            payload.topic,
        )
        .await?;

    let short_url = state.link_service.short_url(&outcome.link().alias);

    let response = match outcome {
        CreateOutcome::Created(link) => {
            info!(alias = %link.alias, owner = %user.id, "Short link created");
            (
                StatusCode::CREATED,
                Json(ShortenResponse::Created {
                    short_url,
                    created_at: link.created_at,
                }),
            )
        }
        CreateOutcome::Existing(_) => (
            StatusCode::OK,
            Json(ShortenResponse::Existing {
                short_url,
                message: "Long URL already exists".to_string(),
            }),
        ),
    };

    Ok(response.into_response())
}
