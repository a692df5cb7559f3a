//! API route configuration.
//!
//! Owner routes require an access token via [`crate::api::middleware::auth`];
//! the redirect is public. `GET` and `DELETE` on `/short/{alias}` share one
//! path, so the two route sets are merged rather than nested.

use crate::api::handlers::{
    analytics_handler, delete_link_handler, redirect_handler, shorten_handler, user_urls_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post},
};

/// Routes that need an authenticated owner.
///
/// # Endpoints
///
/// - `POST   /short/shortURL`     - Create a short link
/// - `GET    /short/getUserUrls`  - List the caller's links
/// - `DELETE /short/{id}`         - Delete one of the caller's links
/// - `GET    /analytics/{alias}`  - Analytics for one of the caller's links
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/short/shortURL", post(shorten_handler))
        .route("/short/getUserUrls", get(user_urls_handler))
        .route("/short/{alias}", delete(delete_link_handler))
        .route("/analytics/{alias}", get(analytics_handler))
}

/// Routes open to anyone.
///
/// # Endpoints
///
/// - `GET /short/{alias}` - Redirect to the long URL
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/short/{alias}", get(redirect_handler))
}
