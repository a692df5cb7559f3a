//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`  - Health check: store, cache, click queue (public)
//! - `/api/*`        - Redirect (public) and owner API (access token required)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Authentication** - HS256 access token, header or cookie
//! - **CORS** - Optional single allowed origin with credentials
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{auth, tracing};
use crate::state::AppState;
use anyhow::{Context, Result};
use axum::http::{HeaderValue, Method, header};
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::cors::CorsLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Builds the routed application without path normalization.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `cors_origin` - browser origin allowed to call the API with
///   credentials; `None` disables CORS headers
///
/// # Errors
///
/// Returns an error if `cors_origin` is not a valid header value.
pub fn build_router(state: AppState, cors_origin: Option<&str>) -> Result<Router> {
    let protected = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    let api_router = Router::new()
        .merge(protected)
        .merge(api::routes::public_routes());

    let mut router = Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .with_state(state)
        .layer(tracing::layer());

    if let Some(origin) = cors_origin {
        let origin = HeaderValue::from_str(origin)
            .with_context(|| format!("Invalid CORS origin: {origin}"))?;

        router = router.layer(
            CorsLayer::new()
                .allow_origin(origin)
                .allow_methods([Method::GET, Method::POST, Method::DELETE])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
                .allow_credentials(true),
        );
    }

    Ok(router)
}

/// Constructs the application router with all routes and middleware.
///
/// Wraps [`build_router`] so that `/api/short/abc/` and `/api/short/abc`
/// reach the same handler.
pub fn app_router(state: AppState, cors_origin: Option<&str>) -> Result<NormalizePath<Router>> {
    let router = build_router(state, cors_origin)?;
    Ok(NormalizePathLayer::trim_trailing_slash().layer(router))
}
