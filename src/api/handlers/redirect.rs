//! Handler for short URL redirect.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use std::net::SocketAddr;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{error, warn};

use crate::domain::click_event::ClickEvent;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::extract_client_ip;
use crate::utils::user_agent::classify;

/// Redirects an alias to its long URL.
///
/// # Endpoint
///
/// `GET /api/short/{alias}`
///
/// # Request Flow
///
/// 1. Resolve the alias (cache first, store on miss)
/// 2. Classify the `User-Agent` into OS and device
/// 3. Queue a click event for the background worker
/// 4. Return 302 Found
///
/// # Click Tracking
///
/// Click events go to a bounded channel. If the queue is full the click is
/// dropped with a warning; the redirect is never delayed by analytics.
///
/// # Errors
///
/// Returns 404 Not Found if the alias doesn't exist.
/// Returns 500 if the stored long URL is not a valid URL.
pub async fn redirect_handler(
    Path(alias): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<impl IntoResponse, AppError> {
    let long_url = state.link_service.resolve_alias(&alias).await?;

    let ua = classify(
        headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok()),
    );
    let ip = extract_client_ip(&headers, addr, state.behind_proxy);

    let event = ClickEvent::new(alias, Some(ip), ua.os_type, ua.device_type);

    match state.click_sender.try_send(event) {
        Ok(()) => {}
        Err(TrySendError::Full(event)) => {
            warn!(alias = %event.alias, "Click queue full, dropping click");
        }
        Err(TrySendError::Closed(event)) => {
            error!(alias = %event.alias, "Click queue closed, dropping click");
        }
    }

    Ok((StatusCode::FOUND, [(header::LOCATION, long_url)]))
}
