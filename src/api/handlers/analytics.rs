//! Handler for per-link analytics.

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::api::dto::analytics::AnalyticsResponse;
use crate::api::middleware::auth::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

/// Returns click analytics for one of the caller's links.
///
/// # Endpoint
///
/// `GET /api/analytics/{alias}`
///
/// # Response
///
/// ```json
/// {
///   "alias": "promo",
///   "shortUrl": "http://localhost:3000/api/short/promo",
///   "totalClicks": 3,
///   "uniqueClicks": 2,
///   "clicksByDate": [{ "date": "2025-06-01", "clicks": 3 }],
///   "osType": [{ "osName": "Windows 10", "uniqueClicks": 3, "uniqueUsers": 3 }],
///   "deviceType": [{ "deviceName": "pc", "uniqueClicks": 3, "uniqueUsers": 3 }]
/// }
/// ```
///
/// # Errors
///
/// Returns 404 Not Found if the alias is unknown or owned by someone else.
pub async fn analytics_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(alias): Path<String>,
) -> Result<Json<AnalyticsResponse>, AppError> {
    let report = state
        .analytics_service
        .get_link_analytics(&user.id, &alias)
        .await?;

    let short_url = state.link_service.short_url(&report.link.alias);

    Ok(Json(AnalyticsResponse::new(
        report.link.alias,
        short_url,
        report.analytics,
    )))
}
