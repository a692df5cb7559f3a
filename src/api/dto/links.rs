//! DTOs for link listing and deletion.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Links owned by the caller.
#[derive(Debug, Serialize)]
pub struct UserUrlsResponse {
    pub urls: Vec<UserUrlItem>,
}

/// One link in a listing; analytics are not included.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUrlItem {
    pub id: i64,
    pub short_url: String,
    pub long_url: String,
    pub alias: String,
    pub topic: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
