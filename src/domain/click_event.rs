//! Click event model for asynchronous click tracking.

use chrono::{DateTime, Utc};

use crate::domain::entities::NewClick;

/// An in-memory representation of a redirect for async processing.
///
/// Built by the redirect handler after user-agent classification and sent
/// through a bounded channel to
/// [`crate::domain::click_worker::run_click_worker`]. The timestamp is taken
/// when the redirect happens, so queueing delay never moves a click into a
/// different day bucket.
#[derive(Debug, Clone)]
pub struct ClickEvent {
    pub alias: String,
    pub ip: Option<String>,
    pub os_type: String,
    pub device_type: String,
    pub clicked_at: DateTime<Utc>,
}

impl ClickEvent {
    /// Creates a click event stamped with the current time.
    pub fn new(
        alias: String,
        ip: Option<String>,
        os_type: impl Into<String>,
        device_type: impl Into<String>,
    ) -> Self {
        Self {
            alias,
            ip,
            os_type: os_type.into(),
            device_type: device_type.into(),
            clicked_at: Utc::now(),
        }
    }

    /// Converts the event into the analytics input for the store.
    pub fn to_new_click(&self) -> NewClick {
        NewClick {
            ip: self.ip.clone(),
            os_type: self.os_type.clone(),
            device_type: self.device_type.clone(),
            clicked_at: self.clicked_at,
        }
    }
}
