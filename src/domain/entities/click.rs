//! Click entity: one redirect, already classified, ready to be counted.

use chrono::{DateTime, NaiveDate, Utc};

/// A single redirect to be applied to a link's analytics.
///
/// `os_type` and `device_type` are the classifier output (never empty, the
/// sentinel is `"unknown"`). `ip` is `None` only when no client address
/// could be determined; such clicks count toward totals but never toward
/// unique clicks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClick {
    pub ip: Option<String>,
    pub os_type: String,
    pub device_type: String,
    pub clicked_at: DateTime<Utc>,
}

impl NewClick {
    /// The UTC calendar day this click is bucketed under.
    pub fn day(&self) -> NaiveDate {
        self.clicked_at.date_naive()
    }
}
