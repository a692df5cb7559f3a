//! Link entity representing a shortened URL owned by a user.

use chrono::{DateTime, Utc};

/// A short link record.
///
/// The short URL itself is not stored: it is always derived from the
/// configured base URL and [`Link::alias`]
/// (see [`crate::application::services::LinkService::short_url`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: i64,
    pub owner_id: String,
    pub alias: String,
    pub long_url: String,
    pub topic: String,
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(
        id: i64,
        owner_id: String,
        alias: String,
        long_url: String,
        topic: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            owner_id,
            alias,
            long_url,
            topic,
            created_at,
        }
    }

    /// Returns true if `owner_id` created this link.
    pub fn is_owned_by(&self, owner_id: &str) -> bool {
        self.owner_id == owner_id
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub owner_id: String,
    pub alias: String,
    pub long_url: String,
    pub topic: String,
}
