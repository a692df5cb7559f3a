//! Owner-scoped analytics reads.

use std::sync::Arc;

use serde_json::json;

use crate::domain::entities::{Link, LinkAnalytics};
use crate::domain::repositories::{AnalyticsRepository, LinkRepository};
use crate::error::AppError;

/// A link together with its accumulated analytics.
#[derive(Debug, Clone)]
pub struct LinkReport {
    pub link: Link,
    pub analytics: LinkAnalytics,
}

/// Service for reading click analytics.
///
/// Writes happen only in the click worker; this service never mutates.
pub struct AnalyticsService {
    link_repository: Arc<dyn LinkRepository>,
    analytics_repository: Arc<dyn AnalyticsRepository>,
}

impl AnalyticsService {
    /// Creates a new analytics service.
    pub fn new(
        link_repository: Arc<dyn LinkRepository>,
        analytics_repository: Arc<dyn AnalyticsRepository>,
    ) -> Self {
        Self {
            link_repository,
            analytics_repository,
        }
    }

    /// Loads the analytics of `alias` for its owner.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the alias is unknown or belongs to
    /// another owner. Returns [`AppError::Internal`] on storage errors.
    pub async fn get_link_analytics(
        &self,
        owner_id: &str,
        alias: &str,
    ) -> Result<LinkReport, AppError> {
        let link = self
            .link_repository
            .find_by_alias(alias)
            .await?
            .filter(|link| link.is_owned_by(owner_id))
            .ok_or_else(|| AppError::not_found("Short URL not found", json!({ "alias": alias })))?;

        let analytics = self.analytics_repository.get_analytics(link.id).await?;

        Ok(LinkReport { link, analytics })
    }
}
