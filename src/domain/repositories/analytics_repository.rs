//! Repository trait for per-link click analytics.

use crate::domain::entities::{LinkAnalytics, NewClick};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for recording and reading click analytics.
///
/// Implementations must apply a click as one unit: concurrent calls for the
/// same alias may not lose increments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
    /// Applies one click to the analytics of the link identified by `alias`.
    ///
    /// Returns `Ok(false)` when no such link exists (for example because it
    /// was deleted after the redirect was served).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn record_click(&self, alias: &str, click: &NewClick) -> Result<bool, AppError>;

    /// Loads the accumulated analytics of a link.
    ///
    /// A link that was never clicked yields [`LinkAnalytics::default`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn get_analytics(&self, link_id: i64) -> Result<LinkAnalytics, AppError>;
}
