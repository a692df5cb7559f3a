//! Business logic services for the application layer.

pub mod analytics_service;
pub mod auth_service;
pub mod link_service;

pub use analytics_service::{AnalyticsService, LinkReport};
pub use auth_service::{AuthService, Claims};
pub use link_service::{CreateOutcome, LinkService};
