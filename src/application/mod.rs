//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! cache access, validation, and business rules. Services consume repository
//! traits and provide a clean API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Short link creation, resolution, listing and deletion
//! - [`services::analytics_service::AnalyticsService`] - Owner-scoped analytics reads
//! - [`services::auth_service::AuthService`] - Access token verification

pub mod services;
