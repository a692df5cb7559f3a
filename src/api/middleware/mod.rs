//! HTTP middleware for request processing.
//!
//! Provides owner authentication and request tracing.

pub mod auth;
pub mod tracing;
