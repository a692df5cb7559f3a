//! Link store implementations.
//!
//! Concrete implementations of domain repository traits. The PostgreSQL
//! repositories use SQLx with runtime-checked queries; [`MemoryStore`] keeps
//! everything in process and backs both traits at once.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - Link storage and retrieval
//! - [`PgAnalyticsRepository`] - Atomic click accounting and analytics reads
//! - [`MemoryStore`] - In-process links and analytics

pub mod memory_store;
pub mod pg_analytics_repository;
pub mod pg_link_repository;

pub use memory_store::MemoryStore;
pub use pg_analytics_repository::PgAnalyticsRepository;
pub use pg_link_repository::PgLinkRepository;
