//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures; the only behaviour they carry is the
//! click-accounting rule on [`LinkAnalytics::record`].
//!
//! # Entity Types
//!
//! - [`Link`] - A shortened URL owned by a user
//! - [`NewClick`] - A classified redirect waiting to be counted
//! - [`LinkAnalytics`] - Accumulated counters for a link
//!
//! Creation inputs use separate structs (`NewLink`, `NewClick`).

pub mod analytics;
pub mod click;
pub mod link;

pub use analytics::{DailyClicks, DimensionStats, LinkAnalytics};
pub use click::NewClick;
pub use link::{Link, NewLink};
