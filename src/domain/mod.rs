//! Domain layer containing business entities and logic.
//!
//! Defines entities, repository interfaces and the click-processing pipeline,
//! independent of infrastructure concerns.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`click_event`] - Click tracking event model
//! - [`click_worker`] - Asynchronous click processing worker
//!
//! # Click Processing Flow
//!
//! 1. The redirect handler resolves the alias and classifies the user agent
//! 2. A [`click_event::ClickEvent`] is pushed onto a bounded channel
//! 3. [`click_worker::run_click_worker`] applies events with retry
//! 4. Counters are persisted via [`repositories::AnalyticsRepository`]

pub mod click_event;
pub mod click_worker;
pub mod entities;
pub mod repositories;
