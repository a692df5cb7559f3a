//! Utility functions for alias generation and request inspection.
//!
//! - [`code_generator`] - Random alias generation and custom alias validation
//! - [`user_agent`] - OS and device classification of the `User-Agent` header
//! - [`client_ip`] - Client address resolution behind optional proxies

pub mod client_ip;
pub mod code_generator;
pub mod user_agent;
