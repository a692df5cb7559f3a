//! Alias generation and validation utilities.
//!
//! Provides cryptographically secure random alias generation and validation
//! for custom user-provided aliases.

use crate::error::AppError;
use base64::Engine as _;
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

/// Random bytes per alias; base64 turns 6 bytes into exactly 8 characters.
const ALIAS_LENGTH_BYTES: usize = 6;

/// Allowed shape of a custom alias.
pub static ALIAS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{3,32}$").expect("alias pattern is valid"));

/// Path words under `/api/short` that an alias would shadow.
const RESERVED_ALIASES: &[&str] = &["shortURL", "getUserUrls", "health", "api"];

/// Generates a random 8-character URL-safe alias.
///
/// Uses `getrandom` for entropy and encodes the result as URL-safe base64
/// without padding. Reserved route words are never returned.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the system random number generator fails.
pub fn generate_alias() -> Result<String, AppError> {
    let mut buffer = [0u8; ALIAS_LENGTH_BYTES];

    loop {
        getrandom::fill(&mut buffer).map_err(|e| {
            AppError::internal(
                "Failed to generate alias",
                json!({ "reason": e.to_string() }),
            )
        })?;

        let alias = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer);
        if !is_reserved(&alias) {
            return Ok(alias);
        }
    }
}

/// Returns true if `alias` would shadow a fixed route under `/api/short`.
pub fn is_reserved(alias: &str) -> bool {
    RESERVED_ALIASES.contains(&alias)
}

/// Validates a user-provided custom alias.
///
/// # Rules
///
/// - 3-32 characters
/// - Letters, digits, `_` and `-` only
/// - Not a reserved route word
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_alias(alias: &str) -> Result<(), AppError> {
    if !ALIAS_REGEX.is_match(alias) {
        return Err(AppError::bad_request(
            "Custom alias must be 3-32 characters of letters, digits, '_' or '-'",
            json!({ "customAlias": alias }),
        ));
    }

    if is_reserved(alias) {
        return Err(AppError::bad_request(
            "This alias is reserved",
            json!({ "customAlias": alias }),
        ));
    }

    Ok(())
}
