//! DTOs for link shortening endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

use crate::utils::code_generator::ALIAS_REGEX;

/// Request to shorten a long URL.
///
/// Presence of `longUrl` and `topic` is checked by the link service so that
/// missing and blank values produce the same error.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShortenRequest {
    pub long_url: Option<String>,

    /// Optional custom alias; empty means "generate one".
    #[validate(custom(function = "validate_alias_shape"))]
    pub custom_alias: Option<String>,

    pub topic: Option<String>,
}

fn validate_alias_shape(alias: &str) -> Result<(), ValidationError> {
    if alias.is_empty() || ALIAS_REGEX.is_match(alias) {
        return Ok(());
    }

    Err(ValidationError::new("alias_format").with_message(Cow::from(
        "Custom alias must be 3-32 characters of letters, digits, '_' or '-'",
    )))
}

/// Response for a creation request.
///
/// Untagged so each variant serializes to its bare fields.
#[derive(Debug, Serialize)]
#[serde(untagged, rename_all_fields = "camelCase")]
pub enum ShortenResponse {
    Created {
        short_url: String,
        created_at: DateTime<Utc>,
    },
    Existing {
        short_url: String,
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(alias: Option<&str>) -> ShortenRequest {
        ShortenRequest {
            long_url: Some("https://example.com".to_string()),
            custom_alias: alias.map(str::to_string),
            topic: Some("news".to_string()),
        }
    }

    #[test]
    fn test_deserialize_camel_case() {
        let req: ShortenRequest = serde_json::from_value(json!({
            "longUrl": "https://example.com",
            "customAlias": "promo",
            "topic": "news"
        }))
        .unwrap();

        assert_eq!(req.long_url.as_deref(), Some("https://example.com"));
        assert_eq!(req.custom_alias.as_deref(), Some("promo"));
    }

    #[test]
    fn test_alias_shape_validation() {
        assert!(request(None).validate().is_ok());
        assert!(request(Some("")).validate().is_ok());
        assert!(request(Some("good_alias-1")).validate().is_ok());
        assert!(request(Some("x")).validate().is_err());
        assert!(request(Some("bad alias")).validate().is_err());
    }

    #[test]
    fn test_response_shapes() {
        let existing = serde_json::to_value(ShortenResponse::Existing {
            short_url: "http://localhost/abc".to_string(),
            message: "Long URL already exists".to_string(),
        })
        .unwrap();

        assert_eq!(existing["shortUrl"], "http://localhost/abc");
        assert_eq!(existing["message"], "Long URL already exists");
        assert!(existing.get("createdAt").is_none());
    }
}
