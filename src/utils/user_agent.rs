//! Coarse OS and device classification of `User-Agent` strings.

use woothee::parser::Parser;

/// Value reported when a field cannot be determined.
pub const UNKNOWN: &str = "unknown";

/// Classifier output; both fields are always non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAgentInfo {
    pub os_type: String,
    pub device_type: String,
}

impl UserAgentInfo {
    fn unknown() -> Self {
        Self {
            os_type: UNKNOWN.to_string(),
            device_type: UNKNOWN.to_string(),
        }
    }
}

/// Classifies a `User-Agent` header value.
///
/// `os_type` is the OS name, followed by its version when woothee reports a
/// numeric one (`"Mac OSX 10.15.7"`, `"iPhone 17.0"`). Windows names already
/// carry their version (`"Windows 10"`). `device_type` is the woothee
/// category: `pc`, `smartphone`, `mobilephone`, `appliance` or `crawler`.
pub fn classify(user_agent: Option<&str>) -> UserAgentInfo {
    let ua = match user_agent.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => return UserAgentInfo::unknown(),
    };

    let Some(result) = Parser::new().parse(ua) else {
        return UserAgentInfo::unknown();
    };

    let os_type = if result.os.is_empty() || result.os == "UNKNOWN" {
        UNKNOWN.to_string()
    } else if result
        .os_version
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit())
    {
        format!("{} {}", result.os, result.os_version)
    } else {
        result.os.to_string()
    };

    let device_type = if result.category.is_empty() || result.category == "UNKNOWN" {
        UNKNOWN.to_string()
    } else {
        result.category.to_string()
    };

    UserAgentInfo {
        os_type,
        device_type,
    }
}
