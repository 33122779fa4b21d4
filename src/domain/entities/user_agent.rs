//! Parsed User-Agent value object.

use serde::{Deserialize, Serialize};

/// Structured view of a `User-Agent` header.
///
/// `device`, `platform` and `browser` are lowercase-normalized by the parser
/// so they can be checked against tracking link allow-lists directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserAgent {
    /// Original header value.
    pub src_string: String,
    /// Whether the request comes from a known bot/crawler.
    pub is_bot: bool,
    /// Device category (desktop, smartphone, ...).
    pub device: String,
    /// Operating system family.
    pub platform: String,
    /// Browser family.
    pub browser: String,
}

impl UserAgent {
    /// Placeholder used when the header cannot be parsed.
    ///
    /// Keeps the raw string for click records while every classified field
    /// reads `"unknown"`.
    pub fn unknown(src_string: impl Into<String>) -> Self {
        Self {
            src_string: src_string.into(),
            is_bot: false,
            device: "unknown".to_string(),
            platform: "unknown".to_string(),
            browser: "unknown".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_placeholder_keeps_source_string() {
        let ua = UserAgent::unknown("Weird/1.0");

        assert_eq!(ua.src_string, "Weird/1.0");
        assert_eq!(ua.device, "unknown");
        assert_eq!(ua.platform, "unknown");
        assert_eq!(ua.browser, "unknown");
        assert!(!ua.is_bot);
    }
}
