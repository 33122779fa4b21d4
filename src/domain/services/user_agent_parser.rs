//! User-Agent header classification.

use crate::domain::entities::UserAgent;
use crate::domain::services::ParserError;

/// Extracts device, platform and browser information from a raw
/// `User-Agent` header.
///
/// Implementations lowercase the classified fields so they can be checked
/// against tracking link allow-lists directly.
///
/// # Implementations
///
/// - [`crate::infrastructure::services::WootheeUserAgentParser`]
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
pub trait UserAgentParser: Send + Sync {
    /// Parses the raw header value.
    ///
    /// # Errors
    ///
    /// Returns [`ParserError::EmptyUserAgent`] for an empty header and
    /// [`ParserError::Failed`] for unrecognized values; the rule engine
    /// substitutes an "unknown" placeholder and continues.
    fn parse(&self, user_agent: &str) -> Result<UserAgent, ParserError>;
}
