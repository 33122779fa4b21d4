//! IP address to country code classification.

use std::net::IpAddr;

use crate::domain::services::ParserError;

/// Resolves a visitor IP address to an ISO country code.
///
/// # Implementations
///
/// - [`crate::infrastructure::services::MaxMindIpParser`] - GeoLite2 lookup
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
pub trait IpAddressParser: Send + Sync {
    /// Returns the country code for `ip`.
    ///
    /// # Errors
    ///
    /// Returns [`ParserError::Failed`] when the lookup fails; the rule
    /// engine substitutes `"unknown"` and continues.
    fn parse(&self, ip: IpAddr) -> Result<String, ParserError>;
}
