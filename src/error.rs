//! Error taxonomy for the redirect core.
//!
//! [`RedirectError`] covers every way a redirect decision can fail and is
//! what the HTTP boundary surfaces to the visitor. [`ClickError`] travels on
//! the click-result stream only; sink failures never change the HTTP
//! response because the visitor has already been redirected.

use std::fmt;

/// Failure of a redirect decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectError {
    /// No tracking link is bound to the requested slug.
    TrackingLinkNotFound,
    /// The tracking link exists but is disabled.
    TrackingLinkDisabled,
    /// The request protocol is outside the link's allow-list.
    UnsupportedProtocol,
    /// The visitor's geo is outside the link's allow-list and the fallback
    /// rules block the redirect.
    UnsupportedGeo,
    /// The visitor's device is outside the link's allow-list and the
    /// fallback rules block the redirect.
    UnsupportedDevice,
    /// The visitor's OS is outside the link's allow-list and the fallback
    /// rules block the redirect.
    UnsupportedOs,
    /// Fallback rules block the redirect without a more specific cause.
    BlockRedirect,
    /// The stored redirect rules carry a tag this build does not know.
    InvalidRedirectType,
    /// A guard fired but its rule set is missing or unusable.
    InvalidRedirectRules,
    /// The request data failed validation.
    InvalidRequestData(String),
    /// A slug/smart-slug fallback chain exceeded the configured depth.
    TooManyRedirects,
}

impl fmt::Display for RedirectError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::TrackingLinkNotFound => write!(f, "no tracking link was found by slug"),
            Self::TrackingLinkDisabled => write!(f, "used tracking link is disabled"),
            Self::UnsupportedProtocol => {
                write!(f, "protocol is not allowed for that tracking link")
            }
            Self::UnsupportedGeo => {
                write!(f, "visitor geo is not allowed for that tracking link")
            }
            Self::UnsupportedDevice => {
                write!(f, "visitor device is not allowed for that tracking link")
            }
            Self::UnsupportedOs => {
                write!(f, "visitor OS is not allowed for that tracking link")
            }
            Self::BlockRedirect => write!(f, "redirect should be blocked"),
            Self::InvalidRedirectType => {
                write!(f, "invalid redirect type is stored in tracking link redirect rules")
            }
            Self::InvalidRedirectRules => {
                write!(f, "invalid redirect rules are stored in tracking link")
            }
            Self::InvalidRequestData(reason) => write!(f, "invalid request data: {}", reason),
            Self::TooManyRedirects => {
                write!(f, "redirect chain exceeded the allowed depth")
            }
        }
    }
}

impl std::error::Error for RedirectError {}

/// Failure reported for one click by one sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickError {
    /// The request context was cancelled before or during sink work.
    Cancelled,
    /// The sink failed to persist the click.
    Store(String),
}

impl fmt::Display for ClickError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Cancelled => write!(f, "click processing cancelled"),
            Self::Store(reason) => write!(f, "failed to store click: {}", reason),
        }
    }
}

impl std::error::Error for ClickError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_error_messages() {
        assert_eq!(
            RedirectError::TrackingLinkNotFound.to_string(),
            "no tracking link was found by slug"
        );
        assert_eq!(
            RedirectError::BlockRedirect.to_string(),
            "redirect should be blocked"
        );
        assert_eq!(
            RedirectError::InvalidRequestData("slug is required".to_string()).to_string(),
            "invalid request data: slug is required"
        );
    }

    #[test]
    fn test_click_error_messages() {
        assert_eq!(ClickError::Cancelled.to_string(), "click processing cancelled");
        assert_eq!(
            ClickError::Store("connection reset".to_string()).to_string(),
            "failed to store click: connection reset"
        );
    }
}
