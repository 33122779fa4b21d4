//! Repository trait for tracking link lookups.

use async_trait::async_trait;

use crate::domain::entities::TrackingLink;

/// Read-side interface over tracking link storage.
///
/// A backend that fails internally logs the failure and reports the link as
/// absent; the rule engine only distinguishes found from not found. Partially
/// decoded links are never returned.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgTrackingLinksRepository`]
/// - [`crate::infrastructure::persistence::RedisTrackingLinksRepository`]
/// - [`crate::infrastructure::persistence::MultiTrackingLinksRepository`] -
///   sequential multi-backend resolver
/// - [`crate::infrastructure::persistence::RacingTrackingLinksRepository`] -
///   concurrent multi-backend resolver
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TrackingLinksRepository: Send + Sync {
    /// Resolves the tracking link bound to `slug`, or `None` when no backend
    /// knows it.
    async fn find_tracking_link(&self, slug: &str) -> Option<TrackingLink>;
}
