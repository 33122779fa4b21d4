//! Multi-backend tracking link resolvers.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinSet;

use crate::domain::entities::TrackingLink;
use crate::domain::repositories::TrackingLinksRepository;

/// Queries backends sequentially in declared order; the first backend that
/// knows the slug wins.
///
/// Typical wiring puts the Redis backend in front of the SQL backend so the
/// hot path rarely touches the database. Cancelling the caller's future
/// stops the search between backends.
pub struct MultiTrackingLinksRepository {
    backends: Vec<Arc<dyn TrackingLinksRepository>>,
}

impl MultiTrackingLinksRepository {
    pub fn new(backends: Vec<Arc<dyn TrackingLinksRepository>>) -> Self {
        Self { backends }
    }
}

#[async_trait]
impl TrackingLinksRepository for MultiTrackingLinksRepository {
    async fn find_tracking_link(&self, slug: &str) -> Option<TrackingLink> {
        for backend in &self.backends {
            if let Some(link) = backend.find_tracking_link(slug).await {
                return Some(link);
            }
        }

        None
    }
}

/// Queries all backends concurrently and returns the first non-null result.
///
/// Remaining lookups are aborted best-effort once a result is in; backends
/// that lose the race and complete anyway have their results discarded.
pub struct RacingTrackingLinksRepository {
    backends: Vec<Arc<dyn TrackingLinksRepository>>,
}

impl RacingTrackingLinksRepository {
    pub fn new(backends: Vec<Arc<dyn TrackingLinksRepository>>) -> Self {
        Self { backends }
    }
}

#[async_trait]
impl TrackingLinksRepository for RacingTrackingLinksRepository {
    async fn find_tracking_link(&self, slug: &str) -> Option<TrackingLink> {
        let mut lookups = JoinSet::new();

        for backend in &self.backends {
            let backend = backend.clone();
            let slug = slug.to_string();
            lookups.spawn(async move { backend.find_tracking_link(&slug).await });
        }

        while let Some(joined) = lookups.join_next().await {
            match joined {
                Ok(Some(link)) => {
                    lookups.abort_all();
                    return Some(link);
                }
                Ok(None) => {}
                Err(e) if e.is_cancelled() => {}
                Err(e) => {
                    tracing::error!(slug, error = %e, "tracking link lookup task failed");
                }
            }
        }

        None
    }
}
