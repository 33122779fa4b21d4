//! Redis-backed tracking link lookups.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::domain::entities::TrackingLink;
use crate::domain::repositories::TrackingLinksRepository;

/// Key namespace for tracking link documents.
const TRACKING_LINK_KEY_PREFIX: &str = "trk:";

/// Tracking link repository over Redis.
///
/// Links are stored as JSON documents under `trk:<slug>`. All failures are
/// fail-open: they are logged and reported as "not found" so a degraded
/// Redis never takes the redirect path down (the multi-backend resolver
/// falls through to the next backend).
pub struct RedisTrackingLinksRepository {
    client: ConnectionManager,
}

impl RedisTrackingLinksRepository {
    pub fn new(client: ConnectionManager) -> Self {
        Self { client }
    }

    fn tracking_link_key(slug: &str) -> String {
        format!("{}{}", TRACKING_LINK_KEY_PREFIX, slug)
    }
}

#[async_trait]
impl TrackingLinksRepository for RedisTrackingLinksRepository {
    async fn find_tracking_link(&self, slug: &str) -> Option<TrackingLink> {
        let key = Self::tracking_link_key(slug);
        let mut conn = self.client.clone();

        let data: Option<String> = match conn.get::<_, Option<String>>(&key).await {
            Ok(data) => data,
            Err(e) => {
                tracing::error!(slug, error = %e, "failed to get tracking link from redis");
                return None;
            }
        };

        let data = data?;

        match serde_json::from_str::<TrackingLink>(&data) {
            Ok(link) => Some(link),
            Err(e) => {
                tracing::error!(slug, error = %e, "failed to decode tracking link document");
                None
            }
        }
    }
}
