//! Storage-backed repository implementations.

pub mod multi_repository;
pub mod pg_clicks_repository;
pub mod pg_tracking_links_repository;
pub mod redis_tracking_links_repository;

pub use multi_repository::{MultiTrackingLinksRepository, RacingTrackingLinksRepository};
pub use pg_clicks_repository::PgClicksRepository;
pub use pg_tracking_links_repository::PgTrackingLinksRepository;
pub use redis_tracking_links_repository::RedisTrackingLinksRepository;
