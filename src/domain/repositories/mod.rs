//! Repository trait definitions for the domain layer.
//!
//! Traits define the contract for data access; concrete implementations live
//! in `crate::infrastructure::persistence`. Mock implementations are
//! auto-generated via `mockall` for testing.

pub mod clicks_repository;
pub mod tracking_links_repository;

pub use clicks_repository::ClicksRepository;
pub use tracking_links_repository::TrackingLinksRepository;

#[cfg(test)]
pub use clicks_repository::MockClicksRepository;
#[cfg(test)]
pub use tracking_links_repository::MockTrackingLinksRepository;
