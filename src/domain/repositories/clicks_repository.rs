//! Repository trait for click persistence.

use async_trait::async_trait;

use crate::domain::entities::Click;
use crate::error::ClickError;

/// Write-side interface for click events.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgClicksRepository`]
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClicksRepository: Send + Sync {
    /// Inserts the click into storage.
    ///
    /// # Errors
    ///
    /// Returns [`ClickError::Store`] when the write fails; the caller
    /// reports it on the click-result stream.
    async fn save(&self, click: &Click) -> Result<(), ClickError>;
}
