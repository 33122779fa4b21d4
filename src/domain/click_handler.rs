//! Click sinks: fan-out targets for click events.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::domain::entities::Click;
use crate::domain::redirect_request::ClickProcessingResult;
use crate::domain::repositories::ClicksRepository;
use crate::error::ClickError;

/// A consumer of click events.
///
/// `handle_click` returns immediately with a lazy finite stream of
/// processing results; the actual work runs on a spawned task. Most sinks
/// emit exactly one result per click, but consumers must not assume
/// cardinality. Sinks treat the shared click as read-only and must observe
/// `cancel` at or before each I/O operation, emitting
/// [`ClickError::Cancelled`] instead of silently dropping the click.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickHandler: Send + Sync {
    /// Starts processing `click` and returns the result stream.
    async fn handle_click(
        &self,
        cancel: CancellationToken,
        click: Arc<Click>,
    ) -> mpsc::Receiver<ClickProcessingResult>;
}

/// Reference sink: persists clicks through a [`ClicksRepository`].
///
/// Emits exactly one result per click. When the request context is already
/// cancelled the repository is never called.
pub struct StoreClickHandler<R> {
    repository: Arc<R>,
}

impl<R> StoreClickHandler<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R> ClickHandler for StoreClickHandler<R>
where
    R: ClicksRepository + 'static,
{
    async fn handle_click(
        &self,
        cancel: CancellationToken,
        click: Arc<Click>,
    ) -> mpsc::Receiver<ClickProcessingResult> {
        let (tx, rx) = mpsc::channel(1);
        let repository = self.repository.clone();

        tracing::debug!(click_id = %click.id, slug = %click.slug, "processing click");

        tokio::spawn(async move {
            if cancel.is_cancelled() {
                tracing::warn!(click_id = %click.id, "click processing cancelled before store");
                let _ = tx
                    .send(ClickProcessingResult {
                        click,
                        err: Some(ClickError::Cancelled),
                    })
                    .await;
                return;
            }

            let err = tokio::select! {
                _ = cancel.cancelled() => Some(ClickError::Cancelled),
                result = repository.save(&click) => result.err(),
            };

            match &err {
                None => {
                    tracing::debug!(click_id = %click.id, "click saved successfully");
                }
                Some(e) => {
                    tracing::error!(click_id = %click.id, error = %e, "failed to save click");
                }
            }

            let _ = tx.send(ClickProcessingResult { click, err }).await;
        });

        rx
    }
}
