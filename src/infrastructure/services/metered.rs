//! Metrics decorator for click sinks.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::domain::click_handler::ClickHandler;
use crate::domain::entities::Click;
use crate::domain::redirect_request::ClickProcessingResult;
use crate::metrics;

/// Wraps a [`ClickHandler`] and records
/// `redirector_click_handler_duration_seconds{handler}` for each click.
///
/// The duration covers the wrapped handler's whole result stream, from
/// dispatch until the stream closes.
pub struct MeteredClickHandler {
    inner: Arc<dyn ClickHandler>,
    name: String,
}

impl MeteredClickHandler {
    pub fn new(inner: Arc<dyn ClickHandler>, name: impl Into<String>) -> Self {
        Self {
            inner,
            name: name.into(),
        }
    }
}

#[async_trait]
impl ClickHandler for MeteredClickHandler {
    async fn handle_click(
        &self,
        cancel: CancellationToken,
        click: Arc<Click>,
    ) -> mpsc::Receiver<ClickProcessingResult> {
        let started = Instant::now();
        let mut input = self.inner.handle_click(cancel, click).await;

        let (tx, rx) = mpsc::channel(1);
        let name = self.name.clone();

        tokio::spawn(async move {
            while let Some(result) = input.recv().await {
                if tx.send(result).await.is_err() {
                    break;
                }
            }

            if let Some(metrics) = metrics::get_metrics() {
                metrics
                    .click_handler_duration
                    .with_label_values(&[name.as_str()])
                    .observe(started.elapsed().as_secs_f64());
            }
        });

        rx
    }
}
