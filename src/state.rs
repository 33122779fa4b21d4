//! Application state shared across HTTP handlers.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::application::services::RedirectService;

/// Shared state injected into HTTP handlers.
///
/// Cheap to clone: the redirect service is process-lived and `Arc`ed, and
/// the shutdown token is the root every per-request cancellation token is
/// derived from.
#[derive(Clone)]
pub struct AppState {
    pub redirect_service: Arc<RedirectService>,
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(redirect_service: Arc<RedirectService>, shutdown: CancellationToken) -> Self {
        Self {
            redirect_service,
            shutdown,
        }
    }
}
