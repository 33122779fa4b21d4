//! Top-level router configuration.

use axum::routing::get;
use axum::Router;

use crate::api::handlers::{metrics_handler, missing_slug_handler, redirect_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;

/// Constructs the application router.
///
/// # Routes
///
/// - `GET /r/{slug}` - the redirect endpoint
/// - `GET /r/` - missing slug, answered with `400`
/// - `GET /` - liveness probe
/// - `GET /metrics` - Prometheus scrape endpoint
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "Redirector" }))
        .route("/metrics", get(metrics_handler))
        .route("/r/", get(missing_slug_handler))
        .route("/r/{slug}", get(redirect_handler))
        .with_state(state)
        .layer(tracing::layer())
}
