//! Handler for the Prometheus scrape endpoint.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::metrics;

/// `GET /metrics`: Prometheus text exposition format.
pub async fn metrics_handler() -> Response {
    match metrics::get_metrics() {
        Some(m) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            m.render(),
        )
            .into_response(),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            "metrics are not initialized",
        )
            .into_response(),
    }
}
