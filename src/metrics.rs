//! Prometheus metrics for the redirect service.
//!
//! Metric names, labels and histogram buckets are part of the service's
//! external contract and must not change between releases.

use std::sync::OnceLock;

use prometheus::{
    Encoder, Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry,
    TextEncoder,
};

/// Shared bucket layout for all duration histograms.
const DURATION_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Global metrics instance (initialized explicitly via [`init_metrics`]).
static METRICS: OnceLock<Metrics> = OnceLock::new();

/// Application metrics container backed by its own registry.
pub struct Metrics {
    registry: Registry,

    /// Total number of handled redirects.
    pub redirects_total: IntCounter,
    /// Redirects per slug.
    pub redirects_by_slug: IntCounterVec,
    /// End-to-end redirect decision latency.
    pub redirect_duration: Histogram,
    /// Click processing latency per sink.
    pub click_handler_duration: HistogramVec,
}

impl Metrics {
    fn try_new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let redirects_total = IntCounter::with_opts(Opts::new(
            "redirector_redirects_total",
            "The total number of handled redirects.",
        ))?;

        let redirects_by_slug = IntCounterVec::new(
            Opts::new(
                "redirector_redirects_by_slug_total",
                "The total number of redirects handled per slug.",
            ),
            &["slug"],
        )?;

        let redirect_duration = Histogram::with_opts(
            HistogramOpts::new(
                "redirector_redirect_duration_seconds",
                "The time taken to process redirect requests.",
            )
            .buckets(DURATION_BUCKETS.to_vec()),
        )?;

        let click_handler_duration = HistogramVec::new(
            HistogramOpts::new(
                "redirector_click_handler_duration_seconds",
                "The time taken to process clicks by handler.",
            )
            .buckets(DURATION_BUCKETS.to_vec()),
            &["handler"],
        )?;

        registry.register(Box::new(redirects_total.clone()))?;
        registry.register(Box::new(redirects_by_slug.clone()))?;
        registry.register(Box::new(redirect_duration.clone()))?;
        registry.register(Box::new(click_handler_duration.clone()))?;

        Ok(Self {
            registry,
            redirects_total,
            redirects_by_slug,
            redirect_duration,
            click_handler_duration,
        })
    }

    /// Renders the registry in Prometheus text exposition format.
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let mut buf = Vec::new();
        if let Err(e) = encoder.encode(&self.registry.gather(), &mut buf) {
            tracing::error!(error = %e, "failed to encode metrics");
            return String::new();
        }

        String::from_utf8(buf).unwrap_or_default()
    }
}

/// Initializes the global metrics registry.
///
/// Idempotent: calling it again after a successful initialization is a
/// no-op.
pub fn init_metrics() -> Result<(), prometheus::Error> {
    if METRICS.get().is_some() {
        return Ok(());
    }

    let metrics = Metrics::try_new()?;
    // Another thread may have initialized between the check and here.
    let _ = METRICS.set(metrics);

    Ok(())
}

/// Returns the global metrics, if initialized.
///
/// Callers treat an uninitialized registry as "metrics disabled" and skip
/// recording.
pub fn get_metrics() -> Option<&'static Metrics> {
    METRICS.get()
}
