//! HTTP request handlers.

pub mod metrics;
pub mod redirect;

pub use metrics::metrics_handler;
pub use redirect::{missing_slug_handler, redirect_handler};
