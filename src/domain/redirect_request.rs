//! Request-scoped data passed through a redirect decision.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;

use tokio::sync::mpsc;
use url::Url;

use crate::domain::entities::Click;
use crate::error::{ClickError, RedirectError};

/// Everything extracted from an incoming HTTP request that the rule engine
/// needs to decide a redirect.
///
/// Query parameters keep multi-valued semantics (`p1=a&p1=b`), headers are a
/// plain multimap so the domain stays free of HTTP framework types.
#[derive(Debug, Clone)]
pub struct RedirectRequestData {
    /// Unique opaque id minted at the boundary; doubles as the click id.
    pub request_id: String,
    /// Slug from the request path.
    pub slug: String,
    pub params: HashMap<String, Vec<String>>,
    pub headers: HashMap<String, Vec<String>>,
    /// Raw `User-Agent` header value.
    pub user_agent: String,
    pub ip: IpAddr,
    /// `"http"` or `"https"`.
    pub protocol: String,
    pub referer: String,
    /// Full URL the visitor requested.
    pub request_url: Url,
}

impl RedirectRequestData {
    /// Values of a query parameter, empty when absent.
    pub fn param(&self, key: &str) -> &[String] {
        self.params.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First value of a query parameter.
    pub fn first_param(&self, key: &str) -> Option<&str> {
        self.param(key).first().map(String::as_str)
    }

    /// Comma-joined parameter values, as rendered into click records and
    /// `{p1}`..`{p4}` tokens.
    pub fn param_joined(&self, key: &str) -> String {
        self.param(key).join(",")
    }

    /// Rejects requests the engine cannot decide.
    ///
    /// The client IP is typed and therefore always present; only the slug
    /// can be structurally invalid here.
    pub fn validate(&self) -> Result<(), RedirectError> {
        if self.slug.is_empty() {
            return Err(RedirectError::InvalidRequestData(
                "slug is required".to_string(),
            ));
        }

        Ok(())
    }
}

/// Outcome of one sink processing one click.
#[derive(Debug, Clone)]
pub struct ClickProcessingResult {
    pub click: Arc<Click>,
    pub err: Option<ClickError>,
}

/// Successful redirect decision.
///
/// `output` is the merged click-result stream: a lazy finite sequence fed by
/// every configured sink. The consumer may drain it or drop it; producers
/// stay well-behaved either way.
#[derive(Debug)]
pub struct RedirectResult {
    pub target_url: String,
    pub output: mpsc::Receiver<ClickProcessingResult>,
}
