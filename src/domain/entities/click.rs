//! Click entity: the event recorded for each redirect decision.

use std::net::IpAddr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::{TrackingLink, UserAgent};

/// A click generated when a redirect occurs.
///
/// Carries everything the sinks need: the decision outcome (`target_url`),
/// the slug chain (`slug`/`parent_slug`), campaign identifiers copied from
/// the tracking link, the classified visitor, and the custom `p1..p4`
/// tracking parameters (comma-joined when multi-valued).
#[derive(Debug, Clone, Serialize)]
pub struct Click {
    /// Equals the request id of the originating redirect request.
    pub id: String,
    /// Final URL the visitor was sent to.
    pub target_url: String,
    pub referer: String,
    /// Tracking URL that was requested.
    pub trk_url: String,
    /// Slug of the link the click was registered against.
    pub slug: String,
    /// Slug evaluated immediately before a fallback re-entry; empty for
    /// top-level redirects.
    pub parent_slug: String,

    #[serde(skip)]
    pub tracking_link: Arc<TrackingLink>,
    pub source_id: String,
    pub campaign_id: String,
    pub affiliate_id: String,
    pub advertiser_id: String,
    pub is_parallel: bool,

    pub landing_id: Option<String>,
    pub gclid: Option<String>,

    pub user_agent: UserAgent,
    /// Raw `User-Agent` header value.
    pub agent: String,
    pub platform: String,
    pub browser: String,
    pub device: String,

    pub ip: IpAddr,
    pub country_code: String,

    pub p1: String,
    pub p2: String,
    pub p3: String,
    pub p4: String,

    pub created_at: DateTime<Utc>,
}
