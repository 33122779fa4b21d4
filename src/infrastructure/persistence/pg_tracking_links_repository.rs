//! PostgreSQL-backed tracking link lookups.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};

use crate::domain::entities::{AllowedList, LandingPage, RedirectRules, TrackingLink};
use crate::domain::repositories::TrackingLinksRepository;

const FIND_TRACKING_LINK_QUERY: &str = r#"
SELECT slug, is_active,
       allowed_protocols, campaign_protocol_redirect_rules,
       allowed_geos, campaign_geo_redirect_rules,
       allowed_devices, campaign_devices_redirect_rules,
       allowed_os, campaign_os_redirect_rules,
       is_campaign_overaged, campaign_overage_redirect_rules,
       is_campaign_active, campaign_disabled_redirect_rules,
       target_url_template, allow_deeplink,
       campaign_id, affiliate_id, advertiser_id, source_id,
       landing_pages
FROM tracking_links
WHERE slug = $1
LIMIT 1
"#;

/// Row shape of the `tracking_links` table.
///
/// Allow-lists, redirect rules and landing pages are JSONB columns decoded
/// through serde.
#[derive(FromRow)]
struct TrackingLinkRow {
    slug: String,
    is_active: bool,
    allowed_protocols: Json<AllowedList>,
    campaign_protocol_redirect_rules: Option<Json<RedirectRules>>,
    allowed_geos: Json<AllowedList>,
    campaign_geo_redirect_rules: Option<Json<RedirectRules>>,
    allowed_devices: Json<AllowedList>,
    campaign_devices_redirect_rules: Option<Json<RedirectRules>>,
    allowed_os: Json<AllowedList>,
    campaign_os_redirect_rules: Option<Json<RedirectRules>>,
    is_campaign_overaged: bool,
    campaign_overage_redirect_rules: Option<Json<RedirectRules>>,
    is_campaign_active: bool,
    campaign_disabled_redirect_rules: Option<Json<RedirectRules>>,
    target_url_template: String,
    allow_deeplink: bool,
    campaign_id: String,
    affiliate_id: String,
    advertiser_id: String,
    source_id: String,
    landing_pages: Json<HashMap<String, LandingPage>>,
}

impl From<TrackingLinkRow> for TrackingLink {
    fn from(row: TrackingLinkRow) -> Self {
        Self {
            slug: row.slug,
            is_active: row.is_active,
            allowed_protocols: row.allowed_protocols.0,
            campaign_protocol_redirect_rules: row.campaign_protocol_redirect_rules.map(|j| j.0),
            allowed_geos: row.allowed_geos.0,
            campaign_geo_redirect_rules: row.campaign_geo_redirect_rules.map(|j| j.0),
            allowed_devices: row.allowed_devices.0,
            campaign_devices_redirect_rules: row.campaign_devices_redirect_rules.map(|j| j.0),
            allowed_os: row.allowed_os.0,
            campaign_os_redirect_rules: row.campaign_os_redirect_rules.map(|j| j.0),
            is_campaign_overaged: row.is_campaign_overaged,
            campaign_overage_redirect_rules: row.campaign_overage_redirect_rules.map(|j| j.0),
            is_campaign_active: row.is_campaign_active,
            campaign_disabled_redirect_rules: row.campaign_disabled_redirect_rules.map(|j| j.0),
            target_url_template: row.target_url_template,
            allow_deeplink: row.allow_deeplink,
            campaign_id: row.campaign_id,
            affiliate_id: row.affiliate_id,
            advertiser_id: row.advertiser_id,
            source_id: row.source_id,
            landing_pages: row.landing_pages.0,
        }
    }
}

/// Tracking link repository over a PostgreSQL pool.
pub struct PgTrackingLinksRepository {
    pool: Arc<PgPool>,
}

impl PgTrackingLinksRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TrackingLinksRepository for PgTrackingLinksRepository {
    async fn find_tracking_link(&self, slug: &str) -> Option<TrackingLink> {
        let row = sqlx::query_as::<_, TrackingLinkRow>(FIND_TRACKING_LINK_QUERY)
            .bind(slug)
            .fetch_optional(&*self.pool)
            .await;

        match row {
            Ok(row) => row.map(TrackingLink::from),
            Err(e) => {
                tracing::error!(slug, error = %e, "failed to query tracking link");
                None
            }
        }
    }
}
