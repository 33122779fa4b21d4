//! PostgreSQL-backed click persistence.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::entities::Click;
use crate::domain::repositories::ClicksRepository;
use crate::error::ClickError;

const INSERT_CLICK_QUERY: &str = r#"
INSERT INTO clicks (
    id, target_url, referer, trk_url, slug, parent_slug,
    source_id, campaign_id, affiliate_id, advertiser_id, is_parallel,
    landing_id, gclid,
    agent, platform, browser, device, is_bot,
    ip, country_code,
    p1, p2, p3, p4,
    created_at
) VALUES (
    $1, $2, $3, $4, $5, $6,
    $7, $8, $9, $10, $11,
    $12, $13,
    $14, $15, $16, $17, $18,
    $19, $20,
    $21, $22, $23, $24,
    $25
)
"#;

/// Click sink storage over a PostgreSQL pool.
pub struct PgClicksRepository {
    pool: Arc<PgPool>,
}

impl PgClicksRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClicksRepository for PgClicksRepository {
    async fn save(&self, click: &Click) -> Result<(), ClickError> {
        sqlx::query(INSERT_CLICK_QUERY)
            .bind(&click.id)
            .bind(&click.target_url)
            .bind(&click.referer)
            .bind(&click.trk_url)
            .bind(&click.slug)
            .bind(&click.parent_slug)
            .bind(&click.source_id)
            .bind(&click.campaign_id)
            .bind(&click.affiliate_id)
            .bind(&click.advertiser_id)
            .bind(click.is_parallel)
            .bind(&click.landing_id)
            .bind(&click.gclid)
            .bind(&click.agent)
            .bind(&click.platform)
            .bind(&click.browser)
            .bind(&click.device)
            .bind(click.user_agent.is_bot)
            .bind(click.ip.to_string())
            .bind(&click.country_code)
            .bind(&click.p1)
            .bind(&click.p2)
            .bind(&click.p3)
            .bind(&click.p4)
            .bind(click.created_at)
            .execute(&*self.pool)
            .await
            .map_err(|e| ClickError::Store(e.to_string()))?;

        Ok(())
    }
}
