//! The redirect decision engine.
//!
//! Validates a request against a tracking link, chains through fallback
//! rules (including re-entry via alternative slugs), expands the target URL
//! and fans the resulting click out to every configured sink.

use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::application::services::TokenExpander;
use crate::domain::click_handler::ClickHandler;
use crate::domain::entities::{Click, RedirectRules, TrackingLink, UserAgent};
use crate::domain::redirect_request::{
    ClickProcessingResult, RedirectRequestData, RedirectResult,
};
use crate::domain::repositories::TrackingLinksRepository;
use crate::domain::services::{IpAddressParser, UserAgentParser};
use crate::error::RedirectError;

const UNKNOWN_VALUE: &str = "unknown";

/// Core use case: decide one redirect.
///
/// Holds only process-lived, read-only collaborators and is shared across
/// requests without locking. Every call gets fresh per-request state (the
/// working slug, the parent slug and the depth counter are locals), so
/// fallback chaining never leaks between requests.
pub struct RedirectService {
    tracking_links: Arc<dyn TrackingLinksRepository>,
    ip_parser: Arc<dyn IpAddressParser>,
    ua_parser: Arc<dyn UserAgentParser>,
    click_handlers: Vec<Arc<dyn ClickHandler>>,
    expander: TokenExpander,
    max_redirect_depth: usize,
}

impl RedirectService {
    pub fn new(
        tracking_links: Arc<dyn TrackingLinksRepository>,
        ip_parser: Arc<dyn IpAddressParser>,
        ua_parser: Arc<dyn UserAgentParser>,
        click_handlers: Vec<Arc<dyn ClickHandler>>,
        max_redirect_depth: usize,
    ) -> Self {
        Self {
            tracking_links,
            ip_parser,
            ua_parser,
            click_handlers,
            expander: TokenExpander::new(),
            max_redirect_depth,
        }
    }

    /// Decides the redirect for `slug` and registers the click.
    ///
    /// The returned [`RedirectResult`] carries the target URL and the merged
    /// click-result stream; the HTTP response must not wait for the stream.
    ///
    /// Fallback rules of type `slug`/`smart` re-enter the evaluation with a
    /// new slug. Re-entry is bounded: after `max_redirect_depth` chained
    /// slugs the decision fails with [`RedirectError::TooManyRedirects`].
    ///
    /// # Errors
    ///
    /// See [`RedirectError`] for the full taxonomy. Classifier failures are
    /// not errors: they downgrade the country code and user agent to
    /// `"unknown"` values.
    pub async fn redirect(
        &self,
        cancel: CancellationToken,
        slug: &str,
        data: &RedirectRequestData,
    ) -> Result<RedirectResult, RedirectError> {
        let mut current_slug = slug.to_string();
        let mut parent_slug: Option<String> = None;

        for _ in 0..=self.max_redirect_depth {
            let link = self
                .tracking_links
                .find_tracking_link(&current_slug)
                .await
                .ok_or(RedirectError::TrackingLinkNotFound)?;

            if !link.is_active {
                return Err(RedirectError::TrackingLinkDisabled);
            }

            // The protocol guard has no rule-set fallback.
            if !link.allowed_protocols.is_empty() && !link.allowed_protocols.allows(&data.protocol)
            {
                return Err(RedirectError::UnsupportedProtocol);
            }

            let country_code = match self.ip_parser.parse(data.ip) {
                Ok(code) => code,
                Err(e) => {
                    tracing::error!(ip = %data.ip, error = %e, "failed to parse ip address");
                    UNKNOWN_VALUE.to_string()
                }
            };

            let user_agent = match self.ua_parser.parse(&data.user_agent) {
                Ok(ua) => ua,
                Err(e) => {
                    tracing::error!(
                        user_agent = %data.user_agent,
                        error = %e,
                        "failed to parse user-agent header"
                    );
                    UserAgent::unknown(&data.user_agent)
                }
            };

            // Geo, device and OS failures all route through the overage
            // rules, matching the behavior of the stored configuration
            // (see DESIGN.md on the per-guard rule sets).
            let fallback = if !link.allowed_geos.is_empty()
                && !link.allowed_geos.allows(&country_code)
            {
                Some((
                    &link.campaign_overage_redirect_rules,
                    Some(RedirectError::UnsupportedGeo),
                ))
            } else if !link.allowed_devices.is_empty()
                && !link.allowed_devices.allows(&user_agent.device)
            {
                Some((
                    &link.campaign_overage_redirect_rules,
                    Some(RedirectError::UnsupportedDevice),
                ))
            } else if !link.allowed_os.is_empty() && !link.allowed_os.allows(&user_agent.platform)
            {
                Some((
                    &link.campaign_overage_redirect_rules,
                    Some(RedirectError::UnsupportedOs),
                ))
            } else if link.is_campaign_overaged {
                Some((&link.campaign_overage_redirect_rules, None))
            } else if !link.is_campaign_active {
                Some((&link.campaign_disabled_redirect_rules, None))
            } else {
                None
            };

            let Some((rules, guard_err)) = fallback else {
                let target_url = self.expander.expand(&link, data, &user_agent, &country_code);
                let output = self
                    .register_click(
                        &cancel,
                        &current_slug,
                        parent_slug.as_deref(),
                        &target_url,
                        &link,
                        data,
                        &user_agent,
                        &country_code,
                    )
                    .await;

                return Ok(RedirectResult { target_url, output });
            };

            let Some(rules) = rules else {
                return Err(RedirectError::InvalidRedirectRules);
            };

            match rules {
                RedirectRules::Link { redirect_url } => {
                    if redirect_url.is_empty() {
                        return Err(RedirectError::InvalidRedirectRules);
                    }

                    let output = self
                        .register_click(
                            &cancel,
                            &current_slug,
                            parent_slug.as_deref(),
                            redirect_url,
                            &link,
                            data,
                            &user_agent,
                            &country_code,
                        )
                        .await;

                    return Ok(RedirectResult {
                        target_url: redirect_url.clone(),
                        output,
                    });
                }
                RedirectRules::Slug { redirect_slug } => {
                    let next = redirect_slug.clone();
                    parent_slug = Some(std::mem::replace(&mut current_slug, next));
                }
                RedirectRules::Smart { redirect_smart_slug } => {
                    if redirect_smart_slug.is_empty() {
                        return Err(RedirectError::InvalidRedirectRules);
                    }

                    let next = {
                        let mut rng = rand::thread_rng();
                        redirect_smart_slug[rng.gen_range(0..redirect_smart_slug.len())].clone()
                    };
                    parent_slug = Some(std::mem::replace(&mut current_slug, next));
                }
                RedirectRules::Block => {
                    return Err(guard_err.unwrap_or(RedirectError::BlockRedirect));
                }
                RedirectRules::NoClick => {
                    let target_url =
                        self.expander.expand(&link, data, &user_agent, &country_code);

                    // No sink is invoked; the stream is born closed.
                    let (_tx, output) = mpsc::channel(1);

                    return Ok(RedirectResult { target_url, output });
                }
                RedirectRules::Unknown => return Err(RedirectError::InvalidRedirectType),
            }
        }

        Err(RedirectError::TooManyRedirects)
    }

    /// Builds the click and fans it out to every configured sink, merging
    /// the per-sink result streams into one.
    ///
    /// The merged receiver yields every result any sink produces (order
    /// across sinks unspecified) and closes only after every sink stream
    /// has closed. Dropping the receiver stops forwarding, which in turn
    /// winds the sinks down through their closed channels.
    #[allow(clippy::too_many_arguments)]
    async fn register_click(
        &self,
        cancel: &CancellationToken,
        slug: &str,
        parent_slug: Option<&str>,
        target_url: &str,
        link: &TrackingLink,
        data: &RedirectRequestData,
        user_agent: &UserAgent,
        country_code: &str,
    ) -> mpsc::Receiver<ClickProcessingResult> {
        let click = Arc::new(Click {
            id: data.request_id.clone(),
            target_url: target_url.to_string(),
            referer: data.referer.clone(),
            trk_url: data.request_url.to_string(),
            slug: slug.to_string(),
            parent_slug: parent_slug.unwrap_or_default().to_string(),
            tracking_link: Arc::new(link.clone()),
            source_id: link.source_id.clone(),
            campaign_id: link.campaign_id.clone(),
            affiliate_id: link.affiliate_id.clone(),
            advertiser_id: link.advertiser_id.clone(),
            is_parallel: false,
            landing_id: data.first_param("landing").map(str::to_string),
            gclid: data.first_param("gclid").map(str::to_string),
            user_agent: user_agent.clone(),
            agent: user_agent.src_string.clone(),
            platform: user_agent.platform.clone(),
            browser: user_agent.browser.clone(),
            device: user_agent.device.clone(),
            ip: data.ip,
            country_code: country_code.to_string(),
            p1: data.param_joined("p1"),
            p2: data.param_joined("p2"),
            p3: data.param_joined("p3"),
            p4: data.param_joined("p4"),
            created_at: Utc::now(),
        });

        let (tx, rx) = mpsc::channel(self.click_handlers.len().max(1));

        for handler in &self.click_handlers {
            let mut input = handler.handle_click(cancel.clone(), click.clone()).await;
            let tx = tx.clone();

            tokio::spawn(async move {
                while let Some(result) = input.recv().await {
                    if tx.send(result).await.is_err() {
                        break;
                    }
                }
            });
        }

        // The merged stream closes once every forwarder has finished.
        drop(tx);

        rx
    }
}
