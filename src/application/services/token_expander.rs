//! Target URL template expansion.

use chrono::Utc;
use rand::Rng;
use regex::Regex;

use crate::domain::entities::{TrackingLink, UserAgent};
use crate::domain::redirect_request::RedirectRequestData;

const RANDOM_STRING_LEN: usize = 32;
const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Expands `{token}` placeholders in a tracking link's target URL template.
///
/// The effective template is chosen in order: the `deeplink` query parameter
/// (when the link allows deeplinks), the `landing` query parameter (when it
/// names a configured landing page), then the link's own template.
///
/// Tokens are discovered with a single regex scan and each one is replaced
/// globally. Tokens outside the known table are erased; the doubled-brace
/// spelling (`{{ip}}`) matches the scan but not the table, so it is erased
/// too. No URL-encoding is applied.
pub struct TokenExpander {
    token_re: Regex,
}

impl TokenExpander {
    pub fn new() -> Self {
        Self {
            token_re: Regex::new(r"\{\{?(\w+)\}?\}").expect("token pattern is valid"),
        }
    }

    /// Renders the final target URL for a redirect decision.
    pub fn expand(
        &self,
        link: &TrackingLink,
        data: &RedirectRequestData,
        user_agent: &UserAgent,
        country_code: &str,
    ) -> String {
        let mut target = self.effective_template(link, data);

        let tokens: Vec<String> = self
            .token_re
            .find_iter(&target)
            .map(|m| m.as_str().to_string())
            .collect();

        for token in tokens {
            let value = match token.as_str() {
                "{ip}" => data.ip.to_string(),
                "{click_id}" => data.request_id.clone(),
                "{user_agent}" => data.user_agent.clone(),
                "{campaign_id}" => link.campaign_id.clone(),
                "{aff_id}" => link.affiliate_id.clone(),
                "{source_id}" => link.source_id.clone(),
                "{advertiser_id}" => link.advertiser_id.clone(),
                "{date}" => Utc::now().format("%Y-%m-%d").to_string(),
                "{date_time}" => Utc::now().format("%Y-%m-%dT%H:%M:%S").to_string(),
                "{timestamp}" => Utc::now().timestamp().to_string(),
                "{p1}" => data.param_joined("p1"),
                "{p2}" => data.param_joined("p2"),
                "{p3}" => data.param_joined("p3"),
                "{p4}" => data.param_joined("p4"),
                "{country_code}" => country_code.to_string(),
                "{referer}" => data.referer.clone(),
                "{random_str}" => random_string(RANDOM_STRING_LEN),
                "{random_int}" => rand::thread_rng().gen_range(10_000..=99_999_999).to_string(),
                "{device}" => user_agent.device.clone(),
                "{platform}" => user_agent.platform.clone(),
                // Undefined tokens are erased.
                _ => String::new(),
            };

            target = target.replace(&token, &value);
        }

        target
    }

    fn effective_template(&self, link: &TrackingLink, data: &RedirectRequestData) -> String {
        if link.allow_deeplink {
            if let Some(deeplink) = data.first_param("deeplink") {
                return deeplink.to_string();
            }
        }

        if let Some(landing) = data.first_param("landing") {
            if let Some(page) = link.landing_pages.get(landing) {
                return page.target_url.clone();
            }
        }

        link.target_url_template.clone()
    }
}

impl Default for TokenExpander {
    fn default() -> Self {
        Self::new()
    }
}

fn random_string(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| LETTERS[rng.gen_range(0..LETTERS.len())] as char)
        .collect()
}
