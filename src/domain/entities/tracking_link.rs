//! Tracking link entity: the full configuration bound to a slug.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::entities::RedirectRules;

/// Set-membership view over allowed values.
///
/// Stored as a `{value: bool}` JSON object for compatibility with the
/// persisted documents. An empty list means "no restriction"; membership
/// checks are case-insensitive on both sides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllowedList(pub HashMap<String, bool>);

impl AllowedList {
    /// Returns `true` when the list places no restriction on the value.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Case-insensitive membership check.
    pub fn allows(&self, value: &str) -> bool {
        self.0
            .iter()
            .any(|(key, enabled)| *enabled && key.eq_ignore_ascii_case(value))
    }
}

impl<const N: usize> From<[&str; N]> for AllowedList {
    fn from(values: [&str; N]) -> Self {
        Self(values.iter().map(|v| (v.to_string(), true)).collect())
    }
}

/// A landing page associated with a tracking link.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LandingPage {
    pub id: String,
    pub title: String,
    pub preview_url: String,
    pub target_url: String,
}

/// Redirect configuration resolved by slug.
///
/// Authored externally; the core treats a resolved link as immutable for the
/// duration of one request. Guards (protocol, geo, device, OS) are expressed
/// as [`AllowedList`]s, each paired with a fallback rule set applied when the
/// guard fails. The geo/device/os rule sets are carried for storage
/// compatibility; the engine routes those failures through
/// `campaign_overage_redirect_rules` (see DESIGN.md).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackingLink {
    pub slug: String,
    pub is_active: bool,

    #[serde(default)]
    pub allowed_protocols: AllowedList,
    #[serde(default)]
    pub campaign_protocol_redirect_rules: Option<RedirectRules>,

    #[serde(default)]
    pub allowed_geos: AllowedList,
    #[serde(default)]
    pub campaign_geo_redirect_rules: Option<RedirectRules>,

    #[serde(default)]
    pub allowed_devices: AllowedList,
    #[serde(default)]
    pub campaign_devices_redirect_rules: Option<RedirectRules>,

    #[serde(default)]
    pub allowed_os: AllowedList,
    #[serde(default)]
    pub campaign_os_redirect_rules: Option<RedirectRules>,

    pub is_campaign_overaged: bool,
    #[serde(default)]
    pub campaign_overage_redirect_rules: Option<RedirectRules>,

    pub is_campaign_active: bool,
    #[serde(default)]
    pub campaign_disabled_redirect_rules: Option<RedirectRules>,

    pub target_url_template: String,
    #[serde(default)]
    pub allow_deeplink: bool,

    #[serde(default)]
    pub campaign_id: String,
    #[serde(default)]
    pub affiliate_id: String,
    #[serde(default)]
    pub advertiser_id: String,
    #[serde(default)]
    pub source_id: String,

    #[serde(default)]
    pub landing_pages: HashMap<String, LandingPage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_list_empty_means_unrestricted() {
        let list = AllowedList::default();

        assert!(list.is_empty());
        assert!(!list.allows("US"));
    }

    #[test]
    fn test_allowed_list_membership_is_case_insensitive() {
        let list = AllowedList::from(["US", "pt", "Ua"]);

        assert!(list.allows("us"));
        assert!(list.allows("US"));
        assert!(list.allows("PT"));
        assert!(list.allows("uA"));
        assert!(!list.allows("PL"));
    }

    #[test]
    fn test_allowed_list_disabled_entries_do_not_match() {
        let mut map = HashMap::new();
        map.insert("US".to_string(), false);
        let list = AllowedList(map);

        assert!(!list.is_empty());
        assert!(!list.allows("US"));
    }

    #[test]
    fn test_allowed_list_json_round_trip() {
        let mut map = HashMap::new();
        map.insert("US".to_string(), true);
        map.insert("pl".to_string(), false);
        let list = AllowedList(map.clone());

        let encoded = serde_json::to_string(&list).unwrap();
        let decoded: AllowedList = serde_json::from_str(&encoded).unwrap();

        assert_eq!(decoded.0, map);
    }

    #[test]
    fn test_tracking_link_json_defaults() {
        let link: TrackingLink = serde_json::from_str(
            r#"{
                "slug": "abc",
                "is_active": true,
                "is_campaign_overaged": false,
                "is_campaign_active": true,
                "target_url_template": "https://example.com/{ip}"
            }"#,
        )
        .unwrap();

        assert_eq!(link.slug, "abc");
        assert!(link.is_active);
        assert!(link.allowed_geos.is_empty());
        assert!(link.campaign_overage_redirect_rules.is_none());
        assert!(link.landing_pages.is_empty());
    }
}
