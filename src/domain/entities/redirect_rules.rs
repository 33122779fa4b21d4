//! Fallback actions applied when traffic fails a tracking link guard.

use serde::{Deserialize, Serialize};

/// Tagged fallback action stored on a tracking link.
///
/// The tag (`redirect_type`) determines how non-qualifying traffic is
/// handled: sent to a fixed URL, chained to another tracking link (directly
/// or picked from a pool), blocked, or redirected without recording a click.
///
/// Stored documents may carry tags this build does not know; those decode
/// into [`RedirectRules::Unknown`] and are rejected by the rule engine
/// rather than failing the whole document decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "redirect_type", rename_all = "kebab-case")]
pub enum RedirectRules {
    /// Redirect to a fixed absolute URL.
    Link { redirect_url: String },
    /// Re-enter the engine with another tracking link.
    Slug { redirect_slug: String },
    /// Re-enter the engine with one slug picked uniformly from a pool.
    Smart { redirect_smart_slug: Vec<String> },
    /// Refuse the redirect.
    Block,
    /// Redirect without emitting a click.
    NoClick,
    #[serde(other)]
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_link_rules() {
        let rules: RedirectRules = serde_json::from_str(
            r#"{"redirect_type": "link", "redirect_url": "https://fallback.example.com"}"#,
        )
        .unwrap();

        assert_eq!(
            rules,
            RedirectRules::Link {
                redirect_url: "https://fallback.example.com".to_string()
            }
        );
    }

    #[test]
    fn test_decodes_smart_slug_rules() {
        let rules: RedirectRules = serde_json::from_str(
            r#"{"redirect_type": "smart", "redirect_smart_slug": ["a", "b", "c"]}"#,
        )
        .unwrap();

        assert_eq!(
            rules,
            RedirectRules::Smart {
                redirect_smart_slug: vec!["a".to_string(), "b".to_string(), "c".to_string()]
            }
        );
    }

    #[test]
    fn test_decodes_block_and_no_click() {
        let block: RedirectRules = serde_json::from_str(r#"{"redirect_type": "block"}"#).unwrap();
        let no_click: RedirectRules =
            serde_json::from_str(r#"{"redirect_type": "no-click"}"#).unwrap();

        assert_eq!(block, RedirectRules::Block);
        assert_eq!(no_click, RedirectRules::NoClick);
    }

    #[test]
    fn test_unknown_tag_decodes_to_unknown() {
        let rules: RedirectRules =
            serde_json::from_str(r#"{"redirect_type": "teleport"}"#).unwrap();

        assert_eq!(rules, RedirectRules::Unknown);
    }

    #[test]
    fn test_round_trip() {
        let rules = RedirectRules::Slug {
            redirect_slug: "backup".to_string(),
        };

        let encoded = serde_json::to_string(&rules).unwrap();
        let decoded: RedirectRules = serde_json::from_str(&encoded).unwrap();

        assert_eq!(decoded, rules);
    }
}
