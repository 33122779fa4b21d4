//! User-Agent classification backed by the woothee parser.

use woothee::parser::Parser;

use crate::domain::entities::UserAgent;
use crate::domain::services::{ParserError, UserAgentParser};

/// [`UserAgentParser`] built on the woothee pattern database.
///
/// Classified fields are lowercased so the rule engine can match them
/// against allow-lists directly.
pub struct WootheeUserAgentParser {
    parser: Parser,
}

impl WootheeUserAgentParser {
    pub fn new() -> Self {
        Self {
            parser: Parser::new(),
        }
    }
}

impl Default for WootheeUserAgentParser {
    fn default() -> Self {
        Self::new()
    }
}

impl UserAgentParser for WootheeUserAgentParser {
    fn parse(&self, user_agent: &str) -> Result<UserAgent, ParserError> {
        if user_agent.is_empty() {
            return Err(ParserError::EmptyUserAgent);
        }

        let result = self
            .parser
            .parse(user_agent)
            .ok_or_else(|| ParserError::Failed("unrecognized user agent".to_string()))?;

        Ok(UserAgent {
            src_string: user_agent.to_string(),
            is_bot: result.category == "crawler",
            device: result.category.to_lowercase(),
            platform: result.os.to_lowercase(),
            browser: result.name.to_lowercase(),
        })
    }
}
