//! Input matchers
//!
//! A matcher is a predicate over an inbound payload. Routes are evaluated in
//! declaration order and the first accepting matcher wins, so more specific
//! matchers must be listed before generic ones.

use std::fmt;

use regex::Regex;

use crate::models::inbound::Payload;
use crate::utils::errors::FlowResult;

#[derive(Debug, Clone)]
pub enum Matcher {
    /// A `/command`, optionally addressed as `/command@bot` or followed by arguments
    Command(String),
    /// Exact non-command text
    Text(String),
    /// Non-command text matching a regular expression
    Pattern(Regex),
    /// Any non-command text
    AnyText,
    /// Callback data equality
    Callback(String),
}

impl Matcher {
    pub fn command(name: impl Into<String>) -> Self {
        Matcher::Command(name.into().trim_start_matches('/').to_string())
    }

    pub fn text(text: impl Into<String>) -> Self {
        Matcher::Text(text.into())
    }

    pub fn pattern(pattern: &str) -> FlowResult<Self> {
        Ok(Matcher::Pattern(Regex::new(pattern)?))
    }

    pub fn any_text() -> Self {
        Matcher::AnyText
    }

    pub fn callback(token: impl Into<String>) -> Self {
        Matcher::Callback(token.into())
    }

    /// Whether this matcher accepts the payload
    pub fn accepts(&self, payload: &Payload) -> bool {
        match (self, payload) {
            (Matcher::Command(name), Payload::Text(text)) => command_name(text) == Some(name.as_str()),
            (Matcher::Text(expected), Payload::Text(text)) => !is_command(text) && text == expected,
            (Matcher::Pattern(regex), Payload::Text(text)) => !is_command(text) && regex.is_match(text),
            (Matcher::AnyText, Payload::Text(text)) => !is_command(text),
            (Matcher::Callback(token), Payload::Callback { data, .. }) => data == token,
            _ => false,
        }
    }

    /// Whether both matchers can accept the same payload.
    ///
    /// Exact for literals; two patterns are only compared by their source.
    pub fn overlaps(&self, other: &Matcher) -> bool {
        use Matcher::*;
        match (self, other) {
            (Command(a), Command(b)) => a == b,
            (Callback(a), Callback(b)) => a == b,
            (AnyText, Text(_) | Pattern(_) | AnyText) | (Text(_) | Pattern(_), AnyText) => true,
            (Text(a), Text(b)) => a == b,
            (Text(text), Pattern(regex)) | (Pattern(regex), Text(text)) => regex.is_match(text),
            (Pattern(a), Pattern(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Command(name) => write!(f, "command(/{})", name),
            Matcher::Text(text) => write!(f, "text({})", text),
            Matcher::Pattern(regex) => write!(f, "pattern({})", regex.as_str()),
            Matcher::AnyText => f.write_str("any_text"),
            Matcher::Callback(token) => write!(f, "callback({})", token),
        }
    }
}

fn is_command(text: &str) -> bool {
    text.starts_with('/')
}

/// Command name of a `/command@bot args` message
fn command_name(text: &str) -> Option<&str> {
    let head = text.strip_prefix('/')?.split_whitespace().next()?;
    head.split('@').next().filter(|name| !name.is_empty())
}
