use lazy_static::lazy_static;
use regex::Regex;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Deserialize;
use std::fmt;

lazy_static! {
    /// Anything that looks like a tag. Deliberately loose: fragments and
    /// non-HTML angle-bracket content count as markup.
    pub(crate) static ref TAG_PATTERN: Regex = Regex::new(r"<[^>]+>").unwrap();
}

/// What a response body looks like.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ContentKind {
    /// The whole body is one valid JSON document
    Json,
    /// Not JSON, but contains at least one `<...>` tag
    Markup,
    /// Anything else, including the empty body
    Text,
}

impl ContentKind {
    /// Label shown on the body badge.
    pub fn badge(&self) -> &'static str {
        match self {
            ContentKind::Json => "JSON",
            ContentKind::Markup => "HTML",
            ContentKind::Text => "TEXT",
        }
    }

    /// Language tag attached to source text.
    pub fn language(&self) -> &'static str {
        match self {
            ContentKind::Json => "json",
            ContentKind::Markup => "markup",
            ContentKind::Text => "text",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.badge())
    }
}

/// Classifies a body. First match wins: JSON, then markup, then text.
pub fn classify(body: &str) -> ContentKind {
    if is_json(body) {
        return ContentKind::Json;
    }

    if TAG_PATTERN.is_match(body) {
        return ContentKind::Markup;
    }

    ContentKind::Text
}

/// Strict parse of the full string. Trailing data is an error.
pub(crate) fn is_json(body: &str) -> bool {
    parse_json::<IgnoredAny>(body).is_ok()
}

/// `serde_json::from_str` without the recursion limit. Numbers of any size
/// are accepted and keep their text. Deep nesting grows the stack on the
/// heap instead of overflowing it.
pub(crate) fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T, serde_json::Error> {
    let mut de = serde_json::Deserializer::from_str(body);
    de.disable_recursion_limit();
    let value = T::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(value)
}
