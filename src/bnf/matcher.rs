use super::Matcher;
use regex::bytes::Regex;
use std::fmt::{Display, Formatter};

impl Matcher {
    pub(crate) fn literal(name: String, value: String) -> Self {
        Matcher::Literal { name, value }
    }

    /// Compile a regex matcher. The pattern is anchored on both ends because a matcher
    /// classifies whole token texts, never prefixes.
    pub(crate) fn regex(name: String, source: String) -> Result<Self, regex::Error> {
        let pattern = Regex::new(&format!("^(?:{})$", source))?;
        Ok(Matcher::Regex {
            name,
            source,
            pattern,
        })
    }

    pub fn name(&self) -> &str {
        match self {
            Matcher::Literal { name, .. } | Matcher::Regex { name, .. } => name,
        }
    }

    /// Whether the whole of `text` is matched.
    pub fn matches(&self, text: &str) -> bool {
        match self {
            Matcher::Literal { value, .. } => value == text,
            Matcher::Regex { pattern, .. } => pattern.is_match(text.as_bytes()),
        }
    }
}

impl Display for Matcher {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Matcher::Literal { name, value } => write!(f, "{} = '{}'", name, value),
            Matcher::Regex { name, source, .. } => write!(f, "{} := /{}/", name, source),
        }
    }
}
