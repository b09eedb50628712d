use crate::ast::span::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Words the grammar reserves; an entity or alias spelled like one of
/// these has to be written in backticks.
const RESERVED: &[&str] = &[
    "from", "where", "and", "or", "not", "is", "null", "true", "false",
];

/// Entity name or alias, stored without quotes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

impl Identifier {
    pub fn new(name: &str, span: Span) -> Self {
        Self {
            name: name.to_string(),
            span,
        }
    }

    /// Builds an identifier from its source text, dropping backticks.
    pub fn from_source(text: &str, span: Span) -> Self {
        let name = text
            .strip_prefix('`')
            .and_then(|t| t.strip_suffix('`'))
            .unwrap_or(text);
        Self::new(name, span)
    }

    pub fn is_reserved(name: &str) -> bool {
        RESERVED.iter().any(|word| word.eq_ignore_ascii_case(name))
    }

    /// Whether the name must be backticked to be read back as an identifier.
    pub fn needs_quoting(&self) -> bool {
        let mut chars = self.name.chars();
        let plain = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

        !plain || Self::is_reserved(&self.name)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.needs_quoting() {
            write!(f, "`{}`", self.name)
        } else {
            write!(f, "{}", self.name)
        }
    }
}
