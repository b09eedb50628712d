use crate::ast::span::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Dot-separated attribute path (e.g., title, b.title, author.name)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DotPath {
    pub segments: Vec<String>,
    pub span: Span,
}

impl DotPath {
    pub fn new(segments: Vec<String>, span: Span) -> Self {
        Self { segments, span }
    }

    pub fn from_string(path: &str, span: Span) -> Self {
        Self {
            segments: path.split('.').map(|s| s.to_string()).collect(),
            span,
        }
    }

    /// Drops the leading segment when it names the given alias.
    pub fn strip_alias(&self, alias: &str) -> DotPath {
        match self.segments.split_first() {
            Some((first, rest)) if first == alias && !rest.is_empty() => {
                DotPath::new(rest.to_vec(), self.span)
            }
            _ => self.clone(),
        }
    }
}

impl fmt::Display for DotPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}
