use crate::{ast::span::Span, parser::Rule};
use pest::error::{Error as PestError, LineColLocation};
use thiserror::Error;

/// Error type for AST building
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("Syntax error at line {line}, column {column}: {message}")]
    Syntax {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("Invalid literal '{text}' at line {line}, column {column}: {reason}")]
    InvalidLiteral {
        text: String,
        reason: String,
        line: usize,
        column: usize,
    },
}

impl BuildError {
    pub fn syntax(message: impl Into<String>, span: Span) -> Self {
        BuildError::Syntax {
            message: message.into(),
            line: span.line,
            column: span.column,
        }
    }

    pub fn invalid_literal(text: &str, reason: impl Into<String>, span: Span) -> Self {
        BuildError::InvalidLiteral {
            text: text.to_string(),
            reason: reason.into(),
            line: span.line,
            column: span.column,
        }
    }

    pub fn from_pest_error(err: PestError<Rule>) -> Self {
        let (line, column) = match err.line_col {
            LineColLocation::Pos((l, c)) => (l, c),
            LineColLocation::Span((l, c), _) => (l, c),
        };

        BuildError::Syntax {
            message: err.variant.message().to_string(),
            line,
            column,
        }
    }

    pub fn line(&self) -> usize {
        match self {
            BuildError::Syntax { line, .. } | BuildError::InvalidLiteral { line, .. } => *line,
        }
    }

    pub fn column(&self) -> usize {
        match self {
            BuildError::Syntax { column, .. } | BuildError::InvalidLiteral { column, .. } => {
                *column
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_error_display() {
        let err = BuildError::syntax("expected predicate", Span::new(10, 12, 1, 11));
        assert_eq!(
            err.to_string(),
            "Syntax error at line 1, column 11: expected predicate"
        );
        assert_eq!(err.line(), 1);
        assert_eq!(err.column(), 11);

        let err =
            BuildError::invalid_literal("99999999999999999999", "out of range", Span::default());
        assert!(err.to_string().contains("99999999999999999999"));
        assert!(err.to_string().contains("out of range"));
    }
}
