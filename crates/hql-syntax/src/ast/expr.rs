use crate::ast::{dotpath::DotPath, literal::Literal, span::Span};
use serde::{Deserialize, Serialize};

/// Value-producing operand of a predicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub span: Span,
}

impl Expression {
    pub fn new(kind: ExpressionKind, span: Span) -> Self {
        Expression { kind, span }
    }

    pub fn is_path(&self) -> bool {
        matches!(self.kind, ExpressionKind::Path(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self.kind, ExpressionKind::Literal(_))
    }
}

/// Expression types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExpressionKind {
    Literal(Literal),
    Path(DotPath),
    FunctionCall {
        name: String,
        arguments: Vec<Expression>,
    },
}
