use crate::ast::{
    expr::Expression,
    operator::{ComparisonOperator, JunctionKind},
    span::Span,
};
use serde::{Deserialize, Serialize};

/// Boolean-valued node of a `where` clause. Evaluated with ternary logic:
/// a comparison against null yields unknown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    pub kind: PredicateKind,
    pub span: Span,
}

impl Predicate {
    pub fn new(kind: PredicateKind, span: Span) -> Self {
        Predicate { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PredicateKind {
    Comparison {
        left: Expression,
        operator: ComparisonOperator,
        right: Expression,
    },
    /// Two or more predicates joined by the same operator.
    Junction {
        kind: JunctionKind,
        predicates: Vec<Predicate>,
    },
    Negated(Box<Predicate>),
    /// `x is null`, or `x is not null` when `negated`.
    NullCheck {
        expression: Expression,
        negated: bool,
    },
    Grouped(Box<Predicate>),
}
