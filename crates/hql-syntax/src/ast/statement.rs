use crate::ast::{ident::Identifier, predicate::Predicate, span::Span};
use serde::{Deserialize, Serialize};

/// `from <Entity> [alias] [where <predicate>]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectStatement {
    pub entity: Identifier,
    pub alias: Option<Identifier>,
    pub where_clause: Option<Predicate>,
    pub span: Span,
}
