use crate::shelf::ProtocolViolation;
use hql_syntax::errors::BuildError;
use model::schema::SchemaError;
use mql::error::MqlError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslateError {
    #[error(transparent)]
    Protocol(#[from] ProtocolViolation),

    #[error(transparent)]
    Mql(#[from] MqlError),

    #[error("Unsupported construct: {0}")]
    Unsupported(String),

    #[error("Unknown field '{field}' on entity '{entity}'")]
    UnknownField { entity: String, field: String },

    #[error("Query targets entity '{found}' but the schema describes '{expected}'")]
    EntityMismatch { expected: String, found: String },

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Syntax(#[from] BuildError),
}
