use hql_syntax::errors::BuildError;
use mql::error::MqlError;
use thiserror::Error;
use translate::TranslateError;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read or write a file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to deserialize the schema file as JSON: {0}")]
    SchemaDeserialize(#[from] serde_json::Error),

    #[error("Failed to load settings from '{path}': {source}")]
    Settings {
        path: String,
        source: serde_json::Error,
    },

    #[error("Failed to parse the query: {0}")]
    QueryParse(#[from] BuildError),

    #[error("Failed to translate the query: {0}")]
    Translate(#[from] TranslateError),

    #[error("Failed to render the command: {0}")]
    Render(#[from] MqlError),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(serde_json::Error),
}
