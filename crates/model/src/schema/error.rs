use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Entity '{entity}' declares field '{field}' more than once")]
    DuplicateField { entity: String, field: String },

    #[error("Entity '{entity}' maps more than one field to path '{path}'")]
    DuplicatePath { entity: String, path: String },

    #[error("Entity '{0}' has no identifier field")]
    MissingId(String),

    #[error("Entity '{entity}' has {count} identifier fields, expected exactly one")]
    MultipleIds { entity: String, count: usize },
}
