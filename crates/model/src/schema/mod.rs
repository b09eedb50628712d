pub mod entity;
pub mod error;

pub use entity::{EntitySchema, FieldSchema, ID_FIELD_NAME};
pub use error::SchemaError;
