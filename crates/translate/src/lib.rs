pub mod error;
pub mod shelf;
pub mod translator;

pub use error::TranslateError;
pub use shelf::{AstWalkerShelf, ProtocolViolation, TypeTag};
pub use translator::{QueryTranslator, translate_filter, translate_query, translate_statement};
