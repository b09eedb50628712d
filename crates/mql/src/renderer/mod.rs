//! Defines the rendering traits for converting filter and command ASTs into
//! a structured document.

use model::core::value::Value;

pub mod command;
pub mod filter;
pub mod json;

/// Receiver of a structured document written as a stream of events.
///
/// Names and values are only valid inside a document; array elements are
/// written without names.
pub trait DocumentSink {
    fn start_document(&mut self);
    fn write_name(&mut self, name: &str);
    fn start_array(&mut self);
    fn end_array(&mut self);
    fn end_document(&mut self);
    fn write_value(&mut self, value: &Value);
}

/// A trait for any AST node that can be rendered into a document.
pub trait Render {
    fn render(&self, sink: &mut dyn DocumentSink);
}
