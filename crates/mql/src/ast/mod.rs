//! Abstract Syntax Tree of document-store queries: filters and the
//! aggregate command that carries them.

pub mod command;
pub mod filter;
pub mod operation;
