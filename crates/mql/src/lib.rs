pub mod ast;
pub mod builder;
pub mod error;
pub mod renderer;
pub mod rewrite;
