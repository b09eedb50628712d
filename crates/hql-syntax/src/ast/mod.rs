pub mod dotpath;
pub mod expr;
pub mod ident;
pub mod literal;
pub mod operator;
pub mod predicate;
pub mod span;
pub mod statement;
pub mod visitor;
