//! Gradle Kotlin DSL front end
//!
//! Scripts are parsed with the tree-sitter Kotlin grammar and lowered into a
//! small syntax tree of blocks, assignments, calls with their arguments, infix
//! plugin modifiers and reference chains. Kotlin the descriptor has no use
//! for (control flow, lambdas in value position, operators) survives as
//! source text so the extractor can report it.

#[allow(missing_docs)]
pub mod ast;
pub mod parser;

pub use ast::{Argument, Call, Expr, Script, Statement, StatementKind};
pub use parser::parse;
