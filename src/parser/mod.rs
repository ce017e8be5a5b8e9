//! Jack syntax front end
//!
//! This module transforms the source text of one class into a parse tree:
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: Parsing (tokens → parse tree), split across
//!   `declarations`, `statements` and `expressions`
//! - [`tree`]: Parse tree node definitions
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with one method per grammar rule.
//! Expressions are flat: all binary operators share a single precedence level
//! and associate left to right. No external parser generator dependencies.

pub mod lexer;
pub mod parse;
pub mod tree;

mod declarations;
mod expressions;
mod statements;

pub use expressions::{BINARY_OPERATORS, UNARY_OPERATORS};
