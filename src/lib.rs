//! # Introduction
//!
//! jack-analyzer is the syntax front end for Jack, a small object-based
//! teaching language. It reads the source of one class, strips comments,
//! tokenizes it, and builds a parse tree that mirrors the language grammar
//! rule for rule. The tree is rendered as XML for downstream tools.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → TokenStream → Parser → ParseNode → XML
//! ```
//!
//! 1. [`parser::lexer`] — comment stripping and token classification.
//! 2. [`parser::parse`] — recursive descent over the token stream, with a
//!    nesting limit instead of unbounded recursion.
//! 3. [`xml`] — tree and token listings in tagged form.
//! 4. [`analyzer`] — runs the above over a file or a directory of `.jack`
//!    files and writes the results.
//!
//! Semantic analysis and code generation are not part of this crate.
//!
//! ```
//! let analysis = jack_analyzer::analyze_source("class Main { }", 256).unwrap();
//! assert_eq!(analysis.tree.children().len(), 4);
//! ```

pub mod analyzer;
pub mod error;
pub mod parser;
pub mod xml;

pub use analyzer::{analyze_path, analyze_source, Analysis, BatchReport, Options};
pub use error::{AnalyzeError, AnalyzeResult};
pub use parser::lexer::{tokenize, Keyword, LexError, Token, TokenKind, TokenStream};
pub use parser::parse::{parse, ParseError, Parser, DEFAULT_MAX_DEPTH};
pub use parser::tree::{NodeTag, ParseNode};
