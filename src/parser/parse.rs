//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including the error type, cursor helpers, and the main parse entry point.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with one method per grammar
//! rule, organised as:
//! - This module: Parser struct, cursor helpers, and coordination
//! - `declarations`: class, field/static, subroutine and local declarations
//! - `statements`: `let`, `if`, `while`, `do`, `return`
//! - `expressions`: expressions, terms, subroutine calls
//!
//! # Implementation
//!
//! Parser methods are split across multiple files using `impl Parser` blocks,
//! allowing each module to extend the Parser with related functionality while
//! maintaining access to the shared cursor. The cursor only moves forward.
//! Every production leaves it one token past the last token it consumed.

use thiserror::Error;
use tracing::trace;

use crate::parser::lexer::{Keyword, Token, TokenKind, TokenStream};
use crate::parser::tree::ParseNode;

/// Default limit on nested productions before parsing gives up.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Parser error type
///
/// `position` is the index of the offending token in the stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The current token does not fit the active rule.
    #[error("parse error at token {position}, line {line}: expected {expected}, found {found}")]
    Unexpected {
        expected: String,
        found: String,
        position: usize,
        line: usize,
    },

    /// The stream ran out while a rule still needed tokens.
    #[error("parse error at token {position}: unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: String, position: usize },

    /// Nesting went past the configured depth limit.
    #[error("parse error at token {position}, line {line}: nesting deeper than {limit} levels")]
    TooDeep {
        limit: usize,
        position: usize,
        line: usize,
    },

    /// Tokens follow the closing brace of the class.
    #[error("parse error at token {position}, line {line}: expected end of input, found {found}")]
    TrailingInput {
        found: String,
        position: usize,
        line: usize,
    },
}

impl ParseError {
    pub fn position(&self) -> usize {
        match self {
            ParseError::Unexpected { position, .. }
            | ParseError::UnexpectedEof { position, .. }
            | ParseError::TooDeep { position, .. }
            | ParseError::TrailingInput { position, .. } => *position,
        }
    }

    /// Source line, when the error is tied to a token.
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::Unexpected { line, .. }
            | ParseError::TooDeep { line, .. }
            | ParseError::TrailingInput { line, .. } => Some(*line),
            ParseError::UnexpectedEof { .. } => None,
        }
    }
}

/// Recursive descent parser for one compilation unit
pub struct Parser<'a> {
    pub(crate) tokens: &'a TokenStream,
    pub(crate) position: usize,
    pub(crate) depth: usize,
    pub(crate) max_depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a TokenStream) -> Self {
        Self {
            tokens,
            position: 0,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Override the nesting limit.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parse the whole stream as a single class.
    ///
    /// The stream must start with `class` and end with the class's closing `}`.
    pub fn parse(&mut self) -> Result<ParseNode, ParseError> {
        let class = self.parse_class()?;

        if let Some(token) = self.peek() {
            return Err(ParseError::TrailingInput {
                found: token.to_string(),
                position: self.position,
                line: token.line(),
            });
        }

        trace!(tokens = self.position, "parsed class");
        Ok(class)
    }

    /// Index of the current token.
    pub fn position(&self) -> usize {
        self.position
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    /// Current token without consuming it.
    pub(crate) fn peek(&self) -> Option<&'a Token> {
        self.peek_ahead(0)
    }

    /// Token `n` places past the current one.
    pub(crate) fn peek_ahead(&self, n: usize) -> Option<&'a Token> {
        let tokens: &'a TokenStream = self.tokens;
        tokens.get(self.position + n)
    }

    /// Consume the current token. Past the end this does nothing.
    pub(crate) fn advance(&mut self) -> Option<&'a Token> {
        if self.is_at_end() {
            return None;
        }
        let token = self.peek()?;
        self.position += 1;
        Some(token)
    }

    /// Consume the current token as a leaf, whatever it is.
    pub(crate) fn bump(&mut self) -> Result<ParseNode, ParseError> {
        match self.advance() {
            Some(token) => Ok(ParseNode::Terminal(token.clone())),
            None => Err(self.error_expected("a token")),
        }
    }

    pub(crate) fn check_symbol(&self, symbol: char) -> bool {
        self.peek().is_some_and(|t| t.is_symbol(symbol))
    }

    pub(crate) fn check_keyword(&self, keyword: Keyword) -> bool {
        self.peek().is_some_and(|t| t.is_keyword(keyword))
    }

    pub(crate) fn check_keyword_in(&self, keywords: &[Keyword]) -> bool {
        self.peek()
            .and_then(Token::keyword)
            .is_some_and(|k| keywords.contains(&k))
    }

    pub(crate) fn expect_symbol(&mut self, symbol: char) -> Result<ParseNode, ParseError> {
        if self.check_symbol(symbol) {
            self.bump()
        } else {
            Err(self.error_expected(format!("'{}'", symbol)))
        }
    }

    pub(crate) fn expect_keyword(&mut self, keyword: Keyword) -> Result<ParseNode, ParseError> {
        if self.check_keyword(keyword) {
            self.bump()
        } else {
            Err(self.error_expected(format!("'{}'", keyword)))
        }
    }

    /// Consume one of `keywords`; `expected` describes the set in errors.
    pub(crate) fn expect_keyword_in(
        &mut self,
        keywords: &[Keyword],
        expected: &str,
    ) -> Result<ParseNode, ParseError> {
        if self.check_keyword_in(keywords) {
            self.bump()
        } else {
            Err(self.error_expected(expected))
        }
    }

    /// Consume an identifier; `what` names its role, e.g. "variable name".
    pub(crate) fn expect_identifier(&mut self, what: &str) -> Result<ParseNode, ParseError> {
        match self.peek() {
            Some(token) if token.kind() == TokenKind::Identifier => self.bump(),
            _ => Err(self.error_expected(what)),
        }
    }

    /// Build the error for "wanted `expected` at the current position".
    pub(crate) fn error_expected(&self, expected: impl Into<String>) -> ParseError {
        let expected = expected.into();
        match self.peek() {
            Some(token) => ParseError::Unexpected {
                expected,
                found: token.to_string(),
                position: self.position,
                line: token.line(),
            },
            None => ParseError::UnexpectedEof {
                expected,
                position: self.position,
            },
        }
    }

    /// Run a recursive production one level deeper, enforcing the depth limit.
    pub(crate) fn nested<T>(
        &mut self,
        production: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= self.max_depth {
            return Err(ParseError::TooDeep {
                limit: self.max_depth,
                position: self.position,
                line: self.current_line(),
            });
        }

        self.depth += 1;
        let result = production(self);
        self.depth -= 1;
        result
    }

    /// Line of the current token, or of the last token once the stream is
    /// exhausted.
    fn current_line(&self) -> usize {
        self.peek()
            .or_else(|| self.tokens.as_slice().last())
            .map_or(0, Token::line)
    }
}

/// Parse a token stream into a tree rooted at `class`.
pub fn parse(tokens: &TokenStream) -> Result<ParseNode, ParseError> {
    Parser::new(tokens).parse()
}
