//! Statement parsing implementation
//!
//! This module handles parsing of the five Jack statement types:
//!
//! - Assignment: `let x = e;`, `let a[i] = e;`
//! - Control flow: `if (...) { ... } else { ... }`, `while (...) { ... }`
//! - Calls for effect: `do Output.printInt(5);`
//! - `return;` and `return e;`
//!
//! # Grammar
//!
//! ```text
//! statements      ::= statement*
//! statement       ::= letStatement | ifStatement | whileStatement
//!                   | doStatement | returnStatement
//! letStatement    ::= 'let' varName ('[' expression ']')? '=' expression ';'
//! ifStatement     ::= 'if' '(' expression ')' '{' statements '}'
//!                     ('else' '{' statements '}')?
//! whileStatement  ::= 'while' '(' expression ')' '{' statements '}'
//! doStatement     ::= 'do' subroutineCall ';'
//! returnStatement ::= 'return' expression? ';'
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::lexer::{Keyword, Token};
use crate::parser::parse::{ParseError, Parser};
use crate::parser::tree::{NodeTag, ParseNode};

impl<'a> Parser<'a> {
    /// Parse statements until a token that cannot start one.
    pub(crate) fn parse_statements(&mut self) -> Result<ParseNode, ParseError> {
        self.nested(|p| {
            let mut children = Vec::new();

            while let Some(keyword) = p.peek().and_then(Token::keyword) {
                let statement = match keyword {
                    Keyword::Let => p.parse_let_statement()?,
                    Keyword::If => p.parse_if_statement()?,
                    Keyword::While => p.parse_while_statement()?,
                    Keyword::Do => p.parse_do_statement()?,
                    Keyword::Return => p.parse_return_statement()?,
                    _ => break,
                };
                children.push(statement);
            }

            Ok(ParseNode::non_terminal(NodeTag::Statements, children))
        })
    }

    /// Parse let statement
    pub(crate) fn parse_let_statement(&mut self) -> Result<ParseNode, ParseError> {
        let mut children = vec![
            self.expect_keyword(Keyword::Let)?,
            self.expect_identifier("variable name")?,
        ];

        if self.check_symbol('[') {
            children.push(self.bump()?);
            children.push(self.parse_expression()?);
            children.push(self.expect_symbol(']')?);
        }

        children.push(self.expect_symbol('=')?);
        children.push(self.parse_expression()?);
        children.push(self.expect_symbol(';')?);

        Ok(ParseNode::non_terminal(NodeTag::LetStatement, children))
    }

    /// Parse if statement, with its optional else branch
    pub(crate) fn parse_if_statement(&mut self) -> Result<ParseNode, ParseError> {
        let mut children = vec![self.expect_keyword(Keyword::If)?];
        self.parse_condition(&mut children)?;
        self.parse_block(&mut children)?;

        if self.check_keyword(Keyword::Else) {
            children.push(self.bump()?);
            self.parse_block(&mut children)?;
        }

        Ok(ParseNode::non_terminal(NodeTag::IfStatement, children))
    }

    /// Parse while statement
    pub(crate) fn parse_while_statement(&mut self) -> Result<ParseNode, ParseError> {
        let mut children = vec![self.expect_keyword(Keyword::While)?];
        self.parse_condition(&mut children)?;
        self.parse_block(&mut children)?;

        Ok(ParseNode::non_terminal(NodeTag::WhileStatement, children))
    }

    /// Parse do statement. The call's tokens sit directly under the statement.
    pub(crate) fn parse_do_statement(&mut self) -> Result<ParseNode, ParseError> {
        let mut children = vec![self.expect_keyword(Keyword::Do)?];
        self.parse_subroutine_call(&mut children)?;
        children.push(self.expect_symbol(';')?);

        Ok(ParseNode::non_terminal(NodeTag::DoStatement, children))
    }

    /// Parse return statement
    pub(crate) fn parse_return_statement(&mut self) -> Result<ParseNode, ParseError> {
        let mut children = vec![self.expect_keyword(Keyword::Return)?];

        if !self.check_symbol(';') {
            children.push(self.parse_expression()?);
        }

        children.push(self.expect_symbol(';')?);

        Ok(ParseNode::non_terminal(NodeTag::ReturnStatement, children))
    }

    /// `'(' expression ')'`
    fn parse_condition(&mut self, children: &mut Vec<ParseNode>) -> Result<(), ParseError> {
        children.push(self.expect_symbol('(')?);
        children.push(self.parse_expression()?);
        children.push(self.expect_symbol(')')?);
        Ok(())
    }

    /// `'{' statements '}'`
    fn parse_block(&mut self, children: &mut Vec<ParseNode>) -> Result<(), ParseError> {
        children.push(self.expect_symbol('{')?);
        children.push(self.parse_statements()?);
        children.push(self.expect_symbol('}')?);
        Ok(())
    }
}
