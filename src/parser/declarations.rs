//! Declaration parsing implementation
//!
//! This module handles the program-structure rules of a Jack class:
//!
//! - The class itself: `class Name { ... }`
//! - Class-level variables: `static int count;`, `field Point a, b;`
//! - Subroutines: constructors, functions and methods with their parameters
//! - Subroutine bodies and their local `var` declarations
//!
//! # Grammar
//!
//! ```text
//! class          ::= 'class' className '{' classVarDec* subroutineDec* '}'
//! classVarDec    ::= ('static' | 'field') type varName (',' varName)* ';'
//! type           ::= 'int' | 'char' | 'boolean' | 'void' | className
//! subroutineDec  ::= ('constructor' | 'function' | 'method') type
//!                    subroutineName '(' parameterList ')' subroutineBody
//! parameterList  ::= ((type varName) (',' type varName)*)?
//! subroutineBody ::= '{' varDec* statements '}'
//! varDec         ::= 'var' type varName (',' varName)* ';'
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::lexer::{Keyword, TokenKind};
use crate::parser::parse::{ParseError, Parser};
use crate::parser::tree::{NodeTag, ParseNode};

const CLASS_VAR_KINDS: &[Keyword] = &[Keyword::Static, Keyword::Field];
const SUBROUTINE_KINDS: &[Keyword] = &[Keyword::Constructor, Keyword::Function, Keyword::Method];

impl<'a> Parser<'a> {
    /// Parse the class that makes up the compilation unit
    pub(crate) fn parse_class(&mut self) -> Result<ParseNode, ParseError> {
        let mut children = vec![
            self.expect_keyword(Keyword::Class)?,
            self.expect_identifier("class name")?,
            self.expect_symbol('{')?,
        ];

        while self.check_keyword_in(CLASS_VAR_KINDS) {
            children.push(self.parse_class_var_dec()?);
        }

        while self.check_keyword_in(SUBROUTINE_KINDS) {
            children.push(self.parse_subroutine_dec()?);
        }

        children.push(self.expect_symbol('}')?);

        Ok(ParseNode::non_terminal(NodeTag::Class, children))
    }

    /// Parse a `static` or `field` declaration
    pub(crate) fn parse_class_var_dec(&mut self) -> Result<ParseNode, ParseError> {
        let mut children = vec![
            self.expect_keyword_in(CLASS_VAR_KINDS, "'static' or 'field'")?,
            self.parse_type()?,
        ];
        self.parse_var_names(&mut children)?;
        children.push(self.expect_symbol(';')?);

        Ok(ParseNode::non_terminal(NodeTag::ClassVarDec, children))
    }

    /// Parse a type: a primitive type keyword or a class name.
    ///
    /// Class names are not checked against any declared class.
    pub(crate) fn parse_type(&mut self) -> Result<ParseNode, ParseError> {
        let Some(token) = self.peek() else {
            return Err(self.error_expected("a type"));
        };

        match token.kind() {
            TokenKind::Keyword => match token.keyword() {
                Some(Keyword::Int | Keyword::Char | Keyword::Boolean | Keyword::Void) => self.bump(),
                _ => Err(self.error_expected("a type")),
            },
            TokenKind::Identifier => self.bump(),
            _ => Err(self.error_expected("a type")),
        }
    }

    /// Parse a constructor, function or method
    pub(crate) fn parse_subroutine_dec(&mut self) -> Result<ParseNode, ParseError> {
        let children = vec![
            self.expect_keyword_in(SUBROUTINE_KINDS, "'constructor', 'function' or 'method'")?,
            self.parse_type()?,
            self.expect_identifier("subroutine name")?,
            self.expect_symbol('(')?,
            self.parse_parameter_list()?,
            self.expect_symbol(')')?,
            self.parse_subroutine_body()?,
        ];

        Ok(ParseNode::non_terminal(NodeTag::SubroutineDec, children))
    }

    /// Parse a possibly empty parameter list, without the parentheses
    pub(crate) fn parse_parameter_list(&mut self) -> Result<ParseNode, ParseError> {
        let mut children = Vec::new();

        if !self.check_symbol(')') {
            children.push(self.parse_type()?);
            children.push(self.expect_identifier("parameter name")?);

            while self.check_symbol(',') {
                children.push(self.bump()?);
                children.push(self.parse_type()?);
                children.push(self.expect_identifier("parameter name")?);
            }
        }

        Ok(ParseNode::non_terminal(NodeTag::ParameterList, children))
    }

    /// Parse `{ varDec* statements }`
    pub(crate) fn parse_subroutine_body(&mut self) -> Result<ParseNode, ParseError> {
        let mut children = vec![self.expect_symbol('{')?];

        while self.check_keyword(Keyword::Var) {
            children.push(self.parse_var_dec()?);
        }

        children.push(self.parse_statements()?);
        children.push(self.expect_symbol('}')?);

        Ok(ParseNode::non_terminal(NodeTag::SubroutineBody, children))
    }

    /// Parse a local `var` declaration
    pub(crate) fn parse_var_dec(&mut self) -> Result<ParseNode, ParseError> {
        let mut children = vec![self.expect_keyword(Keyword::Var)?, self.parse_type()?];
        self.parse_var_names(&mut children)?;
        children.push(self.expect_symbol(';')?);

        Ok(ParseNode::non_terminal(NodeTag::VarDec, children))
    }

    /// `varName (',' varName)*`, appended to the enclosing rule.
    fn parse_var_names(&mut self, children: &mut Vec<ParseNode>) -> Result<(), ParseError> {
        children.push(self.expect_identifier("variable name")?);

        while self.check_symbol(',') {
            children.push(self.bump()?);
            children.push(self.expect_identifier("variable name")?);
        }

        Ok(())
    }
}
