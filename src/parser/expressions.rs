//! Expression parsing implementation
//!
//! Jack expressions have no operator precedence: an expression is a flat,
//! left-to-right list of terms separated by binary operators, and grouping is
//! only ever explicit through parentheses.
//!
//! # Grammar
//!
//! ```text
//! expression     ::= term (op term)*
//! term           ::= integerConstant | stringConstant | keywordConstant
//!                  | varName | varName '[' expression ']' | subroutineCall
//!                  | '(' expression ')' | unaryOp term
//! subroutineCall ::= subroutineName '(' expressionList ')'
//!                  | (className | varName) '.' subroutineName '(' expressionList ')'
//! expressionList ::= (expression (',' expression)*)?
//! op             ::= '+' | '-' | '*' | '/' | '&' | '|' | '<' | '>' | '='
//! unaryOp        ::= '-' | '~' | '^' | '#'
//! ```
//!
//! A term starting with an identifier is the one place where the current
//! token is not enough: the token after it decides between a variable, an
//! array element and a call.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::lexer::{Keyword, Token, TokenKind};
use crate::parser::parse::{ParseError, Parser};
use crate::parser::tree::{NodeTag, ParseNode};

/// Binary operators, all at one precedence level.
pub const BINARY_OPERATORS: &[char] = &['+', '-', '*', '/', '&', '|', '<', '>', '='];

/// Prefix operators. `^` shifts left and `#` shifts right.
pub const UNARY_OPERATORS: &[char] = &['-', '~', '^', '#'];

impl<'a> Parser<'a> {
    /// Parse expression: a term followed by any number of (op, term) pairs
    pub(crate) fn parse_expression(&mut self) -> Result<ParseNode, ParseError> {
        self.nested(|p| {
            let mut children = vec![p.parse_term()?];

            while p.check_symbol_in(BINARY_OPERATORS) {
                children.push(p.bump()?);
                children.push(p.parse_term()?);
            }

            Ok(ParseNode::non_terminal(NodeTag::Expression, children))
        })
    }

    /// Parse a single term
    pub(crate) fn parse_term(&mut self) -> Result<ParseNode, ParseError> {
        self.nested(|p| {
            let Some(token) = p.peek() else {
                return Err(p.error_expected("a term"));
            };
            let mut children = Vec::new();

            match token.kind() {
                TokenKind::IntConstant | TokenKind::StringConstant => children.push(p.bump()?),
                TokenKind::Keyword => match token.keyword() {
                    Some(Keyword::True | Keyword::False | Keyword::Null | Keyword::This) => {
                        children.push(p.bump()?)
                    }
                    _ => return Err(p.error_expected("a term")),
                },
                TokenKind::Symbol => match token.symbol() {
                    Some('(') => {
                        children.push(p.bump()?);
                        children.push(p.parse_expression()?);
                        children.push(p.expect_symbol(')')?);
                    }
                    Some(op) if UNARY_OPERATORS.contains(&op) => {
                        children.push(p.bump()?);
                        children.push(p.parse_term()?);
                    }
                    _ => return Err(p.error_expected("a term")),
                },
                TokenKind::Identifier => match p.peek_ahead(1).and_then(Token::symbol) {
                    Some('[') => {
                        children.push(p.bump()?);
                        children.push(p.bump()?);
                        children.push(p.parse_expression()?);
                        children.push(p.expect_symbol(']')?);
                    }
                    Some('(' | '.') => p.parse_subroutine_call(&mut children)?,
                    // A plain variable; the next token belongs to the caller.
                    _ => children.push(p.bump()?),
                },
            }

            Ok(ParseNode::non_terminal(NodeTag::Term, children))
        })
    }

    /// Parse a subroutine call, appending its tokens to the enclosing rule.
    pub(crate) fn parse_subroutine_call(
        &mut self,
        children: &mut Vec<ParseNode>,
    ) -> Result<(), ParseError> {
        children.push(self.expect_identifier("subroutine, class or variable name")?);

        if self.check_symbol('.') {
            children.push(self.bump()?);
            children.push(self.expect_identifier("subroutine name")?);
        }

        children.push(self.expect_symbol('(')?);
        children.push(self.parse_expression_list()?);
        children.push(self.expect_symbol(')')?);

        Ok(())
    }

    /// Parse a possibly empty, comma separated list of call arguments
    pub(crate) fn parse_expression_list(&mut self) -> Result<ParseNode, ParseError> {
        let mut children = Vec::new();

        if !self.check_symbol(')') {
            children.push(self.parse_expression()?);

            while self.check_symbol(',') {
                children.push(self.bump()?);
                children.push(self.parse_expression()?);
            }
        }

        Ok(ParseNode::non_terminal(NodeTag::ExpressionList, children))
    }

    fn check_symbol_in(&self, symbols: &[char]) -> bool {
        self.peek()
            .and_then(Token::symbol)
            .is_some_and(|s| symbols.contains(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::tokenize;
    use crate::parser::parse::parse;

    /// Parse `expr` as the value of a return statement.
    fn expression_of(expr: &str) -> Result<ParseNode, ParseError> {
        let source = format!("class T {{ function int f() {{ return {}; }} }}", expr);
        let tree = parse(&tokenize(&source).unwrap())?;
        Ok(tree.find(NodeTag::Expression).unwrap().clone())
    }

    fn shape(node: &ParseNode) -> String {
        match node {
            ParseNode::Terminal(token) => token.lexeme().to_string(),
            ParseNode::NonTerminal { tag, children } => {
                let inner: Vec<String> = children.iter().map(shape).collect();
                format!("{}({})", tag, inner.join(" "))
            }
        }
    }

    #[test]
    fn test_flat_left_to_right() {
        let expr = expression_of("1 + 2 * 3").unwrap();

        assert_eq!(
            shape(&expr),
            "expression(term(1) + term(2) * term(3))"
        );
    }

    #[test]
    fn test_comparison_and_bitwise_operators() {
        let expr = expression_of("a < b & c = d | e > f").unwrap();
        let ops: Vec<&str> = expr
            .children()
            .iter()
            .filter_map(ParseNode::token)
            .map(Token::lexeme)
            .collect();

        assert_eq!(ops, ["<", "&", "=", "|", ">"]);
    }

    #[test]
    fn test_unary_operators_nest() {
        let expr = expression_of("-~^#x").unwrap();

        assert_eq!(
            shape(&expr),
            "expression(term(- term(~ term(^ term(# term(x))))))"
        );
    }

    #[test]
    fn test_identifier_lookahead() {
        assert_eq!(shape(&expression_of("x").unwrap()), "expression(term(x))");
        assert_eq!(
            shape(&expression_of("a[i + 1]").unwrap()),
            "expression(term(a [ expression(term(i) + term(1)) ]))"
        );
        assert_eq!(
            shape(&expression_of("g()").unwrap()),
            "expression(term(g ( expressionList() )))"
        );
        assert_eq!(
            shape(&expression_of("Math.max(a, 2)").unwrap()),
            "expression(term(Math . max ( expressionList(expression(term(a)) , expression(term(2))) )))"
        );
    }

    #[test]
    fn test_constants_and_grouping() {
        assert_eq!(
            shape(&expression_of("(true) = \"s\"").unwrap()),
            "expression(term(( expression(term(true)) )) = term(s))"
        );
        assert_eq!(shape(&expression_of("this").unwrap()), "expression(term(this))");
        assert_eq!(shape(&expression_of("null").unwrap()), "expression(term(null))");
    }

    #[test]
    fn test_keyword_is_not_a_term() {
        let err = expression_of("let").unwrap_err();

        assert!(matches!(
            err,
            ParseError::Unexpected { ref expected, ref found, .. }
                if expected == "a term" && found == "keyword 'let'"
        ));
    }

    #[test]
    fn test_dangling_operator() {
        let err = expression_of("1 +").unwrap_err();

        assert!(matches!(
            err,
            ParseError::Unexpected { ref expected, ref found, .. }
                if expected == "a term" && found == "symbol ';'"
        ));
    }

    #[test]
    fn test_qualified_call_needs_a_name() {
        let err = expression_of("Math.(1)").unwrap_err();

        assert!(matches!(
            err,
            ParseError::Unexpected { ref expected, .. } if expected == "subroutine name"
        ));
    }
}
