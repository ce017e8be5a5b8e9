//! Parse tree definitions
//!
//! The tree mirrors the grammar directly: every [`ParseNode::NonTerminal`] is
//! one application of a grammar rule and every [`ParseNode::Terminal`] is a
//! token consumed by that rule. Rules that only rename a token (`className`,
//! `varName`, `type`, `op`, ...) and `subroutineCall` do not get nodes of
//! their own; their tokens sit directly in the enclosing rule.

use std::fmt;

use super::lexer::Token;

/// Grammar rules that appear as interior nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeTag {
    Class,
    ClassVarDec,
    SubroutineDec,
    ParameterList,
    SubroutineBody,
    VarDec,
    Statements,
    LetStatement,
    IfStatement,
    WhileStatement,
    DoStatement,
    ReturnStatement,
    Expression,
    Term,
    ExpressionList,
}

impl NodeTag {
    /// The rule name as written in the grammar.
    pub fn as_str(self) -> &'static str {
        match self {
            NodeTag::Class => "class",
            NodeTag::ClassVarDec => "classVarDec",
            NodeTag::SubroutineDec => "subroutineDec",
            NodeTag::ParameterList => "parameterList",
            NodeTag::SubroutineBody => "subroutineBody",
            NodeTag::VarDec => "varDec",
            NodeTag::Statements => "statements",
            NodeTag::LetStatement => "letStatement",
            NodeTag::IfStatement => "ifStatement",
            NodeTag::WhileStatement => "whileStatement",
            NodeTag::DoStatement => "doStatement",
            NodeTag::ReturnStatement => "returnStatement",
            NodeTag::Expression => "expression",
            NodeTag::Term => "term",
            NodeTag::ExpressionList => "expressionList",
        }
    }
}

impl fmt::Display for NodeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node of the parse tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseNode {
    NonTerminal {
        tag: NodeTag,
        children: Vec<ParseNode>,
    },
    Terminal(Token),
}

impl ParseNode {
    pub fn non_terminal(tag: NodeTag, children: Vec<ParseNode>) -> Self {
        ParseNode::NonTerminal { tag, children }
    }

    /// Rule tag, or `None` for a terminal.
    pub fn tag(&self) -> Option<NodeTag> {
        match self {
            ParseNode::NonTerminal { tag, .. } => Some(*tag),
            ParseNode::Terminal(_) => None,
        }
    }

    /// Children in source order; empty for a terminal.
    pub fn children(&self) -> &[ParseNode] {
        match self {
            ParseNode::NonTerminal { children, .. } => children,
            ParseNode::Terminal(_) => &[],
        }
    }

    pub fn token(&self) -> Option<&Token> {
        match self {
            ParseNode::Terminal(token) => Some(token),
            ParseNode::NonTerminal { .. } => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ParseNode::Terminal(_))
    }

    /// First node tagged `tag` in a pre-order walk, including `self`.
    pub fn find(&self, tag: NodeTag) -> Option<&ParseNode> {
        if self.tag() == Some(tag) {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(tag))
    }

    /// All tokens under this node, left to right.
    pub fn terminals(&self) -> Vec<&Token> {
        let mut tokens = Vec::new();
        self.collect_terminals(&mut tokens);
        tokens
    }

    fn collect_terminals<'a>(&'a self, tokens: &mut Vec<&'a Token>) {
        match self {
            ParseNode::Terminal(token) => tokens.push(token),
            ParseNode::NonTerminal { children, .. } => {
                for child in children {
                    child.collect_terminals(tokens);
                }
            }
        }
    }
}

/// Renders the node in the XML layout of [`crate::xml`].
impl fmt::Display for ParseNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::xml::write_node(f, self, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::TokenKind;

    fn leaf(kind: TokenKind, lexeme: &str) -> ParseNode {
        ParseNode::Terminal(Token::new(kind, lexeme, 1))
    }

    #[test]
    fn test_find_and_terminals() {
        let term = ParseNode::non_terminal(
            NodeTag::Term,
            vec![leaf(TokenKind::IntConstant, "5")],
        );
        let expression = ParseNode::non_terminal(NodeTag::Expression, vec![term]);
        let root = ParseNode::non_terminal(
            NodeTag::ReturnStatement,
            vec![
                leaf(TokenKind::Keyword, "return"),
                expression,
                leaf(TokenKind::Symbol, ";"),
            ],
        );

        let found = root.find(NodeTag::Term).unwrap();
        assert_eq!(found.children()[0].token().unwrap().lexeme(), "5");

        let lexemes: Vec<&str> = root.terminals().iter().map(|t| t.lexeme()).collect();
        assert_eq!(lexemes, ["return", "5", ";"]);
        assert!(root.find(NodeTag::Class).is_none());
    }

    #[test]
    fn test_tag_names() {
        assert_eq!(NodeTag::ClassVarDec.as_str(), "classVarDec");
        assert_eq!(NodeTag::ExpressionList.to_string(), "expressionList");
    }
}
