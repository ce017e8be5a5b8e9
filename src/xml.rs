//! XML rendering of token streams and parse trees
//!
//! Non-terminals become an open/close tag pair named after the rule, each on
//! its own line, with children indented two spaces further. Terminals are a
//! single line such as `<symbol> ; </symbol>`, with exactly one space inside
//! each tag. Output is byte-for-byte stable for a given tree.

use std::borrow::Cow;
use std::fmt::{self, Write};

use crate::parser::lexer::{Token, TokenStream};
use crate::parser::tree::ParseNode;

const INDENT: &str = "  ";

/// Escape the characters that are markup in XML.
pub fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['<', '>', '&', '"']) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        match ch {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    Cow::Owned(escaped)
}

fn write_terminal<W: Write>(out: &mut W, token: &Token) -> fmt::Result {
    let tag = token.kind().xml_tag();
    writeln!(out, "<{tag}> {} </{tag}>", escape(token.lexeme()))
}

/// Write `node` and everything below it, starting at indentation `depth`.
pub fn write_node<W: Write>(out: &mut W, node: &ParseNode, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        out.write_str(INDENT)?;
    }

    match node {
        ParseNode::Terminal(token) => write_terminal(out, token),
        ParseNode::NonTerminal { tag, children } => {
            writeln!(out, "<{}>", tag)?;
            for child in children {
                write_node(out, child, depth + 1)?;
            }
            for _ in 0..depth {
                out.write_str(INDENT)?;
            }
            writeln!(out, "</{}>", tag)
        }
    }
}

/// Render a parse tree.
pub fn tree_to_xml(root: &ParseNode) -> String {
    root.to_string()
}

/// Render a flat token listing wrapped in `<tokens>`.
pub fn tokens_to_xml(tokens: &TokenStream) -> String {
    TokenListing(tokens).to_string()
}

struct TokenListing<'a>(&'a TokenStream);

impl fmt::Display for TokenListing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "<tokens>")?;
        for token in self.0 {
            write_terminal(f, token)?;
        }
        writeln!(f, "</tokens>")
    }
}
