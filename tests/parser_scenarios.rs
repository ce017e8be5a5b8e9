// Integration tests for the Jack front end: source text in, parse tree out

use std::fs;
use std::path::Path;

use jack_analyzer::{parse, tokenize, NodeTag, ParseError, ParseNode, TokenKind};

fn parse_source(source: &str) -> Result<ParseNode, ParseError> {
    let tokens = tokenize(source).expect("Tokenizing failed");
    parse(&tokens)
}

/// Parse `body` as the statements of a method.
fn statements_of(body: &str) -> ParseNode {
    let source = format!("class Main {{ method void run() {{ {} }} }}", body);
    let tree = parse_source(&source).expect("Parsing failed");
    tree.find(NodeTag::Statements)
        .expect("method has no statements node")
        .clone()
}

fn leaf(node: &ParseNode) -> (TokenKind, &str) {
    let token = node.token().expect("expected a terminal");
    (token.kind(), token.lexeme())
}

fn assert_single_int_term(node: &ParseNode, value: &str) {
    assert_eq!(node.tag(), Some(NodeTag::Term));
    assert_eq!(node.children().len(), 1);
    assert_eq!(leaf(&node.children()[0]), (TokenKind::IntConstant, value));
}

#[test]
fn test_empty_class() {
    let tree = parse_source("class Main { }").expect("Parsing failed");

    assert_eq!(tree.tag(), Some(NodeTag::Class));
    let children: Vec<(TokenKind, &str)> = tree.children().iter().map(leaf).collect();
    assert_eq!(
        children,
        [
            (TokenKind::Keyword, "class"),
            (TokenKind::Identifier, "Main"),
            (TokenKind::Symbol, "{"),
            (TokenKind::Symbol, "}"),
        ]
    );
}

#[test]
fn test_let_with_flat_expression() {
    let statements = statements_of("let x = 1 + 2;");
    let let_node = &statements.children()[0];

    assert_eq!(let_node.tag(), Some(NodeTag::LetStatement));
    let children = let_node.children();
    assert_eq!(children.len(), 5);
    assert_eq!(leaf(&children[0]), (TokenKind::Keyword, "let"));
    assert_eq!(leaf(&children[1]), (TokenKind::Identifier, "x"));
    assert_eq!(leaf(&children[2]), (TokenKind::Symbol, "="));
    assert_eq!(leaf(&children[4]), (TokenKind::Symbol, ";"));

    let expression = &children[3];
    assert_eq!(expression.tag(), Some(NodeTag::Expression));
    assert_eq!(expression.children().len(), 3);
    assert_single_int_term(&expression.children()[0], "1");
    assert_eq!(leaf(&expression.children()[1]), (TokenKind::Symbol, "+"));
    assert_single_int_term(&expression.children()[2], "2");
}

#[test]
fn test_do_with_qualified_call() {
    let statements = statements_of("do Output.printInt(5);");
    let do_node = &statements.children()[0];

    assert_eq!(do_node.tag(), Some(NodeTag::DoStatement));
    let children = do_node.children();
    assert_eq!(children.len(), 8);
    assert_eq!(leaf(&children[0]), (TokenKind::Keyword, "do"));
    assert_eq!(leaf(&children[1]), (TokenKind::Identifier, "Output"));
    assert_eq!(leaf(&children[2]), (TokenKind::Symbol, "."));
    assert_eq!(leaf(&children[3]), (TokenKind::Identifier, "printInt"));
    assert_eq!(leaf(&children[4]), (TokenKind::Symbol, "("));
    assert_eq!(leaf(&children[6]), (TokenKind::Symbol, ")"));
    assert_eq!(leaf(&children[7]), (TokenKind::Symbol, ";"));

    let list = &children[5];
    assert_eq!(list.tag(), Some(NodeTag::ExpressionList));
    assert_eq!(list.children().len(), 1);
    let expression = &list.children()[0];
    assert_eq!(expression.children().len(), 1);
    assert_single_int_term(&expression.children()[0], "5");
}

#[test]
fn test_let_with_array_index() {
    let statements = statements_of("let a[i] = 0;");
    let children = statements.children()[0].children();

    assert_eq!(children.len(), 8);
    assert_eq!(leaf(&children[1]), (TokenKind::Identifier, "a"));
    assert_eq!(leaf(&children[2]), (TokenKind::Symbol, "["));
    let index = &children[3];
    assert_eq!(index.tag(), Some(NodeTag::Expression));
    assert_eq!(
        leaf(&index.children()[0].children()[0]),
        (TokenKind::Identifier, "i")
    );
    assert_eq!(leaf(&children[4]), (TokenKind::Symbol, "]"));
    assert_eq!(leaf(&children[5]), (TokenKind::Symbol, "="));
}

#[test]
fn test_missing_close_paren_reports_position() {
    let source = "class Main { method void run() { if (x { } } }";
    let err = parse_source(source).unwrap_err();

    // class Main { method void run ( ) { if ( x  → `{` is token 12
    assert_eq!(
        err,
        ParseError::Unexpected {
            expected: "')'".to_string(),
            found: "symbol '{'".to_string(),
            position: 12,
            line: 1,
        }
    );
}

#[test]
fn test_string_with_slash_is_not_a_comment() {
    let statements = statements_of("do Output.printString(\"a/b\"); return;");

    let term = statements
        .find(NodeTag::Term)
        .expect("call argument has a term");
    assert_eq!(leaf(&term.children()[0]), (TokenKind::StringConstant, "a/b"));
    assert_eq!(statements.children().len(), 2);
}

#[test]
fn test_root_has_one_identifier_after_class_keyword() {
    let path = Path::new("tests/fixtures/Square.jack");
    let source = fs::read_to_string(path).expect("Failed to read fixture");
    let tree = parse_source(&source).expect("Parsing failed");

    assert_eq!(tree.tag(), Some(NodeTag::Class));
    assert_eq!(leaf(&tree.children()[0]), (TokenKind::Keyword, "class"));
    assert_eq!(leaf(&tree.children()[1]), (TokenKind::Identifier, "Square"));
    assert!(tree.children()[2].is_terminal());
}

#[test]
fn test_every_token_appears_once_in_order() {
    let source = fs::read_to_string("tests/fixtures/Square.jack").expect("Failed to read fixture");
    let tokens = tokenize(&source).expect("Tokenizing failed");
    let tree = parse(&tokens).expect("Parsing failed");

    let leaves: Vec<(TokenKind, &str)> = tree
        .terminals()
        .into_iter()
        .map(|t| (t.kind(), t.lexeme()))
        .collect();
    let stream: Vec<(TokenKind, &str)> = tokens.iter().map(|t| (t.kind(), t.lexeme())).collect();
    assert_eq!(leaves, stream);
}

#[test]
fn test_fixture_structure() {
    let source = fs::read_to_string("tests/fixtures/Square.jack").expect("Failed to read fixture");
    let tree = parse_source(&source).expect("Parsing failed");

    let tags: Vec<Option<NodeTag>> = tree.children().iter().map(ParseNode::tag).collect();
    let class_var_decs = tags
        .iter()
        .filter(|t| **t == Some(NodeTag::ClassVarDec))
        .count();
    let subroutines = tags
        .iter()
        .filter(|t| **t == Some(NodeTag::SubroutineDec))
        .count();
    assert_eq!(class_var_decs, 2);
    assert_eq!(subroutines, 5);

    // `field int x, y;` keeps the odd-length name tail.
    assert_eq!(tree.children()[3].children().len(), 6);
}

#[test]
fn test_nested_control_flow() {
    let statements = statements_of(
        "while (i < 10) { if (i = 5) { let i = i + 2; } else { do f(i, -i, ~(i)); } let i = i + 1; }",
    );

    let while_node = &statements.children()[0];
    assert_eq!(while_node.tag(), Some(NodeTag::WhileStatement));
    assert_eq!(while_node.children().len(), 7);

    let inner = &while_node.children()[5];
    assert_eq!(inner.tag(), Some(NodeTag::Statements));
    assert_eq!(inner.children().len(), 2);
    assert_eq!(inner.children()[0].children().len(), 11);

    let call_args = inner
        .find(NodeTag::ExpressionList)
        .expect("call has arguments");
    // three expressions, two commas
    assert_eq!(call_args.children().len(), 5);
}

#[test]
fn test_bare_identifier_leaves_next_token_for_caller() {
    let statements = statements_of("let y = x; return y;");

    assert_eq!(statements.children().len(), 2);
    let let_children = statements.children()[0].children();
    assert_eq!(leaf(&let_children[4]), (TokenKind::Symbol, ";"));
}

#[test]
fn test_unexpected_end_of_input() {
    let err = parse_source("class Main { method void run() { let x = ").unwrap_err();

    assert!(matches!(err, ParseError::UnexpectedEof { ref expected, position: 12 } if expected == "a term"));
}

#[test]
fn test_pathological_nesting_is_an_error_not_a_crash() {
    let depth = 20_000;
    let body = format!("let x = {}0;", "-".repeat(depth));
    let source = format!("class Main {{ method void run() {{ {} }} }}", body);

    let err = parse_source(&source).unwrap_err();
    assert!(matches!(err, ParseError::TooDeep { .. }));
}
