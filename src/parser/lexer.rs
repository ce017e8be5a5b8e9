//! Lexer (tokenizer) for Jack source code
//!
//! Converts the source text of one compilation unit into a flat [`TokenStream`]
//! consumed by the parser. Work happens in two passes over the lines of the
//! input:
//!
//! 1. [`strip_comments`] removes `// ...`, `/* ... */` and `/** ... */`
//!    comments while tracking string constants, so a `/` inside `"a/b"` is
//!    never taken for a comment marker.
//! 2. Each comment-free line is split into raw tokens on whitespace, symbol
//!    characters and quotes, and every raw token is passed through
//!    [`classify`].

use std::fmt;

use thiserror::Error;
use tracing::trace;

/// Every character that forms a one-character symbol token.
///
/// Includes the two shift operators `^` (shift left) and `#` (shift right).
pub const SYMBOLS: &[char] = &[
    '{', '}', '(', ')', '[', ']', '.', ',', ';', '+', '-', '*', '/', '&', '|', '<', '>', '=',
    '~', '^', '#',
];

/// Largest value an integer constant may hold.
pub const MAX_INT_CONSTANT: u16 = 32767;

/// The five lexical categories of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword,
    Symbol,
    Identifier,
    IntConstant,
    StringConstant,
}

impl TokenKind {
    /// Tag name used for this kind in the XML output.
    pub fn xml_tag(self) -> &'static str {
        match self {
            TokenKind::Keyword => "keyword",
            TokenKind::Symbol => "symbol",
            TokenKind::Identifier => "identifier",
            TokenKind::IntConstant => "integerConstant",
            TokenKind::StringConstant => "stringConstant",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Keyword => "keyword",
            TokenKind::Symbol => "symbol",
            TokenKind::Identifier => "identifier",
            TokenKind::IntConstant => "integer constant",
            TokenKind::StringConstant => "string constant",
        };
        f.write_str(name)
    }
}

/// Reserved words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Class,
    Constructor,
    Function,
    Method,
    Field,
    Static,
    Var,
    Int,
    Char,
    Boolean,
    Void,
    True,
    False,
    Null,
    This,
    Let,
    Do,
    If,
    Else,
    While,
    Return,
}

impl Keyword {
    /// Look up the keyword spelled exactly `lexeme`.
    pub fn from_lexeme(lexeme: &str) -> Option<Self> {
        let keyword = match lexeme {
            "class" => Keyword::Class,
            "constructor" => Keyword::Constructor,
            "function" => Keyword::Function,
            "method" => Keyword::Method,
            "field" => Keyword::Field,
            "static" => Keyword::Static,
            "var" => Keyword::Var,
            "int" => Keyword::Int,
            "char" => Keyword::Char,
            "boolean" => Keyword::Boolean,
            "void" => Keyword::Void,
            "true" => Keyword::True,
            "false" => Keyword::False,
            "null" => Keyword::Null,
            "this" => Keyword::This,
            "let" => Keyword::Let,
            "do" => Keyword::Do,
            "if" => Keyword::If,
            "else" => Keyword::Else,
            "while" => Keyword::While,
            "return" => Keyword::Return,
            _ => return None,
        };
        Some(keyword)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Class => "class",
            Keyword::Constructor => "constructor",
            Keyword::Function => "function",
            Keyword::Method => "method",
            Keyword::Field => "field",
            Keyword::Static => "static",
            Keyword::Var => "var",
            Keyword::Int => "int",
            Keyword::Char => "char",
            Keyword::Boolean => "boolean",
            Keyword::Void => "void",
            Keyword::True => "true",
            Keyword::False => "false",
            Keyword::Null => "null",
            Keyword::This => "this",
            Keyword::Let => "let",
            Keyword::Do => "do",
            Keyword::If => "if",
            Keyword::Else => "else",
            Keyword::While => "while",
            Keyword::Return => "return",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified lexeme.
///
/// String constants hold their text without the surrounding quotes. `line` is
/// the 1-based source line the token appears on and only feeds diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    lexeme: String,
    line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
        }
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    pub fn line(&self) -> usize {
        self.line
    }

    /// The keyword this token spells, if it is a keyword token.
    pub fn keyword(&self) -> Option<Keyword> {
        match self.kind {
            TokenKind::Keyword => Keyword::from_lexeme(&self.lexeme),
            _ => None,
        }
    }

    /// The symbol character, if this is a symbol token.
    pub fn symbol(&self) -> Option<char> {
        match self.kind {
            TokenKind::Symbol => self.lexeme.chars().next(),
            _ => None,
        }
    }

    pub fn int_value(&self) -> Option<u16> {
        match self.kind {
            TokenKind::IntConstant => self.lexeme.parse().ok(),
            _ => None,
        }
    }

    pub fn is_symbol(&self, symbol: char) -> bool {
        self.symbol() == Some(symbol)
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.keyword() == Some(keyword)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::StringConstant => write!(f, "string constant \"{}\"", self.lexeme),
            TokenKind::IntConstant => write!(f, "integer constant {}", self.lexeme),
            kind => write!(f, "{} '{}'", kind, self.lexeme),
        }
    }
}

/// The ordered tokens of one compilation unit. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }
}

impl<'a> IntoIterator for &'a TokenStream {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

/// Lexer error type
///
/// Any of these makes the whole compilation unit unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// A `"` was opened and the line ended before it was closed.
    #[error("lex error at line {line}: unterminated string constant")]
    UnterminatedString { line: usize },

    /// A `/*` was never closed before the end of input.
    #[error("lex error at line {line}: unterminated block comment")]
    UnterminatedComment { line: usize },

    /// An all-digit lexeme too large to be an integer constant.
    #[error("lex error at line {line}: integer constant {lexeme} is outside 0..=32767")]
    IntegerOutOfRange { lexeme: String, line: usize },
}

impl LexError {
    pub fn line(&self) -> usize {
        match self {
            LexError::UnterminatedString { line }
            | LexError::UnterminatedComment { line }
            | LexError::IntegerOutOfRange { line, .. } => *line,
        }
    }
}

/// Classify a raw lexeme.
///
/// Precedence is keyword, then symbol, then all digits, then a quoted string,
/// and anything else is an identifier. The function looks at nothing but the
/// lexeme.
pub fn classify(lexeme: &str) -> TokenKind {
    let mut chars = lexeme.chars();
    let first = chars.next();
    let single = first.filter(|_| chars.next().is_none());

    if Keyword::from_lexeme(lexeme).is_some() {
        TokenKind::Keyword
    } else if single.is_some_and(|c| SYMBOLS.contains(&c)) {
        TokenKind::Symbol
    } else if !lexeme.is_empty() && lexeme.bytes().all(|b| b.is_ascii_digit()) {
        TokenKind::IntConstant
    } else if lexeme.len() >= 2 && lexeme.starts_with('"') && lexeme.ends_with('"') {
        TokenKind::StringConstant
    } else {
        TokenKind::Identifier
    }
}

/// Split source text into lines, accepting `\n`, `\r\n` and bare `\r`.
fn source_lines(source: &str) -> impl Iterator<Item = &str> {
    let mut rest = Some(source);
    std::iter::from_fn(move || {
        let text = rest?;
        if text.is_empty() {
            rest = None;
            return None;
        }
        match text.find(['\n', '\r']) {
            Some(end) => {
                let skip = if text[end..].starts_with("\r\n") { 2 } else { 1 };
                rest = Some(&text[end + skip..]);
                Some(&text[..end])
            }
            None => {
                rest = None;
                Some(text)
            }
        }
    })
}

/// Remove every comment from `source`.
///
/// The result keeps one line per input line, each terminated by `\n`, so line
/// numbers are unchanged. A block comment is replaced by a single space so it
/// still separates the tokens around it. Running this on its own output is a
/// no-op.
pub fn strip_comments(source: &str) -> Result<String, LexError> {
    let mut output = String::with_capacity(source.len());
    // Line on which the currently open block comment started.
    let mut open_comment: Option<usize> = None;

    for (index, line) in source_lines(source).enumerate() {
        let chars: Vec<char> = line.chars().collect();
        let mut in_string = false;
        let mut i = 0;

        while i < chars.len() {
            let ch = chars[i];
            let next = chars.get(i + 1).copied();

            if open_comment.is_some() {
                if ch == '*' && next == Some('/') {
                    open_comment = None;
                    output.push(' ');
                    i += 2;
                } else {
                    i += 1;
                }
                continue;
            }

            if in_string {
                in_string = ch != '"';
                output.push(ch);
                i += 1;
                continue;
            }

            match (ch, next) {
                ('/', Some('/')) => break,
                ('/', Some('*')) => {
                    open_comment = Some(index + 1);
                    i += 2;
                }
                _ => {
                    in_string = ch == '"';
                    output.push(ch);
                    i += 1;
                }
            }
        }

        output.push('\n');
    }

    match open_comment {
        Some(line) => Err(LexError::UnterminatedComment { line }),
        None => Ok(output),
    }
}

/// Lexer for Jack source code
pub struct Lexer<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    line: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source string.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            tokens: Vec::new(),
            line: 1,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<TokenStream, LexError> {
        let stripped = strip_comments(self.source)?;

        for (index, line) in stripped.lines().enumerate() {
            self.line = index + 1;
            self.scan_line(line)?;
        }

        trace!(tokens = self.tokens.len(), "tokenized compilation unit");
        Ok(TokenStream::new(std::mem::take(&mut self.tokens)))
    }

    /// Split one comment-free line into tokens.
    fn scan_line(&mut self, line: &str) -> Result<(), LexError> {
        let mut current = String::new();
        let mut string: Option<String> = None;

        for ch in line.chars() {
            if let Some(text) = string.as_mut() {
                if ch != '"' {
                    text.push(ch);
                    continue;
                }
                let text = std::mem::take(text);
                string = None;
                self.push(TokenKind::StringConstant, text);
                continue;
            }

            if ch == '"' {
                self.flush(&mut current)?;
                string = Some(String::new());
            } else if ch.is_whitespace() {
                self.flush(&mut current)?;
            } else if SYMBOLS.contains(&ch) {
                self.flush(&mut current)?;
                self.push(TokenKind::Symbol, ch.to_string());
            } else {
                current.push(ch);
            }
        }

        if string.is_some() {
            return Err(LexError::UnterminatedString { line: self.line });
        }

        self.flush(&mut current)
    }

    /// Emit the pending raw token, if any.
    fn flush(&mut self, current: &mut String) -> Result<(), LexError> {
        if current.is_empty() {
            return Ok(());
        }

        let lexeme = std::mem::take(current);
        let kind = classify(&lexeme);

        if kind == TokenKind::IntConstant {
            let in_range = lexeme
                .parse::<u32>()
                .is_ok_and(|value| value <= u32::from(MAX_INT_CONSTANT));
            if !in_range {
                return Err(LexError::IntegerOutOfRange {
                    lexeme,
                    line: self.line,
                });
            }
        }

        self.push(kind, lexeme);
        Ok(())
    }

    fn push(&mut self, kind: TokenKind, lexeme: String) {
        self.tokens.push(Token::new(kind, lexeme, self.line));
    }
}

/// Tokenize one compilation unit.
pub fn tokenize(source: &str) -> Result<TokenStream, LexError> {
    Lexer::new(source).tokenize()
}
