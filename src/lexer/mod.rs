//! Lexical tokenizers.
//!
//! Turns source text into a stream of [`Token`]s, recognizing `/** */`
//! doc-comments specially (they become tokens; ordinary `/* */` and `//`
//! comments are skipped like whitespace). The JavaScript tokenizer lives
//! here; the CSS/SCSS variant is in [`css`].
//!
//! The output is a [`TokenCursor`] supporting arbitrary lookahead without
//! consuming, plus a consuming `next()`. Cursors share their token buffer,
//! so forking one for speculative parsing is cheap.

pub mod css;

pub use css::tokenize_css;

use std::sync::Arc;

use crate::model::{Token, TokenKind};

/// The fixed keyword set distinguishing keywords from identifiers.
const KEYWORDS: &[&str] = &[
    "break", "case", "catch", "continue", "debugger", "default", "delete", "do", "else", "false",
    "finally", "for", "function", "if", "in", "instanceof", "new", "null", "return", "switch",
    "this", "throw", "true", "try", "typeof", "undefined", "var", "void", "while", "with",
];

/// Pattern element for [`TokenCursor::look`]: match by kind or exact text.
#[derive(Debug, Clone, Copy)]
pub enum TMatch<'a> {
    Kind(TokenKind),
    Text(&'a str),
}

/// Cursor over a token buffer with N-token lookahead.
#[derive(Debug, Clone)]
pub struct TokenCursor {
    tokens: Arc<Vec<Token>>,
    pos: usize,
}

impl TokenCursor {
    pub fn new(tokens: Vec<Token>) -> Self {
        TokenCursor {
            tokens: Arc::new(tokens),
            pos: 0,
        }
    }

    /// Check the upcoming tokens against a pattern without consuming.
    pub fn look(&self, pattern: &[TMatch]) -> bool {
        for (i, m) in pattern.iter().enumerate() {
            let Some(tok) = self.tokens.get(self.pos + i) else {
                return false;
            };
            let ok = match m {
                TMatch::Kind(kind) => tok.kind == *kind,
                TMatch::Text(text) => tok.value == *text,
            };
            if !ok {
                return false;
            }
        }
        true
    }

    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    pub fn peek_at(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.pos + n)
    }

    pub fn next(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    /// Consume the next token if it matches.
    pub fn eat(&mut self, m: TMatch) -> Option<Token> {
        if self.look(std::slice::from_ref(&m)) {
            self.next()
        } else {
            None
        }
    }

    /// Consume the next token if its text matches exactly.
    pub fn eat_text(&mut self, text: &str) -> bool {
        self.eat(TMatch::Text(text)).is_some()
    }

    pub fn eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn set_pos(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// A cursor over the same buffer starting at the given position.
    /// Used to shape-parse speculatively after a doc-comment without
    /// moving the main scan position.
    pub fn fork(&self) -> TokenCursor {
        TokenCursor {
            tokens: Arc::clone(&self.tokens),
            pos: self.pos,
        }
    }
}

/// Tokenize JavaScript source text.
pub fn tokenize_js(src: &str) -> TokenCursor {
    TokenCursor::new(JsLexer::new(src).run())
}

struct JsLexer {
    chars: Vec<char>,
    i: usize,
    line: u32,
    tokens: Vec<Token>,
}

impl JsLexer {
    fn new(src: &str) -> Self {
        JsLexer {
            chars: src.chars().collect(),
            i: 0,
            line: 1,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<Token> {
        while self.i < self.chars.len() {
            let c = self.chars[self.i];
            if c == '\n' {
                self.line += 1;
                self.i += 1;
            } else if c.is_whitespace() {
                self.i += 1;
            } else if c == '/' && self.peek(1) == Some('/') {
                self.skip_line_comment();
            } else if self.at_doc_comment() {
                self.doc_comment();
            } else if c == '/' && self.peek(1) == Some('*') {
                self.skip_block_comment();
            } else if c == '/' && self.regex_allowed() {
                self.regex();
            } else if c.is_ascii_alphabetic() || c == '_' || c == '$' {
                self.ident();
            } else if c.is_ascii_digit() {
                self.number();
            } else if c == '"' || c == '\'' {
                self.string(c);
            } else {
                self.push(TokenKind::Operator, c.to_string());
                self.i += 1;
            }
        }
        self.tokens
    }

    fn peek(&self, n: usize) -> Option<char> {
        self.chars.get(self.i + n).copied()
    }

    fn push(&mut self, kind: TokenKind, value: String) {
        self.tokens.push(Token {
            kind,
            value,
            line: self.line,
        });
    }

    /// `/` starts a regex unless the preceding token is an identifier, a
    /// number, the keyword `this`, or a closing `)`/`]` — then it's
    /// division.
    fn regex_allowed(&self) -> bool {
        match self.tokens.last() {
            None => true,
            Some(tok) => match tok.kind {
                TokenKind::Ident | TokenKind::Number => false,
                TokenKind::Keyword => tok.value != "this",
                TokenKind::Operator => tok.value != ")" && tok.value != "]",
                _ => true,
            },
        }
    }

    fn at_doc_comment(&self) -> bool {
        // "/**" but not the empty block comment "/**/".
        self.chars[self.i] == '/'
            && self.peek(1) == Some('*')
            && self.peek(2) == Some('*')
            && self.peek(3) != Some('/')
    }

    fn skip_line_comment(&mut self) {
        while self.i < self.chars.len() && self.chars[self.i] != '\n' {
            self.i += 1;
        }
    }

    fn skip_block_comment(&mut self) {
        self.i += 2;
        while self.i < self.chars.len() {
            if self.chars[self.i] == '\n' {
                self.line += 1;
            } else if self.chars[self.i] == '*' && self.peek(1) == Some('/') {
                self.i += 2;
                return;
            }
            self.i += 1;
        }
    }

    fn doc_comment(&mut self) {
        let start_line = self.line;
        let mut raw = String::new();
        while self.i < self.chars.len() {
            let c = self.chars[self.i];
            if c == '\n' {
                self.line += 1;
            }
            raw.push(c);
            self.i += 1;
            if c == '/' && raw.len() >= 4 && raw.ends_with("*/") {
                break;
            }
        }
        self.tokens.push(Token {
            kind: TokenKind::DocComment,
            value: raw,
            line: start_line,
        });
    }

    fn ident(&mut self) {
        let mut value = String::new();
        while let Some(c) = self.peek(0) {
            if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
                value.push(c);
                self.i += 1;
            } else {
                break;
            }
        }
        let kind = if KEYWORDS.contains(&value.as_str()) {
            TokenKind::Keyword
        } else {
            TokenKind::Ident
        };
        self.push(kind, value);
    }

    fn number(&mut self) {
        let mut value = String::new();
        if self.peek(0) == Some('0') && matches!(self.peek(1), Some('x') | Some('X')) {
            value.push(self.chars[self.i]);
            value.push(self.chars[self.i + 1]);
            self.i += 2;
            while let Some(c) = self.peek(0) {
                if c.is_ascii_hexdigit() {
                    value.push(c);
                    self.i += 1;
                } else {
                    break;
                }
            }
        } else {
            while let Some(c) = self.peek(0) {
                if c.is_ascii_digit() {
                    value.push(c);
                    self.i += 1;
                } else {
                    break;
                }
            }
            if self.peek(0) == Some('.') && self.peek(1).is_some_and(|c| c.is_ascii_digit()) {
                value.push('.');
                self.i += 1;
                while let Some(c) = self.peek(0) {
                    if c.is_ascii_digit() {
                        value.push(c);
                        self.i += 1;
                    } else {
                        break;
                    }
                }
            }
        }
        self.push(TokenKind::Number, value);
    }

    fn string(&mut self, quote: char) {
        let mut value = String::new();
        value.push(quote);
        self.i += 1;
        while let Some(c) = self.peek(0) {
            if c == '\\' {
                value.push(c);
                self.i += 1;
                if let Some(esc) = self.peek(0) {
                    if esc == '\n' {
                        self.line += 1;
                    }
                    value.push(esc);
                    self.i += 1;
                }
            } else if c == quote {
                value.push(c);
                self.i += 1;
                break;
            } else if c == '\n' {
                // Unterminated string; stop at end of line.
                break;
            } else {
                value.push(c);
                self.i += 1;
            }
        }
        self.push(TokenKind::Str, value);
    }

    fn regex(&mut self) {
        let start = self.i;
        let mut value = String::from('/');
        self.i += 1;
        let mut in_class = false;
        let mut closed = false;
        while let Some(c) = self.peek(0) {
            if c == '\\' {
                value.push(c);
                self.i += 1;
                if let Some(esc) = self.peek(0) {
                    value.push(esc);
                    self.i += 1;
                }
            } else if c == '\n' {
                break;
            } else if c == '[' {
                in_class = true;
                value.push(c);
                self.i += 1;
            } else if c == ']' {
                in_class = false;
                value.push(c);
                self.i += 1;
            } else if c == '/' && !in_class {
                value.push(c);
                self.i += 1;
                closed = true;
                break;
            } else {
                value.push(c);
                self.i += 1;
            }
        }
        if !closed {
            // Not a regex after all; fall back to a division operator.
            self.i = start + 1;
            self.push(TokenKind::Operator, "/".to_string());
            return;
        }
        while let Some(c) = self.peek(0) {
            if c.is_ascii_alphabetic() {
                value.push(c);
                self.i += 1;
            } else {
                break;
            }
        }
        self.push(TokenKind::Regex, value);
    }
}
