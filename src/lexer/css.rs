//! CSS/SCSS tokenizer.
//!
//! Shares the token model and cursor with the JavaScript lexer but
//! additionally distinguishes percentage, dimension, hash and at-keyword
//! tokens, and treats `$name` SCSS variables as identifiers (the `$` is
//! kept in the token value). `/** */` doc-comments are recognized the same
//! way; `/* */` and SCSS `//` comments are skipped like whitespace.

use crate::lexer::TokenCursor;
use crate::model::{Token, TokenKind};

/// Tokenize CSS/SCSS source text.
pub fn tokenize_css(src: &str) -> TokenCursor {
    TokenCursor::new(CssLexer::new(src).run())
}

struct CssLexer {
    chars: Vec<char>,
    i: usize,
    line: u32,
    tokens: Vec<Token>,
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '-'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

impl CssLexer {
    fn new(src: &str) -> Self {
        CssLexer {
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
                while self.i < self.chars.len() && self.chars[self.i] != '\n' {
                    self.i += 1;
                }
            } else if self.at_doc_comment() {
                self.doc_comment();
            } else if c == '/' && self.peek(1) == Some('*') {
                self.skip_block_comment();
            } else if c == '@' && self.peek(1).is_some_and(is_ident_start) {
                let value = self.take_word(1);
                self.push(TokenKind::AtKeyword, format!("@{value}"));
            } else if c == '#' && self.peek(1).is_some_and(|c| c.is_ascii_alphanumeric()) {
                let value = self.take_word(1);
                self.push(TokenKind::Hash, format!("#{value}"));
            } else if c == '$' && self.peek(1).is_some_and(is_ident_start) {
                let value = self.take_word(1);
                self.push(TokenKind::Ident, format!("${value}"));
            } else if c.is_ascii_digit()
                || (c == '.' && self.peek(1).is_some_and(|c| c.is_ascii_digit()))
            {
                self.number();
            } else if is_ident_start(c) {
                let value = self.take_word(0);
                self.push(TokenKind::Ident, value);
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

    fn at_doc_comment(&self) -> bool {
        self.chars[self.i] == '/'
            && self.peek(1) == Some('*')
            && self.peek(2) == Some('*')
            && self.peek(3) != Some('/')
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

    /// Consume an identifier word starting `skip` chars ahead, advancing
    /// past both the prefix and the word.
    fn take_word(&mut self, skip: usize) -> String {
        self.i += skip;
        let mut value = String::new();
        while let Some(c) = self.peek(0) {
            if is_ident_char(c) {
                value.push(c);
                self.i += 1;
            } else {
                break;
            }
        }
        value
    }

    fn number(&mut self) {
        let mut value = String::new();
        while let Some(c) = self.peek(0) {
            if c.is_ascii_digit() || c == '.' {
                value.push(c);
                self.i += 1;
            } else {
                break;
            }
        }
        if self.peek(0) == Some('%') {
            value.push('%');
            self.i += 1;
            self.push(TokenKind::Percentage, value);
        } else if self.peek(0).is_some_and(is_ident_start) {
            while let Some(c) = self.peek(0) {
                if is_ident_char(c) {
                    value.push(c);
                    self.i += 1;
                } else {
                    break;
                }
            }
            self.push(TokenKind::Dimension, value);
        } else {
            self.push(TokenKind::Number, value);
        }
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
                    value.push(esc);
                    self.i += 1;
                }
            } else if c == quote {
                value.push(c);
                self.i += 1;
                break;
            } else if c == '\n' {
                break;
            } else {
                value.push(c);
                self.i += 1;
            }
        }
        self.push(TokenKind::Str, value);
    }
}
