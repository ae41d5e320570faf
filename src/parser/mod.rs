//! Per-file parsing: doc-comments paired with the code shape that
//! follows them.
//!
//! A file is tokenized (JavaScript or CSS/SCSS by extension), then the
//! token stream is scanned for doc-comment tokens. Each one is parsed
//! into tags, and a forked cursor shape-parses the statement that
//! follows it. Forking matters: a doc-comment inside a define body is
//! found by this scan even though the define's own shape parse already
//! consumed past it, so nested member comments each get their own
//! docset.
//!
//! # Submodules
//!
//! - [`shapes`]: the JavaScript code-shape recognizer.
//! - [`css`]: the CSS/SCSS code-shape recognizer.

pub mod css;
pub mod shapes;

use crate::config::Config;
use crate::diag::Diagnostics;
use crate::docblock::parse_doc_comment;
use crate::lexer::{tokenize_css, tokenize_js};
use crate::model::{Docset, TokenKind};

/// One input file: its display name and full contents.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub content: String,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        SourceFile {
            name: name.into(),
            content: content.into(),
        }
    }

    fn is_css(&self) -> bool {
        self.name.ends_with(".css") || self.name.ends_with(".scss")
    }
}

/// Extract all docsets from one file. Each doc-comment yields one
/// docset; code between comments is not recorded.
pub fn parse_file(file: &SourceFile, config: &Config, diags: &Diagnostics) -> Vec<Docset> {
    let css = file.is_css();
    let mut cur = if css {
        tokenize_css(&file.content)
    } else {
        tokenize_js(&file.content)
    };

    let mut docsets = Vec::new();
    let mut next_id = 1u32;
    while let Some(tok) = cur.next() {
        if tok.kind != TokenKind::DocComment {
            continue;
        }
        let tags = parse_doc_comment(&tok.value, tok.line, &file.name, &config.meta, diags);
        let mut fork = cur.fork();
        let shape = if css {
            css::parse_shape(&mut fork)
        } else {
            shapes::parse_shape(&mut fork, &config.namespaces, &mut next_id)
        };
        docsets.push(Docset {
            tags,
            shape,
            line: tok.line,
        });
    }
    docsets
}
