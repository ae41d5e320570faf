//! Tokenizer tests for the JavaScript and CSS/SCSS lexers.

use classdoc::lexer::{tokenize_css, tokenize_js};
use classdoc::model::TokenKind;

fn js_tokens(src: &str) -> Vec<(TokenKind, String)> {
    let mut cur = tokenize_js(src);
    let mut out = Vec::new();
    while let Some(t) = cur.next() {
        out.push((t.kind, t.value));
    }
    out
}

fn css_tokens(src: &str) -> Vec<(TokenKind, String)> {
    let mut cur = tokenize_css(src);
    let mut out = Vec::new();
    while let Some(t) = cur.next() {
        out.push((t.kind, t.value));
    }
    out
}

// ─── JavaScript ─────────────────────────────────────────────────────

#[test]
fn idents_keywords_numbers() {
    let toks = js_tokens("var x = 0x1F + 2.5;");
    assert_eq!(toks[0], (TokenKind::Keyword, "var".to_string()));
    assert_eq!(toks[1], (TokenKind::Ident, "x".to_string()));
    assert_eq!(toks[2], (TokenKind::Operator, "=".to_string()));
    assert_eq!(toks[3], (TokenKind::Number, "0x1F".to_string()));
    assert_eq!(toks[4], (TokenKind::Operator, "+".to_string()));
    assert_eq!(toks[5], (TokenKind::Number, "2.5".to_string()));
}

#[test]
fn strings_keep_quotes_and_escapes() {
    let toks = js_tokens(r"s = 'a\'b';");
    assert_eq!(toks[2], (TokenKind::Str, r"'a\'b'".to_string()));
}

#[test]
fn regex_after_assignment() {
    let toks = js_tokens("re = /ab[/]c/g;");
    assert_eq!(toks[2], (TokenKind::Regex, "/ab[/]c/g".to_string()));
}

#[test]
fn slash_after_ident_is_division() {
    let toks = js_tokens("x = a / b / c;");
    let slashes: Vec<_> = toks
        .iter()
        .filter(|(_, v)| v == "/")
        .map(|(k, _)| *k)
        .collect();
    assert_eq!(slashes, vec![TokenKind::Operator, TokenKind::Operator]);
}

#[test]
fn unterminated_regex_falls_back_to_division() {
    let toks = js_tokens("a = /foo\nb");
    assert_eq!(toks[2], (TokenKind::Operator, "/".to_string()));
    assert_eq!(toks[3], (TokenKind::Ident, "foo".to_string()));
    assert_eq!(toks[4], (TokenKind::Ident, "b".to_string()));
}

#[test]
fn doc_comment_becomes_token() {
    let mut cur = tokenize_js("/** Hi there. */\nvar x;");
    let doc = cur.next().unwrap();
    assert_eq!(doc.kind, TokenKind::DocComment);
    assert_eq!(doc.value, "/** Hi there. */");
    assert_eq!(doc.line, 1);
    assert_eq!(cur.next().unwrap().value, "var");
}

#[test]
fn empty_block_comment_is_not_a_doc_comment() {
    let toks = js_tokens("/**/ var x;");
    assert_eq!(toks[0], (TokenKind::Keyword, "var".to_string()));
}

#[test]
fn plain_comments_are_skipped() {
    let toks = js_tokens("a; /* block */ b; // line\nc;");
    let idents: Vec<_> = toks
        .iter()
        .filter(|(k, _)| *k == TokenKind::Ident)
        .map(|(_, v)| v.clone())
        .collect();
    assert_eq!(idents, vec!["a", "b", "c"]);
}

#[test]
fn line_numbers_track_newlines() {
    let mut cur = tokenize_js("\n\n/** d */\nfoo");
    assert_eq!(cur.next().unwrap().line, 3);
    assert_eq!(cur.next().unwrap().line, 4);
}

// ─── CSS/SCSS ───────────────────────────────────────────────────────

#[test]
fn scss_mixin_header() {
    let toks = css_tokens("@mixin foo($a, $b) {}");
    assert_eq!(toks[0], (TokenKind::AtKeyword, "@mixin".to_string()));
    assert_eq!(toks[1], (TokenKind::Ident, "foo".to_string()));
    assert_eq!(toks[3], (TokenKind::Ident, "$a".to_string()));
    assert_eq!(toks[5], (TokenKind::Ident, "$b".to_string()));
}

#[test]
fn scss_variable_with_dimension_value() {
    let toks = css_tokens("$button-height: 30px !default;");
    assert_eq!(toks[0], (TokenKind::Ident, "$button-height".to_string()));
    assert_eq!(toks[1], (TokenKind::Operator, ":".to_string()));
    assert_eq!(toks[2], (TokenKind::Dimension, "30px".to_string()));
}

#[test]
fn css_hash_and_percentage() {
    let toks = css_tokens("color: #fff; width: 50%;");
    assert!(toks.contains(&(TokenKind::Hash, "#fff".to_string())));
    assert!(toks.contains(&(TokenKind::Percentage, "50%".to_string())));
}

#[test]
fn css_doc_comment_token() {
    let mut cur = tokenize_css("/** Base color. */\n$base: #000;");
    assert_eq!(cur.next().unwrap().kind, TokenKind::DocComment);
    assert_eq!(cur.next().unwrap().value, "$base");
}
