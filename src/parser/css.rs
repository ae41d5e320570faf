//! Code-shape recognition for CSS/SCSS.
//!
//! Only two shapes matter for stylesheet documentation: an SCSS
//! `@mixin name($a, $b)` header and a `$name: value` variable
//! declaration. Everything else is [`CodeShape::Nothing`].

use crate::lexer::{TMatch, TokenCursor};
use crate::model::{CodeShape, TokenKind};
use crate::parser::shapes::render_tokens;

pub fn parse_shape(cur: &mut TokenCursor) -> CodeShape {
    if cur.look(&[TMatch::Text("@mixin"), TMatch::Kind(TokenKind::Ident)]) {
        cur.next();
        let name = match cur.next() {
            Some(tok) => tok.value,
            None => return CodeShape::Nothing,
        };
        let mut params = Vec::new();
        if cur.eat_text("(") {
            while let Some(tok) = cur.peek() {
                if tok.value == ")" {
                    cur.next();
                    break;
                }
                if tok.kind == TokenKind::Ident && tok.value.starts_with('$') {
                    params.push(tok.value.clone());
                }
                cur.next();
            }
        }
        return CodeShape::CssMixin { name, params };
    }

    if cur.peek().is_some_and(|t| t.kind == TokenKind::Ident && t.value.starts_with('$')) {
        let name = match cur.next() {
            Some(tok) => tok.value,
            None => return CodeShape::Nothing,
        };
        if !cur.eat_text(":") {
            return CodeShape::Nothing;
        }
        let mut value = Vec::new();
        while let Some(tok) = cur.peek() {
            // `!default` and friends are flags, not part of the value.
            if tok.value == ";" || tok.value == "!" || tok.value == "}" {
                break;
            }
            value.push(tok.clone());
            cur.next();
        }
        let default = if value.is_empty() {
            None
        } else {
            Some(render_tokens(&value))
        };
        return CodeShape::CssVar { name, default };
    }

    CodeShape::Nothing
}
