//! Name-with-default sub-parser.
//!
//! Parses the member/parameter name position of `@param`, `@cfg`,
//! `@property` and `@var` tags:
//!
//!   - `width` — plain name
//!   - `config.title` — dotted sub-property name
//!   - `[width]` — optional
//!   - `[width=100]` — optional with default
//!   - `[items=[1, "a]b"]]` — default balances nested `[]` and strings
//!   - `$button-height` — SCSS variable name
//!
//! Default values balance nested brackets and skip quoted-string
//! contents; when balancing fails (unclosed bracket in the default), the
//! parser falls back to taking everything up to the next `]`.

use super::scanner::Scanner;

/// A parsed name position.
#[derive(Debug, Clone, PartialEq)]
pub struct NameDef {
    pub name: String,
    pub default: Option<String>,
    pub optional: bool,
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_name_char(c: char, scss: bool) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$' || (scss && c == '-')
}

/// Consume a dotted identifier (`foo.bar.baz`). SCSS `$name`s may contain
/// dashes. Returns `None` when the cursor is not on a name start.
fn ident_dotted(sc: &mut Scanner) -> Option<String> {
    if !sc.peek().is_some_and(is_name_start) {
        return None;
    }
    let scss = sc.peek() == Some('$');
    let mut name = String::new();
    while let Some(c) = sc.peek() {
        if is_name_char(c, scss) {
            name.push(c);
            sc.bump();
        } else if c == '.' && sc.peek_at(1).is_some_and(is_name_start) {
            name.push(c);
            sc.bump();
        } else {
            break;
        }
    }
    Some(name)
}

/// Parse a name-with-default at the cursor. Returns `None` (cursor
/// untouched) when nothing name-like is present.
pub fn parse_name_def(sc: &mut Scanner) -> Option<NameDef> {
    let start = sc.pos();
    if sc.eat('[') {
        sc.skip_inline_ws();
        let Some(name) = ident_dotted(sc) else {
            sc.set_pos(start);
            return None;
        };
        sc.skip_inline_ws();
        let default = if sc.eat('=') {
            Some(parse_default(sc))
        } else {
            None
        };
        sc.skip_inline_ws();
        sc.eat(']');
        Some(NameDef {
            name,
            default,
            optional: true,
        })
    } else {
        let name = ident_dotted(sc)?;
        Some(NameDef {
            name,
            default: None,
            optional: false,
        })
    }
}

/// Parse the default-value text after `=`, up to the `]` that closes the
/// enclosing optional group.
fn parse_default(sc: &mut Scanner) -> String {
    let start = sc.pos();
    let mut value = String::new();
    let mut depth = 0u32;

    while let Some(c) = sc.peek() {
        match c {
            ']' if depth == 0 => return value,
            ']' => {
                depth -= 1;
                value.push(c);
                sc.bump();
            }
            '[' => {
                depth += 1;
                value.push(c);
                sc.bump();
            }
            '"' | '\'' => {
                value.push(c);
                sc.bump();
                while let Some(s) = sc.bump() {
                    value.push(s);
                    if s == '\\' {
                        if let Some(esc) = sc.bump() {
                            value.push(esc);
                        }
                    } else if s == c || s == '\n' {
                        break;
                    }
                }
            }
            '\n' => break,
            _ => {
                value.push(c);
                sc.bump();
            }
        }
    }

    // Balancing failed; fall back to everything up to the next `]`.
    sc.set_pos(start);
    let mut fallback = String::new();
    while let Some(c) = sc.peek() {
        if c == ']' || c == '\n' {
            break;
        }
        fallback.push(c);
        sc.bump();
    }
    fallback
}
