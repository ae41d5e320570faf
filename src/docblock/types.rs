//! Type-expression sub-parser.
//!
//! Parses the `{Type}` expressions found after tags like `@param` and
//! `@return`. The grammar is deliberately forgiving: anything between
//! balanced braces is accepted as the type string, so union types
//! (`{String/Number}`), array notation (`{Object[]}`) and function types
//! pass through untouched. Nested `{}`/`[]` pairs must balance, and
//! quoted-string contents are skipped so braces inside strings don't
//! unbalance the scan. A trailing `=` immediately before the closing
//! brace marks the type optional:
//!
//!   - `{Number}`
//!   - `{String=}` — optional
//!   - `{function(name:String):{id:Number}}` — nested braces balance

use super::scanner::Scanner;

/// A parsed `{...}` type expression.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeExpr {
    pub value: String,
    pub optional: bool,
}

/// Parse a balanced `{...}` type expression at the cursor.
///
/// Returns `None` (leaving the cursor untouched) when the cursor is not
/// on `{`, the braces never balance, or the expression runs past the end
/// of the line.
pub fn parse_type(sc: &mut Scanner) -> Option<TypeExpr> {
    let start = sc.pos();
    if !sc.eat('{') {
        return None;
    }

    let mut value = String::new();
    let mut curly = 0u32;
    let mut square = 0u32;
    let mut closed = false;

    while let Some(c) = sc.bump() {
        match c {
            '}' if curly == 0 => {
                closed = true;
                break;
            }
            '}' => {
                curly -= 1;
                value.push(c);
            }
            '{' => {
                curly += 1;
                value.push(c);
            }
            '[' => {
                square += 1;
                value.push(c);
            }
            ']' => {
                square = square.saturating_sub(1);
                value.push(c);
            }
            '"' | '\'' => {
                value.push(c);
                copy_string(sc, c, &mut value);
            }
            '\n' => break,
            _ => value.push(c),
        }
    }

    if !closed || square != 0 {
        sc.set_pos(start);
        return None;
    }

    let optional = value.ends_with('=');
    if optional {
        value.pop();
    }
    Some(TypeExpr {
        value: value.trim().to_string(),
        optional,
    })
}

/// Copy quoted-string contents through to `out`, so that braces and
/// brackets inside the string don't participate in balancing.
fn copy_string(sc: &mut Scanner, quote: char, out: &mut String) {
    while let Some(c) = sc.bump() {
        out.push(c);
        if c == '\\' {
            if let Some(esc) = sc.bump() {
                out.push(esc);
            }
        } else if c == quote || c == '\n' {
            break;
        }
    }
}
