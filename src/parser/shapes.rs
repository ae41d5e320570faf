//! Code-shape recognition for JavaScript.
//!
//! A best-effort recursive-descent parser invoked on the statement
//! immediately following a doc-comment. It recognizes just enough
//! structure to support the merger: function declarations and
//! expressions, `var` declarations, identifier-chain assignments, bare
//! `key: value` property literals, literal expressions, and the three
//! framework call forms
//!
//!   - `NS.define(name, {...})` (also `NS.ClassManager.create(...)`)
//!   - `NS.extend(Parent, {...})`
//!   - `NS.override(Target, {...})`
//!
//! where `NS` is matched against the configured namespace aliases.
//! Anything unrecognized yields [`CodeShape::Nothing`]; parsing never
//! fails past this point, so the rest of the file is still scanned for
//! the next doc-comment.

use crate::lexer::{TMatch, TokenCursor};
use crate::model::{AutoMember, CodeShape, DefineInfo, LitKind, MemberKind, Token, TokenKind};

/// Parse the statement at the cursor into a shape. `next_id` hands out
/// the creation ids carried by auto-detected members.
pub fn parse_shape(cur: &mut TokenCursor, namespaces: &[String], next_id: &mut u32) -> CodeShape {
    ShapeParser {
        cur,
        namespaces,
        next_id,
    }
    .parse()
}

struct ShapeParser<'a> {
    cur: &'a mut TokenCursor,
    namespaces: &'a [String],
    next_id: &'a mut u32,
}


/// Strip matching quotes from a string token's raw value.
fn unquote(raw: &str) -> String {
    let bytes = raw.as_bytes();
    if bytes.len() >= 2
        && (bytes[0] == b'"' || bytes[0] == b'\'')
        && bytes[bytes.len() - 1] == bytes[0]
    {
        raw[1..raw.len() - 1].to_string()
    } else {
        raw.to_string()
    }
}

impl ShapeParser<'_> {
    fn parse(&mut self) -> CodeShape {
        while self.cur.eat_text(";") {}

        if self.cur.look(&[TMatch::Text("function")]) {
            let (name, params) = self.function();
            return CodeShape::Function { name, params };
        }
        if self.cur.look(&[TMatch::Text("var")]) {
            return self.var_decl();
        }
        if let Some(shape) = self.framework_call() {
            return shape;
        }
        self.chain_statement()
    }

    // ─── Framework call forms ───────────────────────────────────────────

    fn framework_call(&mut self) -> Option<CodeShape> {
        let namespaces = self.namespaces.to_vec();
        for ns in &namespaces {
            let ns = ns.as_str();
            if self.cur.look(&[
                TMatch::Text(ns),
                TMatch::Text("."),
                TMatch::Text("define"),
                TMatch::Text("("),
            ]) {
                for _ in 0..4 {
                    self.cur.next();
                }
                return Some(self.define());
            }
            if self.cur.look(&[
                TMatch::Text(ns),
                TMatch::Text("."),
                TMatch::Text("ClassManager"),
                TMatch::Text("."),
                TMatch::Text("create"),
                TMatch::Text("("),
            ]) {
                for _ in 0..6 {
                    self.cur.next();
                }
                return Some(self.define());
            }
            if self.cur.look(&[
                TMatch::Text(ns),
                TMatch::Text("."),
                TMatch::Text("extend"),
                TMatch::Text("("),
            ]) {
                for _ in 0..4 {
                    self.cur.next();
                }
                let parent = self.ident_chain_string();
                let members = self.call_body_members();
                return Some(CodeShape::Extend { parent, members });
            }
            if self.cur.look(&[
                TMatch::Text(ns),
                TMatch::Text("."),
                TMatch::Text("override"),
                TMatch::Text("("),
            ]) {
                for _ in 0..4 {
                    self.cur.next();
                }
                let target = self.ident_chain_string();
                let members = self.call_body_members();
                return Some(CodeShape::Override { target, members });
            }
            if self.cur.look(&[
                TMatch::Text(ns),
                TMatch::Text("."),
                TMatch::Text("emptyFn"),
            ]) {
                for _ in 0..3 {
                    self.cur.next();
                }
                return Some(CodeShape::Function {
                    name: None,
                    params: Vec::new(),
                });
            }
        }
        None
    }

    fn define(&mut self) -> CodeShape {
        let mut info = DefineInfo::default();
        if let Some(tok) = self.cur.eat(TMatch::Kind(TokenKind::Str)) {
            info.name = Some(unquote(&tok.value));
        }
        self.cur.eat_text(",");
        if self.cur.eat_text("{") {
            self.config_object(&mut info);
        }
        CodeShape::Define(info)
    }

    /// Parse the `{...}` config object of a define/create call,
    /// extracting the structural keys and auto-detecting members from
    /// everything else.
    fn config_object(&mut self, info: &mut DefineInfo) {
        let mut pending: Option<u32> = None;
        loop {
            if self.cur.eof() || self.cur.eat_text("}") {
                return;
            }
            if self
                .cur
                .peek()
                .is_some_and(|t| t.kind == TokenKind::DocComment)
            {
                pending = self.cur.next().map(|t| t.line);
                continue;
            }
            let Some((key, line)) = self.object_key() else {
                // Unparseable entry; give up on the rest of the object.
                self.skip_to_object_end();
                return;
            };
            match key.as_str() {
                "extend" => info.extends = self.string_value(),
                "override" => info.override_target = self.string_value(),
                "mixins" => info.mixins = self.string_list_value(),
                "requires" => info.requires = self.string_list_value(),
                "uses" => info.uses = self.string_list_value(),
                "alternateClassName" => info.alternate_class_names = self.string_list_value(),
                "alias" => info.aliases.extend(self.string_list_value()),
                "xtype" => info
                    .aliases
                    .extend(self.string_list_value().into_iter().map(|x| format!("widget.{x}"))),
                "singleton" => {
                    info.singleton = self.cur.eat_text("true");
                    if !info.singleton {
                        self.skip_value();
                    }
                }
                "config" | "cachedConfig" => self.member_bucket(info, Bucket::Config),
                "eventedConfig" => self.member_bucket(info, Bucket::EventedConfig),
                "statics" => self.member_bucket(info, Bucket::Statics),
                "inheritableStatics" => self.member_bucket(info, Bucket::InheritableStatics),
                _ => {
                    let member = self.auto_member(key, line, Bucket::Plain, pending);
                    info.members.push(member);
                }
            }
            pending = None;
            self.cur.eat_text(",");
        }
    }

    fn object_key(&mut self) -> Option<(String, u32)> {
        let tok = self.cur.peek()?;
        let key = match tok.kind {
            TokenKind::Ident | TokenKind::Keyword => tok.value.clone(),
            TokenKind::Str => unquote(&tok.value),
            _ => return None,
        };
        let line = tok.line;
        if self.cur.peek_at(1).is_some_and(|t| t.value == ":") {
            self.cur.next();
            self.cur.next();
            Some((key, line))
        } else {
            None
        }
    }

    fn member_bucket(&mut self, info: &mut DefineInfo, bucket: Bucket) {
        if !self.cur.eat_text("{") {
            self.skip_value();
            return;
        }
        let members = self.object_members(bucket);
        info.members.extend(members);
    }

    /// The member body of an extend/override call, after the parent
    /// argument. No structural keys here; every entry is a plain member.
    fn call_body_members(&mut self) -> Vec<AutoMember> {
        self.cur.eat_text(",");
        if self.cur.eat_text("{") {
            self.object_members(Bucket::Plain)
        } else {
            Vec::new()
        }
    }

    /// Auto-detect members from an object body whose `{` is already
    /// consumed.
    fn object_members(&mut self, bucket: Bucket) -> Vec<AutoMember> {
        let mut members = Vec::new();
        let mut pending: Option<u32> = None;
        loop {
            if self.cur.eof() || self.cur.eat_text("}") {
                return members;
            }
            if self
                .cur
                .peek()
                .is_some_and(|t| t.kind == TokenKind::DocComment)
            {
                pending = self.cur.next().map(|t| t.line);
                continue;
            }
            let Some((key, line)) = self.object_key() else {
                self.skip_to_object_end();
                return members;
            };
            let member = self.auto_member(key, line, bucket, pending);
            members.push(member);
            pending = None;
            self.cur.eat_text(",");
        }
    }

    /// Consume one member value and build the auto-detected record for it.
    fn auto_member(
        &mut self,
        name: String,
        line: u32,
        bucket: Bucket,
        comment_line: Option<u32>,
    ) -> AutoMember {
        let id = *self.next_id;
        *self.next_id += 1;

        let mut params = Vec::new();
        let mut default = None;
        let mut lit = None;
        let is_function = if self.cur.look(&[TMatch::Text("function")]) {
            let (_, p) = self.function();
            params = p;
            true
        } else if self.emptyfn() {
            true
        } else {
            if let Some((kind, text)) = self.literal_value() {
                default = Some(text);
                lit = Some(kind);
            } else {
                self.skip_value();
            }
            false
        };

        let kind = match bucket {
            Bucket::Config | Bucket::EventedConfig => MemberKind::Cfg,
            _ if is_function => MemberKind::Method,
            _ => MemberKind::Property,
        };
        AutoMember {
            id,
            kind,
            name,
            params,
            default,
            lit,
            statics: matches!(bucket, Bucket::Statics | Bucket::InheritableStatics),
            inheritable: matches!(
                bucket,
                Bucket::Config | Bucket::EventedConfig | Bucket::InheritableStatics
            ),
            evented: matches!(bucket, Bucket::EventedConfig),
            comment_line,
            line,
        }
    }

    fn emptyfn(&mut self) -> bool {
        let namespaces = self.namespaces.to_vec();
        for ns in &namespaces {
            if self.cur.look(&[
                TMatch::Text(ns.as_str()),
                TMatch::Text("."),
                TMatch::Text("emptyFn"),
            ]) {
                for _ in 0..3 {
                    self.cur.next();
                }
                return true;
            }
        }
        false
    }

    // ─── Statements ─────────────────────────────────────────────────────

    fn var_decl(&mut self) -> CodeShape {
        self.cur.next(); // var
        let Some(name) = self.cur.eat(TMatch::Kind(TokenKind::Ident)).map(|t| t.value) else {
            return CodeShape::Nothing;
        };
        let value = if self.cur.eat_text("=") {
            self.expr_value()
        } else {
            None
        };
        CodeShape::VarDecl { name, value }
    }

    /// Assignment of an identifier chain, or a bare `key: value` property
    /// literal.
    fn chain_statement(&mut self) -> CodeShape {
        let key_like = self
            .cur
            .peek()
            .is_some_and(|t| matches!(t.kind, TokenKind::Ident | TokenKind::Str));
        if key_like
            && self.cur.peek_at(1).is_some_and(|t| t.value == ":")
            && let Some(tok) = self.cur.next()
        {
            let name = unquote(&tok.value);
            self.cur.next(); // ':'
            let value = self.expr_value();
            return CodeShape::PropertyLiteral { name, value };
        }

        if self.cur.peek().is_some_and(|t| t.kind == TokenKind::Ident) {
            let chain = self.ident_chain();
            if self.cur.eat_text("=") {
                let value = self.expr_value();
                return CodeShape::Assignment { name: chain, value };
            }
        }
        CodeShape::Nothing
    }

    /// The value position of an assignment, var declaration, or property
    /// literal.
    fn expr_value(&mut self) -> Option<Box<CodeShape>> {
        if self.cur.look(&[TMatch::Text("function")]) {
            let (name, params) = self.function();
            return Some(Box::new(CodeShape::Function { name, params }));
        }
        if let Some(shape) = self.framework_call() {
            return Some(Box::new(shape));
        }
        if let Some((kind, text)) = self.literal_value() {
            return Some(Box::new(CodeShape::Literal { kind, text }));
        }
        None
    }

    /// Consume a `function` declaration or expression header, and its
    /// body when present. Returns the optional name and parameter names.
    fn function(&mut self) -> (Option<String>, Vec<String>) {
        self.cur.next(); // function
        let name = self.cur.eat(TMatch::Kind(TokenKind::Ident)).map(|t| t.value);
        let mut params = Vec::new();
        if self.cur.eat_text("(") {
            while let Some(tok) = self.cur.peek() {
                if tok.value == ")" {
                    self.cur.next();
                    break;
                }
                if tok.kind == TokenKind::Ident {
                    params.push(tok.value.clone());
                }
                self.cur.next();
            }
        }
        if self.cur.look(&[TMatch::Text("{")]) {
            self.skip_balanced();
        }
        (name, params)
    }

    fn ident_chain(&mut self) -> Vec<String> {
        let mut chain = Vec::new();
        if let Some(tok) = self.cur.eat(TMatch::Kind(TokenKind::Ident)) {
            chain.push(tok.value);
        }
        while self.cur.look(&[TMatch::Text("."), TMatch::Kind(TokenKind::Ident)]) {
            self.cur.next();
            if let Some(tok) = self.cur.next() {
                chain.push(tok.value);
            }
        }
        chain
    }

    fn ident_chain_string(&mut self) -> Option<String> {
        let chain = self.ident_chain();
        if chain.is_empty() {
            None
        } else {
            Some(chain.join("."))
        }
    }

    // ─── Values ─────────────────────────────────────────────────────────

    /// Recognize a literal expression, consuming it. Returns the literal
    /// class and its source text.
    fn literal_value(&mut self) -> Option<(LitKind, String)> {
        // `NS.baseCSSPrefix + "foo"` idiom: a String literal.
        let namespaces = self.namespaces.to_vec();
        for ns in &namespaces {
            if self.cur.look(&[
                TMatch::Text(ns.as_str()),
                TMatch::Text("."),
                TMatch::Text("baseCSSPrefix"),
                TMatch::Text("+"),
                TMatch::Kind(TokenKind::Str),
            ]) {
                for _ in 0..4 {
                    self.cur.next();
                }
                if let Some(tok) = self.cur.next() {
                    let inner = unquote(&tok.value);
                    return Some((LitKind::Str, format!("'x-{inner}'")));
                }
                return None;
            }
        }

        let tok = self.cur.peek()?.clone();
        match tok.kind {
            TokenKind::Str => {
                self.cur.next();
                Some((LitKind::Str, tok.value))
            }
            TokenKind::Number => {
                self.cur.next();
                Some((LitKind::Number, tok.value))
            }
            TokenKind::Regex => {
                self.cur.next();
                Some((LitKind::RegExp, tok.value))
            }
            TokenKind::Keyword if tok.value == "true" || tok.value == "false" => {
                self.cur.next();
                Some((LitKind::Boolean, tok.value))
            }
            TokenKind::Keyword if tok.value == "null" || tok.value == "undefined" => {
                self.cur.next();
                Some((LitKind::Object, tok.value))
            }
            TokenKind::Operator if tok.value == "-" => {
                if self.cur.peek_at(1)?.kind != TokenKind::Number {
                    return None;
                }
                self.cur.next();
                let n = self.cur.next()?;
                Some((LitKind::Number, format!("-{}", n.value)))
            }
            TokenKind::Operator if tok.value == "[" => {
                let text = self.balanced_text();
                Some((LitKind::Array, text))
            }
            TokenKind::Operator if tok.value == "{" => {
                let text = self.balanced_text();
                Some((LitKind::Object, text))
            }
            _ => None,
        }
    }

    fn string_value(&mut self) -> Option<String> {
        if let Some(tok) = self.cur.eat(TMatch::Kind(TokenKind::Str)) {
            Some(unquote(&tok.value))
        } else {
            self.skip_value();
            None
        }
    }

    /// A string, an array of strings, or (for `mixins`) an object whose
    /// values are strings.
    fn string_list_value(&mut self) -> Vec<String> {
        if let Some(tok) = self.cur.eat(TMatch::Kind(TokenKind::Str)) {
            return vec![unquote(&tok.value)];
        }
        let mut out = Vec::new();
        if self.cur.eat_text("[") {
            let mut depth = 1u32;
            while let Some(tok) = self.cur.next() {
                match tok.value.as_str() {
                    "[" | "{" | "(" => depth += 1,
                    "]" | "}" | ")" => {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                    }
                    _ if tok.kind == TokenKind::Str && depth == 1 => {
                        out.push(unquote(&tok.value));
                    }
                    _ => {}
                }
            }
        } else if self.cur.eat_text("{") {
            // mixins: { label: "Class.Name", ... }
            loop {
                if self.cur.eof() || self.cur.eat_text("}") {
                    break;
                }
                let Some((_, _)) = self.object_key() else {
                    self.skip_to_object_end();
                    break;
                };
                if let Some(tok) = self.cur.eat(TMatch::Kind(TokenKind::Str)) {
                    out.push(unquote(&tok.value));
                } else {
                    self.skip_value();
                }
                self.cur.eat_text(",");
            }
        } else {
            self.skip_value();
        }
        out
    }

    /// Skip one expression, stopping before a `,` or `}` at depth zero.
    fn skip_value(&mut self) {
        let mut depth = 0u32;
        while let Some(tok) = self.cur.peek() {
            match tok.value.as_str() {
                "," | ";" if depth == 0 => return,
                "}" | "]" | ")" if depth == 0 => return,
                "{" | "[" | "(" => depth += 1,
                "}" | "]" | ")" => depth -= 1,
                _ => {}
            }
            self.cur.next();
        }
    }

    /// Error recovery: consume through the `}` closing the object whose
    /// body we are inside.
    fn skip_to_object_end(&mut self) {
        let mut depth = 0u32;
        while let Some(tok) = self.cur.next() {
            match tok.value.as_str() {
                "{" | "[" | "(" => depth += 1,
                "}" if depth == 0 => return,
                "}" | "]" | ")" => depth = depth.saturating_sub(1),
                _ => {}
            }
        }
    }

    /// Skip a balanced bracket group starting at the cursor.
    fn skip_balanced(&mut self) {
        let mut depth = 0u32;
        while let Some(tok) = self.cur.next() {
            match tok.value.as_str() {
                "{" | "[" | "(" => depth += 1,
                "}" | "]" | ")" => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return;
                    }
                }
                _ => {}
            }
        }
    }

    /// Consume a balanced bracket group and render it back to compact
    /// source-ish text for use as a default value.
    fn balanced_text(&mut self) -> String {
        let mut tokens: Vec<Token> = Vec::new();
        let mut depth = 0u32;
        while let Some(tok) = self.cur.next() {
            match tok.value.as_str() {
                "{" | "[" | "(" => depth += 1,
                "}" | "]" | ")" => depth = depth.saturating_sub(1),
                _ => {}
            }
            tokens.push(tok);
            if depth == 0 {
                break;
            }
        }
        render_tokens(&tokens)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bucket {
    Plain,
    Config,
    EventedConfig,
    Statics,
    InheritableStatics,
}

/// Join tokens back into display text, spacing only where needed.
pub(crate) fn render_tokens(tokens: &[Token]) -> String {
    let mut out = String::new();
    for (i, tok) in tokens.iter().enumerate() {
        if i > 0 {
            let prev = &tokens[i - 1];
            let wordy = |t: &Token| {
                matches!(
                    t.kind,
                    TokenKind::Ident
                        | TokenKind::Keyword
                        | TokenKind::Number
                        | TokenKind::Str
                        | TokenKind::Dimension
                        | TokenKind::Percentage
                        | TokenKind::Hash
                )
            };
            if prev.value == "," || (wordy(prev) && wordy(tok)) {
                out.push(' ');
            }
        }
        out.push_str(&tok.value);
    }
    out
}
