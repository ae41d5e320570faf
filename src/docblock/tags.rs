//! Doc-comment tag parser.
//!
//! Turns the text of one `/** ... */` comment into an ordered list of
//! [`Tag`]s, always starting with an implicit `default` tag that collects
//! the leading free text. An `@word` starts a new tag only when it is
//! preceded by whitespace and the line is indented less than four spaces
//! — the indent rule keeps embedded code examples and `user@host`-style
//! text from being split apart.
//!
//! Each recognized tag word dispatches to a specific sub-rule; the shared
//! `{type}` and name-with-default grammars live in [`super::types`] and
//! [`super::names`]. Words found in the meta-tag registry become
//! [`Tag::Meta`]; anything else produces a warning and stays literal text.

use crate::diag::{Category, Diagnostics};
use crate::meta::{MetaKind, MetaRegistry};
use crate::model::{MemberKind, MemberRef, Tag};

use super::names::parse_name_def;
use super::scanner::Scanner;
use super::types::parse_type;

/// Indent at which a line counts as an embedded code block.
const CODE_INDENT: u32 = 4;

/// Parse one raw doc-comment (including its `/** */` delimiters) into an
/// ordered tag list.
pub fn parse_doc_comment(
    raw: &str,
    comment_line: u32,
    file: &str,
    meta: &MetaRegistry,
    diags: &Diagnostics,
) -> Vec<Tag> {
    let body = purify(raw);
    let mut parser = TagParser {
        sc: Scanner::new(&body),
        tags: vec![Tag::Default { doc: String::new() }],
        current: 0,
        comment_line,
        file,
        meta,
        diags,
    };
    parser.run();

    let mut tags = parser.tags;
    for tag in &mut tags {
        if let Some(doc) = tag.doc_mut() {
            *doc = doc.trim().to_string();
        }
    }
    if let Some(Tag::Default { doc }) = tags.first()
        && doc.is_empty()
    {
        tags.remove(0);
    }
    tags
}

/// Strip the comment delimiters and the common leading `*`/whitespace
/// decoration. Blank lines pass through unchanged; indentation after the
/// `*` column is preserved so code blocks survive.
fn purify(raw: &str) -> String {
    // The closing `*/` may be missing when the comment runs to EOF.
    let inner = raw.trim();
    let inner = inner.strip_prefix("/**").unwrap_or(inner);
    let inner = inner.strip_suffix("*/").unwrap_or(inner);

    let lines: Vec<&str> = inner.lines().collect();
    let mut stripped: Vec<Option<String>> = Vec::with_capacity(lines.len());
    let mut plain_indent: Option<usize> = None;

    for line in &lines {
        let trimmed = line.trim_start();
        if let Some(rest) = trimmed.strip_prefix('*') {
            let rest = rest.strip_prefix(' ').unwrap_or(rest);
            stripped.push(Some(rest.to_string()));
        } else {
            if !trimmed.is_empty() {
                let indent = line.len() - trimmed.len();
                plain_indent = Some(plain_indent.map_or(indent, |p| p.min(indent)));
            }
            stripped.push(None);
        }
    }

    let common = plain_indent.unwrap_or(0);
    let mut out = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        match &stripped[i] {
            Some(s) => out.push(s.clone()),
            None => {
                let cut = line
                    .char_indices()
                    .nth(common)
                    .map(|(idx, _)| idx)
                    .unwrap_or(line.len());
                let keep = if line.trim().is_empty() { "" } else { &line[cut..] };
                out.push(keep.to_string());
            }
        }
    }
    out.join("\n")
}

struct TagParser<'a> {
    sc: Scanner,
    tags: Vec<Tag>,
    /// Index of the tag currently receiving free text.
    current: usize,
    comment_line: u32,
    file: &'a str,
    meta: &'a MetaRegistry,
    diags: &'a Diagnostics,
}

fn is_class_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$' || c == '.'
}

impl TagParser<'_> {
    fn run(&mut self) {
        while let Some(c) = self.sc.peek() {
            if c == '@' && self.at_tag_boundary() {
                self.tag();
            } else {
                self.sc.bump();
                self.append_char(c);
            }
        }
    }

    /// `@` opens a tag only at the start of input, after whitespace, and
    /// outside indented code blocks.
    fn at_tag_boundary(&self) -> bool {
        match self.sc.prev() {
            None => true,
            Some(p) if p.is_whitespace() => self.sc.line_indent() < CODE_INDENT,
            Some(_) => false,
        }
    }

    fn append_char(&mut self, c: char) {
        if let Some(doc) = self.tags[self.current].doc_mut() {
            doc.push(c);
        }
    }

    fn append_str(&mut self, s: &str) {
        if let Some(doc) = self.tags[self.current].doc_mut() {
            doc.push_str(s);
        }
    }

    /// Push a tag that collects the following free text.
    fn push_doc_tag(&mut self, tag: Tag) {
        self.tags.push(tag);
        self.current = self.tags.len() - 1;
    }

    /// Push a tag that doesn't; free text resumes into the previous one.
    fn push_plain(&mut self, tag: Tag) {
        self.tags.push(tag);
    }

    fn warn(&self, message: String) {
        let line = self.comment_line + self.sc.lines_consumed();
        self.diags
            .warn(Category::Tag, message, Some((self.file, line)));
    }

    fn tag(&mut self) {
        self.sc.bump(); // '@'
        let word = self.sc.take_while(|c| c.is_ascii_alphabetic());
        match word.as_str() {
            "class" => {
                let name = self.opt_class_name();
                self.push_doc_tag(Tag::Class {
                    name,
                    doc: String::new(),
                });
            }
            "extends" | "extend" => match self.opt_class_name() {
                Some(name) => self.push_plain(Tag::Extends { name }),
                None => self.warn("Missing class name after @extends".to_string()),
            },
            "mixins" | "mixin" => {
                let names = self.class_name_list();
                self.push_plain(Tag::Mixins { names });
            }
            "requires" => {
                let names = self.class_name_list();
                self.push_plain(Tag::Requires { names });
            }
            "uses" => {
                let names = self.class_name_list();
                self.push_plain(Tag::Uses { names });
            }
            "alternateClassName" | "alternateClassNames" => {
                let names = self.class_name_list();
                self.push_plain(Tag::AlternateClassNames { names });
            }
            "singleton" => self.push_plain(Tag::Singleton),
            "event" => {
                let name = self.opt_class_name();
                self.push_doc_tag(Tag::Event {
                    name,
                    doc: String::new(),
                });
            }
            "method" => {
                let name = self.opt_class_name();
                self.push_doc_tag(Tag::Method {
                    name,
                    doc: String::new(),
                });
            }
            "constructor" => self.push_doc_tag(Tag::Constructor { doc: String::new() }),
            "param" => self.param_tag(),
            "return" | "returns" => self.return_tag(),
            "cfg" => self.cfg_tag(),
            "property" => self.property_tag(),
            "var" => self.var_tag(),
            "type" => self.type_tag(),
            "alias" => self.alias_tag(),
            "xtype" => self.short_alias_tag("xtype", "widget"),
            "ptype" => self.short_alias_tag("ptype", "plugin"),
            "ftype" => self.short_alias_tag("ftype", "feature"),
            "member" => match self.opt_class_name() {
                Some(cls) => self.push_plain(Tag::Member { cls }),
                None => self.warn("Missing class name after @member".to_string()),
            },
            "inheritdoc" | "inheritDoc" => self.inheritdoc_tag(),
            "throws" => {
                let ty = self.opt_type();
                self.push_doc_tag(Tag::Throws {
                    ty,
                    doc: String::new(),
                });
            }
            "enum" => {
                let ty = self.opt_type();
                self.push_plain(Tag::Enum { ty });
            }
            "override" => {
                let name = self.opt_class_name();
                self.push_plain(Tag::Override { name });
            }
            _ => self.meta_or_literal(&word),
        }
    }

    // ─── Tag-specific sub-rules ─────────────────────────────────────────

    fn param_tag(&mut self) {
        let ty = self.opt_type_expr();
        self.sc.skip_inline_ws();
        let nd = parse_name_def(&mut self.sc);
        let marker_optional = self.opt_marker("(optional)");
        let deprecated = self.opt_marker("(deprecated)");
        let (name, default, nd_optional) = match nd {
            Some(nd) => (Some(nd.name), nd.default, nd.optional),
            None => (None, None, false),
        };
        let optional = ty.as_ref().is_some_and(|t| t.optional) || nd_optional || marker_optional;
        self.push_doc_tag(Tag::Param {
            ty: ty.map(|t| t.value),
            name,
            default,
            optional,
            deprecated,
            doc: String::new(),
        });
    }

    fn return_tag(&mut self) {
        let ty = self.opt_type();
        self.sc.skip_inline_ws();
        // Only the dotted `return.sub` form is a name here.
        let save = self.sc.pos();
        let mut name = None;
        if self.sc.eat_str("return.") {
            self.sc.set_pos(save);
            let word = self.sc.take_while(|c| is_class_char(c));
            if !word.is_empty() {
                name = Some(word);
            }
        }
        self.push_doc_tag(Tag::Return {
            ty,
            name,
            doc: String::new(),
        });
    }

    fn cfg_tag(&mut self) {
        let ty = self.opt_type_expr();
        self.sc.skip_inline_ws();
        let nd = parse_name_def(&mut self.sc);
        let required = self.opt_marker("(required)");
        let marker_optional = self.opt_marker("(optional)");
        let deprecated = self.opt_marker("(deprecated)");
        let (name, default, nd_optional) = match nd {
            Some(nd) => (Some(nd.name), nd.default, nd.optional),
            None => (None, None, false),
        };
        let optional = ty.as_ref().is_some_and(|t| t.optional) || nd_optional || marker_optional;
        self.push_doc_tag(Tag::Cfg {
            ty: ty.map(|t| t.value),
            name,
            default,
            optional,
            required,
            deprecated,
            doc: String::new(),
        });
    }

    fn property_tag(&mut self) {
        let ty = self.opt_type_expr();
        self.sc.skip_inline_ws();
        let nd = parse_name_def(&mut self.sc);
        let (name, default) = match nd {
            Some(nd) => (Some(nd.name), nd.default),
            None => (None, None),
        };
        self.push_doc_tag(Tag::Property {
            ty: ty.map(|t| t.value),
            name,
            default,
            doc: String::new(),
        });
    }

    fn var_tag(&mut self) {
        let ty = self.opt_type();
        self.sc.skip_inline_ws();
        let nd = parse_name_def(&mut self.sc);
        let (name, default) = match nd {
            Some(nd) => (Some(nd.name), nd.default),
            None => (None, None),
        };
        self.push_doc_tag(Tag::CssVar {
            ty,
            name,
            default,
            doc: String::new(),
        });
    }

    fn type_tag(&mut self) {
        self.sc.skip_inline_ws();
        let ty = match parse_type(&mut self.sc) {
            Some(t) => t.value,
            // Bare form: `@type Number`.
            None => self.sc.take_while(|c| !c.is_whitespace()),
        };
        if ty.is_empty() {
            self.warn("Missing type after @type".to_string());
        } else {
            self.push_plain(Tag::Type { ty });
        }
    }

    fn alias_tag(&mut self) {
        self.sc.skip_inline_ws();
        let token = self
            .sc
            .take_while(|c| is_class_char(c) || c == '#' || c == '-');
        if token.contains('#') || token.is_empty() {
            // Legacy member alias: `@alias Class#member`.
            self.push_plain(Tag::MemberAlias {
                target: parse_member_ref(&token),
            });
        } else {
            let mut names = vec![token];
            loop {
                let save = self.sc.pos();
                self.sc.skip_inline_ws();
                if !self.sc.eat(',') {
                    self.sc.set_pos(save);
                    break;
                }
                self.sc.skip_inline_ws();
                let next = self.sc.take_while(|c| is_class_char(c) || c == '-');
                if next.is_empty() {
                    self.sc.set_pos(save);
                    break;
                }
                names.push(next);
            }
            self.push_plain(Tag::Alias { names });
        }
    }

    fn short_alias_tag(&mut self, word: &str, namespace: &str) {
        self.sc.skip_inline_ws();
        let name = self.sc.take_while(|c| is_class_char(c) || c == '-');
        if name.is_empty() {
            self.warn(format!("Missing name after @{word}"));
            return;
        }
        self.push_plain(Tag::Alias {
            names: vec![format!("{namespace}.{name}")],
        });
    }

    fn inheritdoc_tag(&mut self) {
        self.sc.skip_inline_ws();
        let token = self
            .sc
            .take_while(|c| is_class_char(c) || c == '#' || c == '-');
        self.push_doc_tag(Tag::Inheritdoc {
            target: parse_member_ref(&token),
            doc: String::new(),
        });
    }

    fn meta_or_literal(&mut self, word: &str) {
        let Some(descr) = self.meta.get(word) else {
            self.warn(format!("Unsupported tag: @{word}"));
            self.append_str(&format!("@{word}"));
            return;
        };
        match descr.kind {
            MetaKind::Boolean => self.push_plain(Tag::Meta {
                key: word.to_string(),
                value: None,
                doc: String::new(),
            }),
            MetaKind::SingleLine => {
                self.sc.skip_inline_ws();
                let value = self.sc.rest_of_line().trim().to_string();
                self.push_plain(Tag::Meta {
                    key: word.to_string(),
                    value: Some(value),
                    doc: String::new(),
                });
            }
            MetaKind::MultiLine => self.push_doc_tag(Tag::Meta {
                key: word.to_string(),
                value: None,
                doc: String::new(),
            }),
        }
    }

    // ─── Shared helpers ─────────────────────────────────────────────────

    fn opt_class_name(&mut self) -> Option<String> {
        self.sc.skip_inline_ws();
        if !self
            .sc
            .peek()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        {
            return None;
        }
        let name = self.sc.take_while(is_class_char);
        Some(name)
    }

    fn class_name_list(&mut self) -> Vec<String> {
        self.sc.skip_inline_ws();
        let line = self.sc.rest_of_line();
        line.split([',', ' ', '\t'])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn opt_type_expr(&mut self) -> Option<super::types::TypeExpr> {
        self.sc.skip_inline_ws();
        parse_type(&mut self.sc)
    }

    fn opt_type(&mut self) -> Option<String> {
        self.opt_type_expr().map(|t| t.value)
    }

    fn opt_marker(&mut self, marker: &str) -> bool {
        let save = self.sc.pos();
        self.sc.skip_inline_ws();
        if self.sc.eat_str(marker) {
            true
        } else {
            self.sc.set_pos(save);
            false
        }
    }
}

/// Parse a `Class#static-type-member` reference token. All parts are
/// optional: `Class`, `Class#member`, `#member`, `#static-member`,
/// `#cfg-member` and the bare empty form are all valid.
pub fn parse_member_ref(token: &str) -> MemberRef {
    let mut r = MemberRef::default();
    let (cls, member) = match token.split_once('#') {
        Some((cls, member)) => (cls, Some(member)),
        None => (token, None),
    };
    if !cls.is_empty() {
        r.cls = Some(cls.to_string());
    }
    if let Some(mut member) = member {
        if let Some(rest) = member.strip_prefix("static-") {
            r.statics = true;
            member = rest;
        }
        for prefix in ["css_mixin", "css_var", "property", "method", "event", "cfg"] {
            if let Some(rest) = member
                .strip_prefix(prefix)
                .and_then(|rest| rest.strip_prefix('-'))
            {
                r.kind = MemberKind::parse(prefix);
                member = rest;
                break;
            }
        }
        if !member.is_empty() {
            r.member = Some(member.to_string());
        }
    }
    r
}
