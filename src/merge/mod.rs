//! Docset merging.
//!
//! Combines the parsed tags of a doc-comment with the code shape that
//! followed it into one canonical [`ClassRecord`] or [`MemberRecord`].
//! The rule throughout: explicit documentation wins, code-derived data
//! fills the gaps. Member comments attach to the most recent class seen
//! in the same file; `@member` redirects to a named class instead.
//!
//! # Submodules
//!
//! - [`split`]: the legacy class-comment splitter.

pub mod split;

use std::collections::{BTreeMap, HashMap};

use crate::config::Config;
use crate::diag::{Category, Diagnostics};
use crate::meta::MetaKind;
use crate::model::{
    AutoMember, ClassRecord, CodeShape, Docset, LitKind, MemberKind, MemberRecord, MemberRef,
    ParamDoc, SourceLoc, Tag, ThrowsDoc,
};

/// What a docset documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocKind {
    Class,
    Member(MemberKind),
}

/// Decide what a docset documents. Tag evidence is consulted before code
/// shape, and an explicit `@class`/`@override` beats everything.
pub fn classify(tags: &[Tag], shape: &CodeShape) -> DocKind {
    if tags
        .iter()
        .any(|t| matches!(t, Tag::Class { .. } | Tag::Override { .. }))
    {
        return DocKind::Class;
    }
    if tags.iter().any(|t| matches!(t, Tag::Event { .. })) {
        return DocKind::Member(MemberKind::Event);
    }
    if tags
        .iter()
        .any(|t| matches!(t, Tag::Method { .. } | Tag::Constructor { .. }))
    {
        return DocKind::Member(MemberKind::Method);
    }
    if tags
        .iter()
        .any(|t| matches!(t, Tag::Property { .. } | Tag::Type { .. }))
    {
        return DocKind::Member(MemberKind::Property);
    }
    if tags.iter().any(|t| matches!(t, Tag::CssVar { .. })) {
        return DocKind::Member(MemberKind::CssVar);
    }
    let cfgs = tags.iter().filter(|t| matches!(t, Tag::Cfg { .. })).count();
    if cfgs == 1 {
        return DocKind::Member(MemberKind::Cfg);
    }
    match strip_value(shape) {
        CodeShape::Define(_) | CodeShape::Extend { .. } | CodeShape::Override { .. } => {
            return DocKind::Class;
        }
        CodeShape::CssMixin { .. } => return DocKind::Member(MemberKind::CssMixin),
        CodeShape::CssVar { .. } => return DocKind::Member(MemberKind::CssVar),
        _ => {}
    }
    if upper_camel_target(shape) {
        return DocKind::Class;
    }
    if cfgs > 0 {
        return DocKind::Member(MemberKind::Cfg);
    }
    if shape.is_function() {
        return DocKind::Member(MemberKind::Method);
    }
    if tags
        .iter()
        .any(|t| matches!(t, Tag::Param { .. } | Tag::Return { .. }))
    {
        return DocKind::Member(MemberKind::Method);
    }
    DocKind::Member(MemberKind::Property)
}

/// Merge all docsets of one file into class records, in comment order.
pub fn merge_docsets(
    docsets: Vec<Docset>,
    filename: &str,
    config: &Config,
    diags: &Diagnostics,
) -> Vec<ClassRecord> {
    let merger = Merger {
        filename,
        config,
        diags,
    };
    let mut classes: Vec<ClassRecord> = Vec::new();
    let mut current: Option<usize> = None;
    // Side table for the current class: doc-comment line of a commented
    // auto-member, keyed back up when that comment's docset arrives.
    let mut auto: HashMap<u32, AutoMember> = HashMap::new();

    for docset in docsets {
        let line = docset.line;
        match classify(&docset.tags, &docset.shape) {
            DocKind::Class => {
                auto.clear();
                match merger.merge_class(docset, &mut auto) {
                    Some(cls) => {
                        classes.push(cls);
                        current = Some(classes.len() - 1);
                    }
                    None => current = None,
                }
            }
            DocKind::Member(kind) => {
                let auto_member = auto.remove(&line);
                let (member, member_of) = merger.merge_member(docset, kind, auto_member);
                merger.attach(member, member_of, line, &mut classes, current);
            }
        }
    }
    classes
}

struct Merger<'a> {
    filename: &'a str,
    config: &'a Config,
    diags: &'a Diagnostics,
}

impl Merger<'_> {
    fn loc(&self, line: u32) -> SourceLoc {
        SourceLoc {
            filename: self.filename.to_string(),
            line,
        }
    }

    fn warn(&self, cat: Category, msg: String, line: u32) {
        self.diags.warn(cat, msg, Some((self.filename, line)));
    }

    // ─── Classes ────────────────────────────────────────────────────────

    fn merge_class(
        &self,
        docset: Docset,
        auto: &mut HashMap<u32, AutoMember>,
    ) -> Option<ClassRecord> {
        let Docset { tags, shape, line } = docset;
        let (class_tags, groups) = split::split_class_tags(tags);

        // Extend/override call bodies auto-detect members the same way a
        // define config object does, minus the structural keys.
        let code_members: Vec<AutoMember> = match strip_value(&shape) {
            CodeShape::Define(info) => info.members.clone(),
            CodeShape::Extend { members, .. } | CodeShape::Override { members, .. } => {
                members.clone()
            }
            _ => Vec::new(),
        };

        let mut name: Option<String> = None;
        let mut doc_parts: Vec<String> = Vec::new();
        let mut extends: Option<String> = None;
        let mut mixins: Vec<String> = Vec::new();
        let mut requires: Vec<String> = Vec::new();
        let mut uses: Vec<String> = Vec::new();
        let mut alternates: Vec<String> = Vec::new();
        let mut alias_names: Vec<String> = Vec::new();
        let mut singleton = false;
        let mut enum_type: Option<String> = None;
        let mut override_target: Option<String> = None;
        let mut meta = BTreeMap::new();
        let mut private = false;

        for tag in &class_tags {
            match tag {
                Tag::Default { doc } => push_doc(&mut doc_parts, doc),
                Tag::Class { name: n, doc } => {
                    if name.is_none() {
                        name = n.clone();
                    }
                    push_doc(&mut doc_parts, doc);
                }
                Tag::Extends { name: n } => extends = Some(n.clone()),
                Tag::Mixins { names } => mixins.extend(names.iter().cloned()),
                Tag::Requires { names } => requires.extend(names.iter().cloned()),
                Tag::Uses { names } => uses.extend(names.iter().cloned()),
                Tag::AlternateClassNames { names } => alternates.extend(names.iter().cloned()),
                Tag::Singleton => singleton = true,
                Tag::Alias { names } => alias_names.extend(names.iter().cloned()),
                Tag::Enum { ty } => {
                    enum_type = Some(ty.clone().unwrap_or_else(|| "Object".to_string()));
                }
                Tag::Override { name: n } => {
                    if override_target.is_none() {
                        override_target = n.clone();
                    }
                }
                Tag::Meta { key, value, doc } => {
                    self.apply_meta(&mut meta, &mut private, key, value, doc);
                }
                _ => {}
            }
        }

        // Explicit tags win; the code shape fills what they left out.
        match strip_value(&shape) {
            CodeShape::Define(info) => {
                if name.is_none() {
                    name = info.name.clone();
                }
                if extends.is_none() {
                    extends = info.extends.clone();
                }
                if mixins.is_empty() {
                    mixins = info.mixins.clone();
                }
                if requires.is_empty() {
                    requires = info.requires.clone();
                }
                if uses.is_empty() {
                    uses = info.uses.clone();
                }
                if alternates.is_empty() {
                    alternates = info.alternate_class_names.clone();
                }
                if alias_names.is_empty() {
                    alias_names = info.aliases.clone();
                }
                singleton = singleton || info.singleton;
                if override_target.is_none() {
                    override_target = info.override_target.clone();
                }
            }
            CodeShape::Extend { parent, .. } => {
                if extends.is_none() {
                    extends = parent.clone();
                }
            }
            CodeShape::Override { target, .. } => {
                if override_target.is_none() {
                    override_target = target.clone();
                }
            }
            _ => {}
        }
        if name.is_none() {
            name = shape_class_name(&shape);
        }
        // An override without a name of its own gets a synthetic one; it
        // only lives until override application anyway.
        if name.is_none()
            && let Some(target) = &override_target
        {
            name = Some(format!("{target}.Overrides"));
        }
        let Some(name) = name else {
            self.warn(
                Category::NoClass,
                "Class documentation without a name".to_string(),
                line,
            );
            return None;
        };

        let mut cls = ClassRecord::new(name);
        cls.doc = doc_parts.join("\n\n");
        cls.extends = extends;
        cls.mixins = mixins;
        cls.requires = requires;
        cls.uses = uses;
        cls.alternate_class_names = alternates;
        cls.aliases = self.group_aliases(&alias_names, line);
        cls.singleton = singleton;
        cls.enum_type = enum_type;
        cls.override_target = override_target;
        cls.meta = meta;
        cls.private = private;
        cls.files.push(self.loc(line));

        for am in &code_members {
            match am.comment_line {
                Some(cline) => {
                    auto.insert(cline, am.clone());
                }
                None => {
                    let m = self.synthesize_auto(am, &cls.name);
                    cls.members.push(m);
                }
            }
        }

        for group in groups {
            let kind = if group.iter().any(|t| matches!(t, Tag::Cfg { .. })) {
                MemberKind::Cfg
            } else {
                MemberKind::Method
            };
            let (mut m, _) = self.build_member(group, &CodeShape::Nothing, kind, line, None);
            m.owner = cls.name.clone();
            cls.members.push(m);
        }

        Some(cls)
    }

    /// Group namespaced alias strings (`widget.grid`) by their namespace.
    fn group_aliases(&self, names: &[String], line: u32) -> BTreeMap<String, Vec<String>> {
        let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for full in names {
            match full.split_once('.') {
                Some((ns, short)) => {
                    map.entry(ns.to_string())
                        .or_default()
                        .push(short.to_string());
                }
                None => self.warn(
                    Category::Alias,
                    format!("Alias without a namespace: {full}"),
                    line,
                ),
            }
        }
        map
    }

    /// A member detected from code alone. Members from inheritable
    /// buckets inherit their documentation from the parent; everything
    /// else is private implementation detail.
    fn synthesize_auto(&self, am: &AutoMember, owner: &str) -> MemberRecord {
        let mut m = MemberRecord::new(am.kind, &am.name, owner);
        m.autodetected = true;
        m.params = am
            .params
            .iter()
            .map(|p| ParamDoc {
                name: p.clone(),
                ..ParamDoc::default()
            })
            .collect();
        m.default = am.default.clone();
        m.ty = am.lit.map(|l| l.type_name().to_string());
        m.flags.statics = am.statics;
        m.flags.inheritable = am.inheritable;
        m.flags.evented = am.evented;
        if am.inheritable {
            m.inheritdoc = Some(MemberRef::default());
        } else {
            m.flags.private = true;
        }
        m.files.push(self.loc(am.line));
        m.update_id();
        m
    }

    // ─── Members ────────────────────────────────────────────────────────

    fn merge_member(
        &self,
        docset: Docset,
        kind: MemberKind,
        auto: Option<AutoMember>,
    ) -> (MemberRecord, Option<String>) {
        let Docset { tags, shape, line } = docset;
        // The classifier only saw the comment; a member detected inside a
        // config/statics bucket keeps its bucket kind unless a tag says
        // otherwise.
        let kind = match &auto {
            Some(am) if !has_kind_tag(&tags) => am.kind,
            _ => kind,
        };
        self.build_member(tags, &shape, kind, line, auto)
    }

    fn attach(
        &self,
        mut member: MemberRecord,
        member_of: Option<String>,
        line: u32,
        classes: &mut Vec<ClassRecord>,
        current: Option<usize>,
    ) {
        let idx = if let Some(cls_name) = member_of {
            match classes.iter().position(|c| c.name == cls_name) {
                Some(idx) => Some(idx),
                None => {
                    // `@member` can document into a class defined in
                    // another file; a bare record merges with the real
                    // one in the registry.
                    let mut cls = ClassRecord::new(&cls_name);
                    cls.files.push(self.loc(line));
                    classes.push(cls);
                    Some(classes.len() - 1)
                }
            }
        } else {
            current
        };
        match idx {
            Some(idx) => {
                member.owner = classes[idx].name.clone();
                member.update_id();
                classes[idx].members.push(member);
            }
            None => self.warn(
                Category::NoClass,
                format!("Member documentation without a class: {}", member.name),
                line,
            ),
        }
    }

    /// Build one member record from a tag group plus the code evidence.
    fn build_member(
        &self,
        tags: Vec<Tag>,
        shape: &CodeShape,
        kind: MemberKind,
        line: u32,
        auto: Option<AutoMember>,
    ) -> (MemberRecord, Option<String>) {
        let mut m = MemberRecord::new(kind, "", "");
        let mut member_of: Option<String> = None;
        let mut doc_parts: Vec<String> = Vec::new();
        let mut explicit_name: Option<String> = None;
        let mut explicit_params: Vec<ParamDoc> = Vec::new();
        let mut subs: Vec<ParamDoc> = Vec::new();
        let mut ret_main: Option<ParamDoc> = None;
        let mut ret_subs: Vec<ParamDoc> = Vec::new();
        let mut constructor = false;
        let mut main_seen = false;
        let mut private = false;

        for tag in tags {
            match tag {
                Tag::Default { doc } => push_doc(&mut doc_parts, &doc),
                Tag::Event { name, doc } | Tag::Method { name, doc } => {
                    if explicit_name.is_none() {
                        explicit_name = name;
                    }
                    push_doc(&mut doc_parts, &doc);
                }
                Tag::Constructor { doc } => {
                    constructor = true;
                    push_doc(&mut doc_parts, &doc);
                }
                Tag::Param {
                    ty,
                    name,
                    default,
                    optional,
                    deprecated,
                    doc,
                } => explicit_params.push(ParamDoc {
                    name: name.unwrap_or_default(),
                    ty,
                    default,
                    optional,
                    deprecated,
                    doc,
                    properties: Vec::new(),
                }),
                Tag::Return { ty, name, doc } => match name {
                    Some(dotted) => ret_subs.push(ParamDoc {
                        name: dotted,
                        ty,
                        doc,
                        ..ParamDoc::default()
                    }),
                    None => {
                        ret_main = Some(ParamDoc {
                            name: "return".to_string(),
                            ty,
                            doc,
                            ..ParamDoc::default()
                        });
                    }
                },
                Tag::Cfg {
                    ty,
                    name,
                    default,
                    optional,
                    required,
                    deprecated,
                    doc,
                } => {
                    if kind == MemberKind::Cfg && !main_seen {
                        main_seen = true;
                        explicit_name = name;
                        m.ty = ty;
                        m.default = default;
                        m.flags.required = required;
                        if deprecated {
                            m.meta.entry("deprecated".to_string()).or_default();
                        }
                        push_doc(&mut doc_parts, &doc);
                    } else {
                        subs.push(ParamDoc {
                            name: name.unwrap_or_default(),
                            ty,
                            default,
                            optional,
                            deprecated,
                            doc,
                            properties: Vec::new(),
                        });
                    }
                }
                Tag::Property {
                    ty,
                    name,
                    default,
                    doc,
                } => {
                    if kind == MemberKind::Property && !main_seen {
                        main_seen = true;
                        explicit_name = name;
                        m.ty = ty;
                        m.default = default;
                        push_doc(&mut doc_parts, &doc);
                    } else {
                        subs.push(ParamDoc {
                            name: name.unwrap_or_default(),
                            ty,
                            default,
                            doc,
                            ..ParamDoc::default()
                        });
                    }
                }
                Tag::CssVar {
                    ty,
                    name,
                    default,
                    doc,
                } => {
                    if kind == MemberKind::CssVar && !main_seen {
                        main_seen = true;
                        explicit_name = name;
                        m.ty = ty;
                        m.default = default;
                        push_doc(&mut doc_parts, &doc);
                    } else {
                        subs.push(ParamDoc {
                            name: name.unwrap_or_default(),
                            ty,
                            default,
                            doc,
                            ..ParamDoc::default()
                        });
                    }
                }
                Tag::Type { ty } => {
                    if m.ty.is_none() {
                        m.ty = Some(ty);
                    }
                }
                Tag::Member { cls } => member_of = Some(cls),
                Tag::Inheritdoc { target, doc } => {
                    m.inheritdoc = Some(target);
                    push_doc(&mut doc_parts, &doc);
                }
                Tag::MemberAlias { target } => m.alias = Some(target),
                Tag::Throws { ty, doc } => m.throws.push(ThrowsDoc { ty, doc }),
                Tag::Meta { key, value, doc } => {
                    self.apply_meta(&mut m.meta, &mut private, &key, &value, &doc);
                }
                _ => {}
            }
        }

        if constructor && explicit_name.is_none() {
            explicit_name = Some("constructor".to_string());
        }
        let code_name = auto
            .as_ref()
            .map(|a| a.name.clone())
            .or_else(|| shape_member_name(shape));
        // Guard against attributing an unrelated code literal to a member
        // whose documented name doesn't match the code.
        let name_matches = explicit_name.is_none() || explicit_name == code_name;
        m.name = explicit_name.or(code_name.clone()).unwrap_or_default();
        m.doc = doc_parts.join("\n\n");

        if name_matches {
            let (code_lit, code_default) = code_literal(shape, &auto);
            if m.ty.is_none() {
                m.ty = code_lit.map(|l| l.type_name().to_string());
            }
            if m.default.is_none() {
                m.default = code_default;
            }
        }

        let code_params = match &auto {
            Some(am) => am.params.clone(),
            None => shape_params(shape),
        };
        if explicit_params.is_empty() {
            m.params = code_params
                .iter()
                .map(|p| ParamDoc {
                    name: p.clone(),
                    ..ParamDoc::default()
                })
                .collect();
        } else {
            for (i, p) in explicit_params.iter_mut().enumerate() {
                if p.name.is_empty()
                    && let Some(cp) = code_params.get(i)
                {
                    p.name = cp.clone();
                }
            }
            let vararg = explicit_params
                .last()
                .and_then(|p| p.ty.as_deref())
                .is_some_and(|t| t.ends_with("..."));
            // Dotted sub-property params don't count against the
            // code-detected parameter list.
            let top_level = explicit_params
                .iter()
                .filter(|p| !p.name.contains('.'))
                .count();
            if name_matches && !code_params.is_empty() && top_level != code_params.len() && !vararg {
                self.warn(
                    Category::Param,
                    format!(
                        "{}: {} parameters documented, {} found in code",
                        m.name,
                        top_level,
                        code_params.len()
                    ),
                    line,
                );
            }
            m.params = self.nest_subproperties(explicit_params, line);
        }

        let mut ret_flat = Vec::new();
        if let Some(main) = ret_main {
            ret_flat.push(main);
        }
        ret_flat.extend(ret_subs);
        if !ret_flat.is_empty() {
            let mut nested = self.nest_subproperties(ret_flat, line);
            if !nested.is_empty() {
                m.ret = Some(nested.remove(0));
            }
        }

        if !subs.is_empty() {
            let root = ParamDoc {
                name: m.name.clone(),
                ..ParamDoc::default()
            };
            let mut flat = vec![root];
            flat.extend(subs);
            let mut nested = self.nest_subproperties(flat, line);
            if !nested.is_empty() {
                m.properties = nested.remove(0).properties;
            }
        }

        if let Some(am) = &auto {
            m.flags.statics = am.statics;
            m.flags.inheritable = am.inheritable;
            m.flags.evented = am.evented;
        }
        if m.meta.contains_key("static") {
            m.flags.statics = true;
        }
        if m.meta.contains_key("inheritable") {
            m.flags.inheritable = true;
        }
        if m.meta.contains_key("accessor") {
            m.flags.accessor = true;
        }
        if m.meta.contains_key("evented") {
            m.flags.evented = true;
        }
        m.flags.private = private;
        m.files.push(self.loc(line));
        m.update_id();
        (m, member_of)
    }

    /// Nest dotted names under the sibling whose name matches the prefix.
    fn nest_subproperties(&self, flat: Vec<ParamDoc>, line: u32) -> Vec<ParamDoc> {
        let mut roots: Vec<ParamDoc> = Vec::new();
        for mut p in flat {
            let Some((prefix, leaf)) = p.name.rsplit_once('.') else {
                roots.push(p);
                continue;
            };
            match find_by_path(&mut roots, prefix) {
                Some(parent) => {
                    p.name = leaf.to_string();
                    parent.properties.push(p);
                }
                None => self.warn(
                    Category::Subproperty,
                    format!("{}: no parent found for sub-property", p.name),
                    line,
                ),
            }
        }
        roots
    }

    fn apply_meta(
        &self,
        meta: &mut BTreeMap<String, String>,
        private: &mut bool,
        key: &str,
        value: &Option<String>,
        doc: &str,
    ) {
        let text = match self.config.meta.get(key).map(|d| d.kind) {
            Some(MetaKind::Boolean) => "true".to_string(),
            Some(MetaKind::SingleLine) => value.clone().unwrap_or_default(),
            Some(MetaKind::MultiLine) | None => doc.to_string(),
        };
        meta.insert(key.to_string(), text);
        if self.config.meta.is_private_tag(key) {
            *private = true;
        }
    }
}

// ─── Shape helpers ──────────────────────────────────────────────────────────

/// Unwrap assignment-like shapes to the value expression on the right.
fn strip_value(shape: &CodeShape) -> &CodeShape {
    match shape {
        CodeShape::VarDecl { value: Some(v), .. }
        | CodeShape::Assignment { value: Some(v), .. }
        | CodeShape::PropertyLiteral { value: Some(v), .. } => strip_value(v),
        other => other,
    }
}

/// Old-style classes assign to an upper-camel-case name.
fn upper_camel_target(shape: &CodeShape) -> bool {
    let name = match shape {
        CodeShape::Function { name: Some(n), .. } => n.as_str(),
        CodeShape::VarDecl { name, .. } => name.as_str(),
        CodeShape::Assignment { name, .. } => match name.last() {
            Some(n) => n.as_str(),
            None => return false,
        },
        _ => return false,
    };
    name.starts_with(|c: char| c.is_ascii_uppercase())
}

/// Full dotted class name targeted by an assignment-like shape.
fn shape_class_name(shape: &CodeShape) -> Option<String> {
    match shape {
        CodeShape::Function { name, .. } => name.clone(),
        CodeShape::VarDecl { name, .. } => Some(name.clone()),
        CodeShape::Assignment { name, .. } if !name.is_empty() => Some(name.join(".")),
        _ => None,
    }
}

/// Member name derived from a shape; assignments use the last segment.
fn shape_member_name(shape: &CodeShape) -> Option<String> {
    match shape {
        CodeShape::Function { name, .. } => name.clone(),
        CodeShape::VarDecl { name, .. }
        | CodeShape::PropertyLiteral { name, .. }
        | CodeShape::CssMixin { name, .. }
        | CodeShape::CssVar { name, .. } => Some(name.clone()),
        CodeShape::Assignment { name, .. } => name.last().cloned(),
        _ => None,
    }
}

fn shape_params(shape: &CodeShape) -> Vec<String> {
    match strip_value(shape) {
        CodeShape::Function { params, .. } | CodeShape::CssMixin { params, .. } => params.clone(),
        _ => Vec::new(),
    }
}

/// Literal evidence for a member's type and default value.
fn code_literal(shape: &CodeShape, auto: &Option<AutoMember>) -> (Option<LitKind>, Option<String>) {
    if let Some(am) = auto {
        return (am.lit, am.default.clone());
    }
    match strip_value(shape) {
        CodeShape::Literal { kind, text } => (Some(*kind), Some(text.clone())),
        CodeShape::CssVar { default, .. } => (None, default.clone()),
        _ => (None, None),
    }
}

fn has_kind_tag(tags: &[Tag]) -> bool {
    tags.iter().any(|t| {
        matches!(
            t,
            Tag::Event { .. }
                | Tag::Method { .. }
                | Tag::Constructor { .. }
                | Tag::Cfg { .. }
                | Tag::Property { .. }
                | Tag::Type { .. }
                | Tag::CssVar { .. }
        )
    })
}

fn push_doc(parts: &mut Vec<String>, doc: &str) {
    if !doc.is_empty() {
        parts.push(doc.to_string());
    }
}

fn find_by_path<'a>(roots: &'a mut [ParamDoc], path: &str) -> Option<&'a mut ParamDoc> {
    let mut segments = path.split('.');
    let first = segments.next()?;
    let mut cur = roots.iter_mut().find(|p| p.name == first)?;
    for seg in segments {
        cur = cur.properties.iter_mut().find(|p| p.name == seg)?;
    }
    Some(cur)
}
