//! Data types used throughout classdoc.
//!
//! This module contains all the "model" structs and enums that flow through
//! the pipeline: lexer tokens, parsed doc-comment tags, recognized code
//! shapes, and the canonical class/member records the merger produces and
//! the registry resolves.
//!
//! Both [`Tag`] and [`CodeShape`] are closed enums with named variant
//! fields and are matched exhaustively downstream; there is no
//! string-keyed probing of dynamically shaped nodes anywhere in the crate.

use std::collections::BTreeMap;

use serde::Serialize;

// ─── Tokens ─────────────────────────────────────────────────────────────────

/// Kind of a lexer token.
///
/// The first seven kinds are produced by the JavaScript tokenizer; the CSS
/// tokenizer additionally produces `AtKeyword`, `Hash`, `Percentage` and
/// `Dimension`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Number,
    Str,
    Ident,
    Keyword,
    Regex,
    Operator,
    DocComment,
    AtKeyword,
    Hash,
    Percentage,
    Dimension,
}

/// One lexer token. Immutable once produced.
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    /// Raw source text of the token. Strings keep their quotes, doc
    /// comments keep their `/** */` delimiters.
    pub value: String,
    /// 1-based source line where the token starts.
    pub line: u32,
}

// ─── Member kinds and ids ───────────────────────────────────────────────────

/// The member kinds a class can own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    Method,
    Event,
    Cfg,
    Property,
    CssVar,
    CssMixin,
}

impl MemberKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberKind::Method => "method",
            MemberKind::Event => "event",
            MemberKind::Cfg => "cfg",
            MemberKind::Property => "property",
            MemberKind::CssVar => "css_var",
            MemberKind::CssMixin => "css_mixin",
        }
    }

    /// Parse a member kind name as it appears in `#cfg-name` style member
    /// references. Returns `None` for unknown prefixes.
    pub fn parse(s: &str) -> Option<MemberKind> {
        match s {
            "method" => Some(MemberKind::Method),
            "event" => Some(MemberKind::Event),
            "cfg" => Some(MemberKind::Cfg),
            "property" => Some(MemberKind::Property),
            "css_var" | "var" => Some(MemberKind::CssVar),
            "css_mixin" | "mixin" => Some(MemberKind::CssMixin),
            _ => None,
        }
    }
}

/// Compute the stable id of a member: optional `static-` prefix, the
/// member kind, and the name with `$` replaced for URL/id safety.
///
/// Examples: `cfg-width`, `static-method-create`, `css_var-S-base-color`.
pub fn member_id(statics: bool, kind: MemberKind, name: &str) -> String {
    let safe = name.replace('$', "S-");
    if statics {
        format!("static-{}-{}", kind.as_str(), safe)
    } else {
        format!("{}-{}", kind.as_str(), safe)
    }
}

// ─── Doc-comment tags ───────────────────────────────────────────────────────

/// A reference to a class member, as written in `@inheritdoc` and the
/// legacy `@alias Class#member` form:
///
///   - `Class#member`
///   - `Class#static-member`
///   - `Class#cfg-member`
///   - `#member` (same-class sibling)
///   - bare (implicit parent/mixin lookup)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MemberRef {
    /// Target class name; `None` means the current class.
    pub cls: Option<String>,
    /// Target member name; `None` means "the member with the same name".
    pub member: Option<String>,
    /// Optional member-kind disambiguator (`cfg-`, `method-`, ...).
    pub kind: Option<MemberKind>,
    /// Whether the `static-` prefix was present.
    pub statics: bool,
}

/// One `@directive` parsed out of a doc-comment.
///
/// Produced in source order within one comment, always starting with an
/// implicit `Default` tag that collects the leading free text. Variants
/// that accept trailing free text carry a `doc` field; free text following
/// a tag without one keeps accumulating into the previous doc-carrying tag.
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    /// Implicit leading tag holding text before any `@directive`.
    Default { doc: String },
    Class { name: Option<String>, doc: String },
    Extends { name: String },
    Mixins { names: Vec<String> },
    Requires { names: Vec<String> },
    Uses { names: Vec<String> },
    AlternateClassNames { names: Vec<String> },
    Singleton,
    Event { name: Option<String>, doc: String },
    Method { name: Option<String>, doc: String },
    Constructor { doc: String },
    Param {
        ty: Option<String>,
        name: Option<String>,
        default: Option<String>,
        optional: bool,
        deprecated: bool,
        doc: String,
    },
    Return {
        ty: Option<String>,
        /// Set for the `return.sub` dotted sub-property form.
        name: Option<String>,
        doc: String,
    },
    Cfg {
        ty: Option<String>,
        name: Option<String>,
        default: Option<String>,
        optional: bool,
        required: bool,
        deprecated: bool,
        doc: String,
    },
    Property {
        ty: Option<String>,
        name: Option<String>,
        default: Option<String>,
        doc: String,
    },
    Type { ty: String },
    /// Namespaced aliases: `@alias widget.grid`, `@xtype grid` (desugared).
    Alias { names: Vec<String> },
    /// Legacy member alias: `@alias Ext.Class#member`.
    MemberAlias { target: MemberRef },
    Member { cls: String },
    Inheritdoc { target: MemberRef, doc: String },
    Throws { ty: Option<String>, doc: String },
    Enum { ty: Option<String> },
    Override { name: Option<String> },
    /// CSS variable tag: `@var {measurement} $button-height`.
    CssVar {
        ty: Option<String>,
        name: Option<String>,
        default: Option<String>,
        doc: String,
    },
    /// A tag registered in the meta-tag table (`@static`, `@deprecated`, ...).
    /// `value` is set for single-line tags; multi-line tags collect into `doc`.
    Meta {
        key: String,
        value: Option<String>,
        doc: String,
    },
}

impl Tag {
    /// Mutable access to the free-text buffer of doc-carrying variants.
    pub fn doc_mut(&mut self) -> Option<&mut String> {
        match self {
            Tag::Default { doc }
            | Tag::Class { doc, .. }
            | Tag::Event { doc, .. }
            | Tag::Method { doc, .. }
            | Tag::Constructor { doc }
            | Tag::Param { doc, .. }
            | Tag::Return { doc, .. }
            | Tag::Cfg { doc, .. }
            | Tag::Property { doc, .. }
            | Tag::Inheritdoc { doc, .. }
            | Tag::Throws { doc, .. }
            | Tag::CssVar { doc, .. }
            | Tag::Meta { doc, .. } => Some(doc),
            _ => None,
        }
    }

    pub fn doc(&self) -> Option<&str> {
        match self {
            Tag::Default { doc }
            | Tag::Class { doc, .. }
            | Tag::Event { doc, .. }
            | Tag::Method { doc, .. }
            | Tag::Constructor { doc }
            | Tag::Param { doc, .. }
            | Tag::Return { doc, .. }
            | Tag::Cfg { doc, .. }
            | Tag::Property { doc, .. }
            | Tag::Inheritdoc { doc, .. }
            | Tag::Throws { doc, .. }
            | Tag::CssVar { doc, .. }
            | Tag::Meta { doc, .. } => Some(doc),
            _ => None,
        }
    }
}

// ─── Code shapes ────────────────────────────────────────────────────────────

/// Classification of a literal expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LitKind {
    Str,
    Number,
    Boolean,
    RegExp,
    Array,
    Object,
}

impl LitKind {
    /// The documented type name for a literal of this kind.
    pub fn type_name(&self) -> &'static str {
        match self {
            LitKind::Str => "String",
            LitKind::Number => "Number",
            LitKind::Boolean => "Boolean",
            LitKind::RegExp => "RegExp",
            LitKind::Array => "Array",
            LitKind::Object => "Object",
        }
    }
}

/// A member auto-detected from a `define` config object body.
///
/// Auto-members carry an explicit integer `id` assigned at creation so the
/// merger can correlate them with doc-comments found inside the same body
/// without relying on node identity.
#[derive(Debug, Clone, PartialEq)]
pub struct AutoMember {
    pub id: u32,
    pub kind: MemberKind,
    pub name: String,
    /// Parameter names, for function-valued members.
    pub params: Vec<String>,
    /// Literal default text, for value members.
    pub default: Option<String>,
    pub lit: Option<LitKind>,
    pub statics: bool,
    /// True for members from `config`/`cachedConfig`/`eventedConfig`/
    /// `inheritableStatics` buckets.
    pub inheritable: bool,
    pub evented: bool,
    /// Line of the member's own doc-comment inside the body, when it has
    /// one. Such members are documented through their own docset (matched
    /// back up by this line) and are skipped when synthesizing records
    /// from the auto-detected list.
    pub comment_line: Option<u32>,
    pub line: u32,
}

/// Structural data extracted from `NS.define(name, {...})` and friends.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefineInfo {
    pub name: Option<String>,
    pub extends: Option<String>,
    pub mixins: Vec<String>,
    pub requires: Vec<String>,
    pub uses: Vec<String>,
    pub alternate_class_names: Vec<String>,
    /// Already-namespaced alias strings; `xtype: "foo"` arrives here as
    /// `widget.foo`.
    pub aliases: Vec<String>,
    pub singleton: bool,
    /// Target of the `override:` config key, when present.
    pub override_target: Option<String>,
    pub members: Vec<AutoMember>,
}

/// Best-effort structural guess for the statement following a doc-comment.
///
/// Parsing never fails past this point: anything unrecognized becomes
/// [`CodeShape::Nothing`] and the rest of the file is still scanned.
#[derive(Debug, Clone, PartialEq)]
pub enum CodeShape {
    Function {
        name: Option<String>,
        params: Vec<String>,
    },
    VarDecl {
        name: String,
        value: Option<Box<CodeShape>>,
    },
    Assignment {
        /// The identifier chain on the left (`My.ns.Foo` as segments).
        name: Vec<String>,
        value: Option<Box<CodeShape>>,
    },
    PropertyLiteral {
        name: String,
        value: Option<Box<CodeShape>>,
    },
    Define(DefineInfo),
    /// `NS.extend(Parent, {...})`, standalone or as an assignment value.
    Extend {
        parent: Option<String>,
        members: Vec<AutoMember>,
    },
    /// `NS.override(Target, {...})`.
    Override {
        target: Option<String>,
        members: Vec<AutoMember>,
    },
    Literal { kind: LitKind, text: String },
    CssMixin {
        name: String,
        params: Vec<String>,
    },
    CssVar {
        name: String,
        default: Option<String>,
    },
    Nothing,
}

impl CodeShape {
    /// Whether the shape is (or wraps) a function expression.
    pub fn is_function(&self) -> bool {
        match self {
            CodeShape::Function { .. } => true,
            CodeShape::VarDecl { value: Some(v), .. }
            | CodeShape::Assignment { value: Some(v), .. }
            | CodeShape::PropertyLiteral { value: Some(v), .. } => v.is_function(),
            _ => false,
        }
    }
}

// ─── Docsets ────────────────────────────────────────────────────────────────

/// One parsed doc-comment plus the code shape recognized after it.
#[derive(Debug, Clone)]
pub struct Docset {
    pub tags: Vec<Tag>,
    pub shape: CodeShape,
    /// 1-based line of the doc-comment.
    pub line: u32,
}

// ─── Canonical records ──────────────────────────────────────────────────────

/// A source location carried on records for diagnostics and provenance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceLoc {
    pub filename: String,
    pub line: u32,
}

/// A documented parameter, return value, or sub-property. Sub-properties
/// nest recursively through `properties`, grouped by dotted names.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParamDoc {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Option<String>,
    pub default: Option<String>,
    pub optional: bool,
    pub deprecated: bool,
    pub doc: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<ParamDoc>,
}

/// One `@throws` entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThrowsDoc {
    #[serde(rename = "type")]
    pub ty: Option<String>,
    pub doc: String,
}

/// Identity of a member another member shadowed during flattening.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberSource {
    pub name: String,
    pub owner: String,
    pub id: String,
}

/// Boolean member flags resolved by the merger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MemberFlags {
    pub private: bool,
    #[serde(rename = "static")]
    pub statics: bool,
    pub inheritable: bool,
    pub required: bool,
    pub accessor: bool,
    pub evented: bool,
    pub singleton: bool,
}

/// The canonical record for one class member.
///
/// Mutable only during merge and resolution; the flattened views handed to
/// consumers are cache copies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberRecord {
    pub kind: MemberKind,
    pub name: String,
    /// Name of the class that defined this member.
    pub owner: String,
    pub id: String,
    #[serde(rename = "type")]
    pub ty: Option<String>,
    pub default: Option<String>,
    pub doc: String,
    pub params: Vec<ParamDoc>,
    /// Documented return spec; `None` when no `@return` tag was written.
    /// See [`MemberRecord::effective_return_type`] for the default.
    pub ret: Option<ParamDoc>,
    pub throws: Vec<ThrowsDoc>,
    /// Sub-properties of a cfg/property/css_var member.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<ParamDoc>,
    pub flags: MemberFlags,
    /// Values of registered meta tags present on the member.
    pub meta: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inheritdoc: Option<MemberRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<MemberRef>,
    /// What this member shadowed during flattening, in shadow order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub overrides: Vec<MemberSource>,
    pub files: Vec<SourceLoc>,
    /// True for members synthesized from code without their own comment.
    pub autodetected: bool,
}

impl MemberRecord {
    pub fn new(kind: MemberKind, name: impl Into<String>, owner: impl Into<String>) -> Self {
        let name = name.into();
        let id = member_id(false, kind, &name);
        MemberRecord {
            kind,
            name,
            owner: owner.into(),
            id,
            ty: None,
            default: None,
            doc: String::new(),
            params: Vec::new(),
            ret: None,
            throws: Vec::new(),
            properties: Vec::new(),
            flags: MemberFlags::default(),
            meta: BTreeMap::new(),
            inheritdoc: None,
            alias: None,
            overrides: Vec::new(),
            files: Vec::new(),
            autodetected: false,
        }
    }

    /// Recompute `id` after name/kind/static changes.
    pub fn update_id(&mut self) {
        self.id = member_id(self.flags.statics, self.kind, &self.name);
    }

    /// The documented return type, falling back to `undefined` for plain
    /// methods and `Object` for constructors.
    pub fn effective_return_type(&self) -> &str {
        if let Some(ret) = &self.ret
            && let Some(ty) = &ret.ty
        {
            return ty;
        }
        if self.name == "constructor" { "Object" } else { "undefined" }
    }

    /// Provenance triple used when this member shadows another.
    pub fn source(&self) -> MemberSource {
        MemberSource {
            name: self.name.clone(),
            owner: self.owner.clone(),
            id: self.id.clone(),
        }
    }
}

/// The canonical record for one class.
///
/// Identity is the fully-qualified name; alternate names are secondary
/// keys into the same record. A placeholder record returned by registry
/// lookup for unknown names has `exists == false`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassRecord {
    pub name: String,
    pub exists: bool,
    pub doc: String,
    pub extends: Option<String>,
    pub mixins: Vec<String>,
    pub requires: Vec<String>,
    pub uses: Vec<String>,
    pub alternate_class_names: Vec<String>,
    /// Aliases grouped by namespace: `{"widget": ["grid", "panel"]}`.
    pub aliases: BTreeMap<String, Vec<String>>,
    pub singleton: bool,
    pub private: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_type: Option<String>,
    /// Set on override pseudo-classes; consumed during override
    /// application, after which the record is removed from the registry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub override_target: Option<String>,
    pub meta: BTreeMap<String, String>,
    pub members: Vec<MemberRecord>,
    pub files: Vec<SourceLoc>,
}

impl ClassRecord {
    pub fn new(name: impl Into<String>) -> Self {
        ClassRecord {
            name: name.into(),
            exists: true,
            doc: String::new(),
            extends: None,
            mixins: Vec::new(),
            requires: Vec::new(),
            uses: Vec::new(),
            alternate_class_names: Vec::new(),
            aliases: BTreeMap::new(),
            singleton: false,
            private: false,
            enum_type: None,
            override_target: None,
            meta: BTreeMap::new(),
            members: Vec::new(),
            files: Vec::new(),
        }
    }

    /// An inert placeholder standing in for a class that was not found.
    pub fn placeholder(name: impl Into<String>) -> Self {
        let mut cls = ClassRecord::new(name);
        cls.exists = false;
        cls
    }
}
