//! Doc-comment tag grammar tests.

mod common;

use classdoc::diag::Diagnostics;
use classdoc::docblock::{parse_doc_comment, parse_member_ref};
use classdoc::meta::MetaRegistry;
use classdoc::model::{MemberKind, Tag};

fn tags_of(src: &str) -> (Vec<Tag>, Diagnostics) {
    let meta = MetaRegistry::with_defaults();
    let diags = Diagnostics::new();
    let tags = parse_doc_comment(src, 1, "test.js", &meta, &diags);
    (tags, diags)
}

// ─── Free text and boundaries ───────────────────────────────────────

#[test]
fn leading_text_becomes_default_tag() {
    let (tags, _) = tags_of("/**\n * Some intro text.\n */");
    assert_eq!(
        tags,
        vec![Tag::Default {
            doc: "Some intro text.".to_string()
        }]
    );
}

#[test]
fn empty_default_tag_is_dropped() {
    let (tags, _) = tags_of("/** @singleton */");
    assert_eq!(tags, vec![Tag::Singleton]);
}

#[test]
fn unknown_tag_warns_and_stays_literal() {
    let (tags, diags) = tags_of("/**\n * Send mail to user@example.\n * Text @foobar more.\n */");
    assert!(common::has_warning(&diags, "Unsupported tag: @foobar"));
    assert_eq!(tags.len(), 1);
    let Tag::Default { doc } = &tags[0] else {
        panic!("expected default tag");
    };
    // `user@example` has no whitespace before the `@`, so it never opens
    // a tag; `@foobar` does, warns, and is kept as text.
    assert!(doc.contains("user@example."));
    assert!(doc.contains("Text @foobar more."));
}

#[test]
fn indented_code_blocks_keep_their_tags_literal() {
    let (tags, _) = tags_of("/**\n * Example:\n *\n *     @cfg not a tag\n */");
    assert_eq!(tags.len(), 1);
    let Tag::Default { doc } = &tags[0] else {
        panic!("expected default tag");
    };
    assert!(doc.contains("@cfg not a tag"));
}

#[test]
fn unterminated_comment_at_eof_keeps_a_clean_body() {
    let (tags, _) = tags_of("/**\n * Dangling text.");
    assert_eq!(
        tags,
        vec![Tag::Default {
            doc: "Dangling text.".to_string()
        }]
    );
}

// ─── Class tags ─────────────────────────────────────────────────────

#[test]
fn class_tag_with_name_and_doc() {
    let (tags, _) = tags_of("/** @class My.Panel\n * Docs here.\n */");
    assert_eq!(
        tags,
        vec![Tag::Class {
            name: Some("My.Panel".to_string()),
            doc: "Docs here.".to_string()
        }]
    );
}

#[test]
fn mixins_accept_comma_and_space_lists() {
    let (tags, _) = tags_of("/**\n * @mixins My.A, My.B My.C\n */");
    assert_eq!(
        tags,
        vec![Tag::Mixins {
            names: vec!["My.A".to_string(), "My.B".to_string(), "My.C".to_string()]
        }]
    );
}

#[test]
fn extends_without_name_warns() {
    let (tags, diags) = tags_of("/** @extends */");
    assert!(common::has_warning(&diags, "Missing class name after @extends"));
    assert!(tags.is_empty());
}

// ─── Member tags ────────────────────────────────────────────────────

#[test]
fn cfg_with_type_name_and_default() {
    let (tags, _) = tags_of("/**\n * @cfg {Number} [width=100] Panel width.\n */");
    assert_eq!(
        tags,
        vec![Tag::Cfg {
            ty: Some("Number".to_string()),
            name: Some("width".to_string()),
            default: Some("100".to_string()),
            optional: true,
            required: false,
            deprecated: false,
            doc: "Panel width.".to_string()
        }]
    );
}

#[test]
fn cfg_required_marker() {
    let (tags, _) = tags_of("/** @cfg {String} title (required) The title. */");
    let Tag::Cfg { name, required, doc, .. } = &tags[0] else {
        panic!("expected cfg tag");
    };
    assert_eq!(name.as_deref(), Some("title"));
    assert!(*required);
    assert_eq!(doc, "The title.");
}

#[test]
fn param_with_optional_type_and_string_default() {
    let (tags, _) = tags_of("/** @param {String=} [name='x'] The name. */");
    assert_eq!(
        tags,
        vec![Tag::Param {
            ty: Some("String".to_string()),
            name: Some("name".to_string()),
            default: Some("'x'".to_string()),
            optional: true,
            deprecated: false,
            doc: "The name.".to_string()
        }]
    );
}

#[test]
fn cfg_deprecated_marker() {
    let (tags, _) = tags_of("/** @cfg {Number} width (deprecated) Old width. */");
    let Tag::Cfg { deprecated, doc, .. } = &tags[0] else {
        panic!("expected cfg tag");
    };
    assert!(*deprecated);
    assert_eq!(doc, "Old width.");
}

#[test]
fn param_optional_marker() {
    let (tags, _) = tags_of("/** @param {Number} count (optional) How many. */");
    let Tag::Param { optional, default, .. } = &tags[0] else {
        panic!("expected param tag");
    };
    assert!(*optional);
    assert_eq!(*default, None);
}

#[test]
fn param_deprecated_marker() {
    let (tags, _) = tags_of("/** @param {String} title (deprecated) Use header. */");
    let Tag::Param { deprecated, doc, .. } = &tags[0] else {
        panic!("expected param tag");
    };
    assert!(*deprecated);
    assert_eq!(doc, "Use header.");
}

#[test]
fn param_default_balances_nested_brackets() {
    let (tags, _) = tags_of("/** @param {Array} [items=[1, \"a]b\"]] Items. */");
    let Tag::Param { default, .. } = &tags[0] else {
        panic!("expected param tag");
    };
    assert_eq!(default.as_deref(), Some("[1, \"a]b\"]"));
}

#[test]
fn union_and_function_types_pass_through() {
    let (tags, _) = tags_of(
        "/**\n * @param {String/Number} value Val.\n * @param {function(a:{id:Number})} fn Cb.\n */",
    );
    let Tag::Param { ty, .. } = &tags[0] else {
        panic!("expected param tag");
    };
    assert_eq!(ty.as_deref(), Some("String/Number"));
    let Tag::Param { ty, .. } = &tags[1] else {
        panic!("expected param tag");
    };
    assert_eq!(ty.as_deref(), Some("function(a:{id:Number})"));
}

#[test]
fn return_and_dotted_subproperty() {
    let (tags, _) =
        tags_of("/**\n * @return {Object}\n * @return {Number} return.count The count.\n */");
    assert_eq!(
        tags[0],
        Tag::Return {
            ty: Some("Object".to_string()),
            name: None,
            doc: String::new()
        }
    );
    assert_eq!(
        tags[1],
        Tag::Return {
            ty: Some("Number".to_string()),
            name: Some("return.count".to_string()),
            doc: "The count.".to_string()
        }
    );
}

#[test]
fn var_tag_with_scss_name() {
    let (tags, _) = tags_of("/** @var {measurement} [$button-height=30px] Height. */");
    assert_eq!(
        tags,
        vec![Tag::CssVar {
            ty: Some("measurement".to_string()),
            name: Some("$button-height".to_string()),
            default: Some("30px".to_string()),
            doc: "Height.".to_string()
        }]
    );
}

#[test]
fn throws_tag() {
    let (tags, _) = tags_of("/** @throws {Error} When bad. */");
    assert_eq!(
        tags,
        vec![Tag::Throws {
            ty: Some("Error".to_string()),
            doc: "When bad.".to_string()
        }]
    );
}

// ─── Aliases and references ─────────────────────────────────────────

#[test]
fn xtype_desugars_to_widget_alias() {
    let (tags, _) = tags_of("/**\n * @xtype grid\n */");
    assert_eq!(
        tags,
        vec![Tag::Alias {
            names: vec!["widget.grid".to_string()]
        }]
    );
}

#[test]
fn xtype_without_name_warns_with_the_written_tag() {
    let (tags, diags) = tags_of("/** @xtype */");
    assert!(common::has_warning(&diags, "Missing name after @xtype"));
    assert!(tags.is_empty());
}

#[test]
fn alias_accepts_comma_lists() {
    let (tags, _) = tags_of("/**\n * @alias widget.grid, widget.panel\n */");
    assert_eq!(
        tags,
        vec![Tag::Alias {
            names: vec!["widget.grid".to_string(), "widget.panel".to_string()]
        }]
    );
}

#[test]
fn alias_with_hash_is_a_member_alias() {
    let (tags, _) = tags_of("/**\n * @alias Ext.Panel#method-show\n */");
    let Tag::MemberAlias { target } = &tags[0] else {
        panic!("expected member alias");
    };
    assert_eq!(target.cls.as_deref(), Some("Ext.Panel"));
    assert_eq!(target.member.as_deref(), Some("show"));
    assert_eq!(target.kind, Some(MemberKind::Method));
}

#[test]
fn member_ref_forms() {
    let r = parse_member_ref("Ext.Base");
    assert_eq!(r.cls.as_deref(), Some("Ext.Base"));
    assert_eq!(r.member, None);

    let r = parse_member_ref("#static-cfg-width");
    assert_eq!(r.cls, None);
    assert_eq!(r.member.as_deref(), Some("width"));
    assert_eq!(r.kind, Some(MemberKind::Cfg));
    assert!(r.statics);

    let r = parse_member_ref("");
    assert_eq!(r.cls, None);
    assert_eq!(r.member, None);
    assert_eq!(r.kind, None);
    assert!(!r.statics);
}

// ─── Meta tags ──────────────────────────────────────────────────────

#[test]
fn meta_tags_by_kind() {
    let (tags, _) =
        tags_of("/**\n * @static\n * @since 4.2\n * @deprecated Use something else.\n */");
    assert_eq!(
        tags,
        vec![
            Tag::Meta {
                key: "static".to_string(),
                value: None,
                doc: String::new()
            },
            Tag::Meta {
                key: "since".to_string(),
                value: Some("4.2".to_string()),
                doc: String::new()
            },
            Tag::Meta {
                key: "deprecated".to_string(),
                value: None,
                doc: "Use something else.".to_string()
            },
        ]
    );
}
