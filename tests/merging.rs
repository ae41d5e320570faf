//! Doc/code merging tests: classification, class building, member
//! building, and the legacy class-comment splitter.

mod common;

use classdoc::merge::{DocKind, classify};
use classdoc::model::{CodeShape, MemberKind, MemberRef, Tag};

// ─── Classification ─────────────────────────────────────────────────

#[test]
fn tag_evidence_beats_code_shape() {
    let class_tag = vec![Tag::Class {
        name: None,
        doc: String::new(),
    }];
    let fn_shape = CodeShape::Function {
        name: None,
        params: vec![],
    };
    assert_eq!(classify(&class_tag, &fn_shape), DocKind::Class);

    let one_cfg = vec![Tag::Cfg {
        ty: None,
        name: Some("width".to_string()),
        default: None,
        optional: false,
        required: false,
        deprecated: false,
        doc: String::new(),
    }];
    assert_eq!(classify(&one_cfg, &fn_shape), DocKind::Member(MemberKind::Cfg));
}

#[test]
fn event_beats_method() {
    let tags = vec![
        Tag::Event {
            name: Some("show".to_string()),
            doc: String::new(),
        },
        Tag::Method {
            name: None,
            doc: String::new(),
        },
    ];
    assert_eq!(
        classify(&tags, &CodeShape::Nothing),
        DocKind::Member(MemberKind::Event)
    );
}

#[test]
fn shape_classification_fallbacks() {
    assert_eq!(
        classify(&[], &CodeShape::Define(Default::default())),
        DocKind::Class
    );
    assert_eq!(
        classify(
            &[],
            &CodeShape::Assignment {
                name: vec!["My".to_string(), "Widget".to_string()],
                value: None
            }
        ),
        DocKind::Class
    );
    assert_eq!(
        classify(
            &[],
            &CodeShape::Function {
                name: Some("helper".to_string()),
                params: vec![]
            }
        ),
        DocKind::Member(MemberKind::Method)
    );
    assert_eq!(
        classify(&[], &CodeShape::Nothing),
        DocKind::Member(MemberKind::Property)
    );
}

// ─── Class building ─────────────────────────────────────────────────

#[test]
fn define_shape_fills_what_tags_left_out() {
    let (classes, diags) = common::merge_js(
        "/**
 * A simple panel.
 */
Ext.define('My.Panel', {
    extend: 'Ext.Container',
    xtype: 'panel',
    width: 100
});",
    );
    assert!(diags.is_empty());
    assert_eq!(classes.len(), 1);
    let cls = &classes[0];
    assert_eq!(cls.name, "My.Panel");
    assert_eq!(cls.doc, "A simple panel.");
    assert_eq!(cls.extends.as_deref(), Some("Ext.Container"));
    assert_eq!(cls.aliases["widget"], vec!["panel"]);

    let width = common::member(cls, "property-width");
    assert!(width.autodetected);
    assert!(width.flags.private);
    assert_eq!(width.ty.as_deref(), Some("Number"));
    assert_eq!(width.default.as_deref(), Some("100"));
}

#[test]
fn auto_members_from_config_carry_an_inherit_marker() {
    let (classes, _) = common::merge_js(
        "/**
 * @class
 */
Ext.define('My.W', {
    config: { title: 'hi' },
    helper: function(x) {}
});",
    );
    let cls = &classes[0];
    assert_eq!(cls.name, "My.W");

    let title = common::member(cls, "cfg-title");
    assert!(title.autodetected);
    assert!(title.flags.inheritable);
    assert!(!title.flags.private);
    assert_eq!(title.inheritdoc, Some(MemberRef::default()));
    assert_eq!(title.ty.as_deref(), Some("String"));
    assert_eq!(title.default.as_deref(), Some("'hi'"));

    let helper = common::member(cls, "method-helper");
    assert!(helper.flags.private);
    assert_eq!(helper.params.len(), 1);
    assert_eq!(helper.params[0].name, "x");
}

#[test]
fn commented_auto_member_merges_tag_and_code() {
    let (classes, diags) = common::merge_js(
        "/**
 * @class
 */
Ext.define('My.Box', {
    /**
     * @cfg {Number} width The width.
     */
    width: 100
});",
    );
    assert!(diags.is_empty());
    let cls = &classes[0];
    let width = common::member(cls, "cfg-width");
    assert!(!width.autodetected);
    assert_eq!(width.kind, MemberKind::Cfg);
    assert_eq!(width.doc, "The width.");
    assert_eq!(width.ty.as_deref(), Some("Number"));
    assert_eq!(width.default.as_deref(), Some("100"));
}

#[test]
fn legacy_class_comment_is_split() {
    let (classes, _) = common::merge_js(
        "/**
 * @class My.Legacy
 * Old style class.
 * @cfg {String} title The title.
 * @constructor
 * Creates it.
 * @param {Object} cfg Config options.
 */",
    );
    let cls = &classes[0];
    assert_eq!(cls.name, "My.Legacy");
    assert_eq!(cls.doc, "Old style class.");

    let title = common::member(cls, "cfg-title");
    assert_eq!(title.doc, "The title.");

    let ctor = common::member(cls, "method-constructor");
    assert_eq!(ctor.doc, "Creates it.");
    assert_eq!(ctor.params.len(), 1);
    assert_eq!(ctor.params[0].name, "cfg");
    assert_eq!(ctor.effective_return_type(), "Object");
}

#[test]
fn extend_call_body_members_attach_to_the_class() {
    let (classes, diags) = common::merge_js(
        "/**
 * Old-style observable subclass.
 */
My.Form = Ext.extend(Ext.util.Observable, {
    submit: function(values) {}
});",
    );
    assert!(diags.is_empty());
    let cls = &classes[0];
    assert_eq!(cls.name, "My.Form");
    assert_eq!(cls.extends.as_deref(), Some("Ext.util.Observable"));

    let submit = common::member(cls, "method-submit");
    assert!(submit.autodetected);
    assert!(submit.flags.private);
    assert_eq!(submit.params[0].name, "values");
}

#[test]
fn cfg_deprecated_marker_sets_the_meta_entry() {
    let (classes, _) = common::merge_js(
        "/**
 * @class My.C
 */
Ext.define('My.C', {});
/**
 * @cfg {Number} width (deprecated) Old width.
 */",
    );
    let width = common::member(&classes[0], "cfg-width");
    assert_eq!(width.doc, "Old width.");
    assert!(width.meta.contains_key("deprecated"));
}

#[test]
fn anonymous_override_gets_a_synthetic_name() {
    let (classes, _) = common::merge_js(
        "/**
 * Adds panel goodies.
 */
Ext.override(My.Panel, {});",
    );
    let cls = &classes[0];
    assert_eq!(cls.name, "My.Panel.Overrides");
    assert_eq!(cls.override_target.as_deref(), Some("My.Panel"));
}

#[test]
fn bare_enum_defaults_to_object() {
    let (classes, _) = common::merge_js(
        "/**
 * @class My.Status
 * @enum
 */",
    );
    assert_eq!(classes[0].enum_type.as_deref(), Some("Object"));
}

#[test]
fn class_without_a_name_warns() {
    let (classes, diags) = common::merge_js("/**\n * @class\n */\nfoo();");
    assert!(classes.is_empty());
    assert!(common::has_warning(&diags, "Class documentation without a name"));
}

// ─── Member building ────────────────────────────────────────────────

#[test]
fn params_nest_and_fill_names_positionally() {
    let (classes, diags) = common::merge_js(
        "/**
 * @class My.C
 */
Ext.define('My.C', {});
/**
 * @method load
 * @param {Object} options Options.
 * @param {String} options.url The url.
 * @param {Function} callback Cb.
 */
load: function(options, callback) {}",
    );
    assert!(diags.is_empty());
    let load = common::member(&classes[0], "method-load");
    assert_eq!(load.params.len(), 2);
    assert_eq!(load.params[0].name, "options");
    assert_eq!(load.params[0].properties.len(), 1);
    assert_eq!(load.params[0].properties[0].name, "url");
    assert_eq!(load.params[1].name, "callback");
}

#[test]
fn param_count_mismatch_warns() {
    let (_, diags) = common::merge_js(
        "/**
 * @class My.C
 */
Ext.define('My.C', {});
/**
 * @param {Number} a First.
 */
add: function(a, b) {}",
    );
    assert!(common::has_warning(
        &diags,
        "add: 1 parameters documented, 2 found in code"
    ));
}

#[test]
fn vararg_suppresses_the_mismatch_warning() {
    let (_, diags) = common::merge_js(
        "/**
 * @class My.C
 */
Ext.define('My.C', {});
/**
 * @param {Object...} args Anything.
 */
log: function(a, b, c) {}",
    );
    assert!(!common::has_warning(&diags, "parameters documented"));
}

#[test]
fn orphan_subproperty_warns() {
    let (_, diags) = common::merge_js(
        "/**
 * @class My.C
 */
Ext.define('My.C', {});
/**
 * @param {String} opts.url The url.
 */
go: function(a) {}",
    );
    assert!(common::has_warning(&diags, "no parent found for sub-property"));
}

#[test]
fn return_subproperties_nest_under_return() {
    let (classes, _) = common::merge_js(
        "/**
 * @class My.C
 */
Ext.define('My.C', {});
/**
 * @method stats
 * @return {Object} The stats.
 * @return {Number} return.count How many.
 */
stats: function() {}",
    );
    let stats = common::member(&classes[0], "method-stats");
    let ret = stats.ret.as_ref().unwrap();
    assert_eq!(ret.ty.as_deref(), Some("Object"));
    assert_eq!(ret.properties.len(), 1);
    assert_eq!(ret.properties[0].name, "count");
}

#[test]
fn meta_tags_set_member_flags() {
    let (classes, _) = common::merge_js(
        "/**
 * @class My.C
 */
Ext.define('My.C', {});
/**
 * @method poke
 * @static
 * @private
 */
poke: function() {}",
    );
    let poke = common::member(&classes[0], "static-method-poke");
    assert!(poke.flags.statics);
    assert!(poke.flags.private);
    assert_eq!(poke.meta.get("static").map(String::as_str), Some("true"));
}

#[test]
fn member_tag_redirects_to_another_class() {
    let (classes, _) = common::merge_js(
        "/**
 * @class My.A
 */
Ext.define('My.A', {});
/**
 * @member My.B
 * @method helper
 */",
    );
    assert_eq!(classes.len(), 2);
    assert_eq!(classes[1].name, "My.B");
    assert_eq!(classes[1].members[0].id, "method-helper");
    assert!(classes[0].members.is_empty());
}

#[test]
fn member_without_a_class_warns() {
    let (classes, diags) = common::merge_js(
        "/**
 * @method foo
 */
foo: function() {}",
    );
    assert!(classes.is_empty());
    assert!(common::has_warning(
        &diags,
        "Member documentation without a class: foo"
    ));
}
