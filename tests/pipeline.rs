//! End-to-end pipeline tests over on-disk projects: config file
//! loading, custom namespaces, external patterns, SCSS sources, and the
//! JSON shape of exported records.

mod common;

use std::fs;

use classdoc::diag::Diagnostics;
use classdoc::model::{MemberKind, MemberRecord};
use classdoc::{Config, ConfigFile, MembersIndex, SourceFile};

#[test]
fn project_with_config_file_js_and_scss() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config_path = dir.path().join("classdoc.json");
    fs::write(
        &config_path,
        r#"{
            "namespaces": ["Ext", "MyApp"],
            "external": ["HTML*"],
            "meta_tags": [{"name": "internal", "kind": "boolean", "private": true}]
        }"#,
    )
    .expect("write config");

    let js_path = dir.path().join("widget.js");
    fs::write(
        &js_path,
        "/**
 * A widget.
 */
MyApp.define('My.Widget', {
    extend: 'HTMLElement',
    config: { label: 'go' }
});
/**
 * @method run
 * @internal
 */
run: function() {}
",
    )
    .expect("write js");

    let scss_path = dir.path().join("theme.scss");
    fs::write(
        &scss_path,
        "/**
 * @class My.Theme
 */
/**
 * @var {measurement} $button-height Button height.
 */
$button-height: 30px !default;
/**
 * Button mixin.
 */
@mixin my-button($ui) { }
",
    )
    .expect("write scss");

    let config = Config::new().with_file(ConfigFile::load(&config_path).expect("load config"));
    assert_eq!(config.namespaces, vec!["Ext", "MyApp"]);

    let files: Vec<SourceFile> = [&js_path, &scss_path]
        .iter()
        .map(|p| {
            let content = fs::read_to_string(p).expect("read source");
            SourceFile::new(p.display().to_string(), content)
        })
        .collect();

    let diags = Diagnostics::new();
    let reg = classdoc::process_files(&files, &config, &diags).expect("pipeline");

    // The custom namespace is recognized by the shape parser.
    let widget = reg.get("My.Widget").expect("widget class");
    assert_eq!(widget.doc, "A widget.");
    assert_eq!(widget.extends.as_deref(), Some("HTMLElement"));
    let label = common::member(widget, "cfg-label");
    assert_eq!(label.default.as_deref(), Some("'go'"));

    // The config-registered meta tag marks members private.
    let run = common::member(widget, "method-run");
    assert!(run.flags.private);
    assert_eq!(run.meta.get("internal").map(String::as_str), Some("true"));

    // SCSS members land on the stylesheet's class.
    let theme = reg.get("My.Theme").expect("theme class");
    let height = common::member(theme, "css_var-S-button-height");
    assert_eq!(height.kind, MemberKind::CssVar);
    assert_eq!(height.ty.as_deref(), Some("measurement"));
    assert_eq!(height.default.as_deref(), Some("30px"));
    let mixin = common::member(theme, "css_mixin-my-button");
    assert_eq!(mixin.params[0].name, "$ui");

    // `HTML*` is external, so flattening over the unknown parent is
    // silent.
    let index = MembersIndex::new(&reg, &diags);
    index.global_by_id("My.Widget");
    assert!(!common::has_warning(&diags, "Class not found"));
}

#[test]
fn same_class_across_files_merges_in_file_order() {
    let (reg, _) = common::build_registry(&[
        (
            "a.js",
            "/**
 * First block.
 * @class My.Split
 */",
        ),
        (
            "b.js",
            "/**
 * Second block.
 * @class My.Split
 */",
        ),
    ]);
    let cls = reg.get("My.Split").unwrap();
    assert_eq!(cls.doc, "First block.\n\nSecond block.");
    assert_eq!(cls.files.len(), 2);
}

#[test]
fn exported_records_use_the_documented_field_names() {
    let mut m = MemberRecord::new(MemberKind::Method, "load", "My.C");
    m.ty = Some("Number".to_string());
    let v = serde_json::to_value(&m).expect("serialize");
    assert_eq!(v["type"], "Number");
    assert_eq!(v["kind"], "method");
    assert_eq!(v["flags"]["static"], false);
    // Empty collections and absent options are omitted.
    assert!(v.get("overrides").is_none());
    assert!(v.get("inheritdoc").is_none());
}
