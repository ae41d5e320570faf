#![allow(dead_code)]

use classdoc::diag::Diagnostics;
use classdoc::model::{ClassRecord, Docset, MemberRecord};
use classdoc::{Config, Registry, SourceFile};

/// Parse one file into docsets with a default config.
pub fn parse_one(name: &str, src: &str) -> (Vec<Docset>, Diagnostics) {
    let config = Config::new();
    let diags = Diagnostics::new();
    let file = SourceFile::new(name, src);
    let docsets = classdoc::parser::parse_file(&file, &config, &diags);
    (docsets, diags)
}

/// Parse and merge one JavaScript file into class records.
pub fn merge_js(src: &str) -> (Vec<ClassRecord>, Diagnostics) {
    let config = Config::new();
    let diags = Diagnostics::new();
    let file = SourceFile::new("test.js", src);
    let docsets = classdoc::parser::parse_file(&file, &config, &diags);
    let classes = classdoc::merge::merge_docsets(docsets, "test.js", &config, &diags);
    (classes, diags)
}

/// Run the full pipeline over named in-memory files.
pub fn build_registry(files: &[(&str, &str)]) -> (Registry, Diagnostics) {
    let config = Config::new();
    let diags = Diagnostics::new();
    let sources: Vec<SourceFile> = files
        .iter()
        .map(|(name, content)| SourceFile::new(*name, *content))
        .collect();
    let registry = classdoc::process_files(&sources, &config, &diags).expect("pipeline failed");
    (registry, diags)
}

pub fn member<'a>(cls: &'a ClassRecord, id: &str) -> &'a MemberRecord {
    cls.members
        .iter()
        .find(|m| m.id == id)
        .unwrap_or_else(|| panic!("no member {id} on {}", cls.name))
}

pub fn has_warning(diags: &Diagnostics, needle: &str) -> bool {
    diags.all().iter().any(|d| d.message.contains(needle))
}
