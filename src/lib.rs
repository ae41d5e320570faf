//! classdoc: documentation extraction for class-based JavaScript
//! frameworks.
//!
//! The pipeline has two halves. The per-file half is embarrassingly
//! parallel: each file is tokenized, its doc-comments parsed into tags,
//! the statement after each comment shape-parsed, and the results merged
//! into class records. The cross-file half is sequential: records are
//! folded into the [`registry::Registry`] in file order, the
//! extends/mixins graph is checked for cycles, override pseudo-classes
//! are applied, and `@inheritdoc`/alias chains are resolved. Flattened
//! member views are then available through [`members::MembersIndex`].
//!
//! # Modules
//!
//! - [`lexer`]: JavaScript and CSS/SCSS tokenizers.
//! - [`docblock`]: the doc-comment tag grammar.
//! - [`parser`]: per-file docset extraction and code-shape recognition.
//! - [`merge`]: docset-to-record merging and the class-comment splitter.
//! - [`registry`]: the name-indexed class store.
//! - [`relations`]: ancestry, cycle checking, override application.
//! - [`members`]: inheritance-aware flattened member views.
//! - [`inheritdoc`]: `@inheritdoc` and member-alias resolution.
//! - [`model`]: the records and enums flowing through all of the above.

pub mod config;
pub mod diag;
pub mod docblock;
pub mod inheritdoc;
pub mod lexer;
pub mod members;
pub mod merge;
pub mod meta;
pub mod model;
pub mod parser;
pub mod registry;
pub mod relations;

use rayon::prelude::*;

pub use config::{Config, ConfigFile};
pub use diag::{Category, Diagnostic, Diagnostics, FatalError, Severity};
pub use members::{MembersIndex, MembersMap};
pub use model::{ClassRecord, MemberKind, MemberRecord};
pub use parser::SourceFile;
pub use registry::Registry;

/// Run the whole pipeline over a set of already-read source files.
///
/// File order matters for same-class merging; the parallel phase keeps
/// per-file results in input order before folding them into the
/// registry.
pub fn process_files(
    files: &[SourceFile],
    config: &Config,
    diags: &Diagnostics,
) -> Result<Registry, FatalError> {
    let per_file: Vec<Vec<ClassRecord>> = files
        .par_iter()
        .map(|file| {
            let docsets = parser::parse_file(file, config, diags);
            merge::merge_docsets(docsets, &file.name, config, diags)
        })
        .collect();

    let mut registry = Registry::new(config.external.clone());
    for classes in per_file {
        for cls in classes {
            registry.insert(cls);
        }
    }

    if let Err(err) = relations::check_circular(&registry) {
        diags.fatal(Category::Circular, err.to_string(), None);
        return Err(err);
    }
    relations::apply_overrides(&mut registry, diags);
    inheritdoc::resolve_all(&mut registry, diags);
    Ok(registry)
}
