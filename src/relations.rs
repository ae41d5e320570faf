//! Class relations: ancestry, dependency unions, cycle checking, and
//! override-class application.

use std::collections::HashSet;

use crate::diag::{Category, Diagnostics, FatalError};
use crate::model::ClassRecord;
use crate::registry::Registry;

/// Root-to-parent ancestor chain of a class, excluding the class itself.
/// Unknown ancestors appear as placeholders.
pub fn superclasses(reg: &Registry, cls: &ClassRecord, diags: &Diagnostics) -> Vec<ClassRecord> {
    let mut chain = Vec::new();
    let mut current = cls.extends.clone();
    let loc = cls.files.first().map(|f| (f.filename.clone(), f.line));
    while let Some(name) = current {
        let parent = reg
            .lookup(&name, loc.as_ref().map(|(f, l)| (f.as_str(), *l)), diags)
            .into_owned();
        current = if parent.exists {
            parent.extends.clone()
        } else {
            None
        };
        chain.push(parent);
    }
    chain.reverse();
    chain
}

/// Direct mixin records of a class, placeholders included.
pub fn mixins_of(reg: &Registry, cls: &ClassRecord, diags: &Diagnostics) -> Vec<ClassRecord> {
    let loc = cls.files.first().map(|f| (f.filename.clone(), f.line));
    cls.mixins
        .iter()
        .map(|name| {
            reg.lookup(name, loc.as_ref().map(|(f, l)| (f.as_str(), *l)), diags)
                .into_owned()
        })
        .collect()
}

/// Which dependency list `parent_deps` unions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepKind {
    Mixins,
    Requires,
    Uses,
}

/// Union of one dependency list across a class and all its ancestors,
/// root-first, duplicates removed.
pub fn parent_deps(
    reg: &Registry,
    kind: DepKind,
    cls: &ClassRecord,
    diags: &Diagnostics,
) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut chain = superclasses(reg, cls, diags);
    chain.push(cls.clone());
    for c in &chain {
        let list = match kind {
            DepKind::Mixins => &c.mixins,
            DepKind::Requires => &c.requires,
            DepKind::Uses => &c.uses,
        };
        for dep in list {
            if !out.contains(dep) {
                out.push(dep.clone());
            }
        }
    }
    out
}

/// Walk the extends/mixins graph from every class, failing on the first
/// cycle with a readable edge-labelled path. Flattening assumes a DAG,
/// so this runs before any member view is built.
pub fn check_circular(reg: &Registry) -> Result<(), FatalError> {
    let mut safe: HashSet<String> = HashSet::new();
    for cls in reg.classes() {
        let mut names = vec![cls.name.clone()];
        let mut path = cls.name.clone();
        walk(reg, &cls.name, &mut names, &mut path, &mut safe)?;
    }
    Ok(())
}

fn walk(
    reg: &Registry,
    name: &str,
    names: &mut Vec<String>,
    path: &mut String,
    safe: &mut HashSet<String>,
) -> Result<(), FatalError> {
    if safe.contains(name) {
        return Ok(());
    }
    let Some(cls) = reg.get(name) else {
        return Ok(());
    };
    let mut edges: Vec<(&str, String)> = Vec::new();
    if let Some(parent) = &cls.extends {
        edges.push(("extends", parent.clone()));
    }
    for mixin in &cls.mixins {
        edges.push(("mixins", mixin.clone()));
    }
    for (label, target) in edges {
        let step = format!("{path} {label} {target}");
        if names.iter().any(|n| n == &target) {
            return Err(FatalError::CircularDependency { path: step });
        }
        names.push(target.clone());
        let saved = path.len();
        path.push(' ');
        path.push_str(label);
        path.push(' ');
        path.push_str(&target);
        walk(reg, &target, names, path, safe)?;
        path.truncate(saved);
        names.pop();
    }
    safe.insert(name.to_string());
    Ok(())
}

/// Fold every override pseudo-class into its target, then drop it from
/// the registry. A missing target degrades to a warning.
pub fn apply_overrides(reg: &mut Registry, diags: &Diagnostics) {
    let names: Vec<String> = reg
        .classes()
        .filter(|c| c.override_target.is_some())
        .map(|c| c.name.clone())
        .collect();

    for name in names {
        let Some(ov) = reg.remove(&name) else {
            continue;
        };
        let Some(target_name) = ov.override_target.clone() else {
            continue;
        };
        let loc = ov.files.first().map(|f| (f.filename.clone(), f.line));
        let loc = loc.as_ref().map(|(f, l)| (f.as_str(), *l));
        if reg.get(&target_name).is_none() {
            diags.warn(
                Category::Override,
                format!("Override target not found: {target_name}"),
                loc,
            );
            continue;
        }
        let Some(target) = reg.get_mut(&target_name) else {
            continue;
        };

        if !ov.doc.is_empty() {
            append_with_provenance(&mut target.doc, &ov.name, &ov.doc);
        }
        for member in ov.members {
            match target.members.iter_mut().find(|m| m.id == member.id) {
                Some(existing) => {
                    if !member.doc.is_empty() {
                        append_with_provenance(&mut existing.doc, &ov.name, &member.doc);
                    }
                    existing.files.extend(member.files);
                }
                None => {
                    let mut member = member;
                    member.owner = target.name.clone();
                    if !member.doc.is_empty() {
                        member.doc.push_str("\n\n");
                    }
                    member.doc.push_str(&format!("Defined in override {}.", ov.name));
                    target.members.push(member);
                }
            }
        }
        target.files.extend(ov.files);
    }
}

fn append_with_provenance(doc: &mut String, override_name: &str, text: &str) {
    if !doc.is_empty() {
        doc.push_str("\n\n");
    }
    doc.push_str(&format!("**From override {override_name}:** {text}"));
}
