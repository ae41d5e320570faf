//! `@inheritdoc` and member-alias resolution.
//!
//! Runs after override application, mutating local member records in
//! place. Targets resolve through the flattened member views, so a doc
//! can be inherited from anywhere in the ancestry; chains resolve
//! recursively with a visited set guarding against cycles (a cycle
//! warns and leaves the member unchanged).

use std::collections::HashSet;

use crate::diag::{Category, Diagnostics};
use crate::members::MembersIndex;
use crate::model::{MemberKind, MemberRecord, MemberRef};
use crate::registry::Registry;

/// Resolve every `@inheritdoc` marker and member alias in the registry.
pub fn resolve_all(reg: &mut Registry, diags: &Diagnostics) {
    let keys: Vec<(String, String)> = reg
        .classes()
        .flat_map(|c| {
            c.members
                .iter()
                .filter(|m| m.inheritdoc.is_some() || m.alias.is_some())
                .map(|m| (c.name.clone(), m.id.clone()))
                .collect::<Vec<_>>()
        })
        .collect();

    let mut done: HashSet<(String, String)> = HashSet::new();
    for (cls, id) in keys {
        let mut visited = HashSet::new();
        resolve(reg, &cls, &id, &mut visited, &mut done, diags);
    }
}

fn resolve(
    reg: &mut Registry,
    cls: &str,
    id: &str,
    visited: &mut HashSet<(String, String)>,
    done: &mut HashSet<(String, String)>,
    diags: &Diagnostics,
) {
    let key = (cls.to_string(), id.to_string());
    if done.contains(&key) {
        return;
    }
    if !visited.insert(key.clone()) {
        diags.warn(
            Category::Inheritdoc,
            format!("Documentation inheritance cycle at {cls}#{id}"),
            None,
        );
        return;
    }
    let Some(member) = reg
        .get(cls)
        .and_then(|c| c.members.iter().find(|m| m.id == id))
        .cloned()
    else {
        return;
    };
    let loc = member.files.first().map(|f| (f.filename.clone(), f.line));
    let loc = loc.as_ref().map(|(f, l)| (f.as_str(), *l));

    if let Some(target) = member.inheritdoc.clone() {
        match find_target(reg, cls, &member, &target, diags) {
            Some((tcls, tid)) => {
                resolve(reg, &tcls, &tid, visited, done, diags);
                let orig = reg
                    .get(&tcls)
                    .and_then(|c| c.members.iter().find(|m| m.id == tid))
                    .cloned();
                if let Some(orig) = orig
                    && let Some(m) = member_mut(reg, cls, id)
                {
                    apply_inherit(m, &orig);
                }
            }
            None => {
                // Auto-detected members carry a bare marker; a class with
                // no matching parent member is the normal case for them.
                if !member.autodetected {
                    diags.warn(
                        Category::Inheritdoc,
                        format!("@inheritdoc target not found for {cls}#{id}"),
                        loc,
                    );
                }
            }
        }
    }

    if let Some(target) = member.alias.clone() {
        match find_target(reg, cls, &member, &target, diags) {
            Some((tcls, tid)) => {
                resolve(reg, &tcls, &tid, visited, done, diags);
                let orig = reg
                    .get(&tcls)
                    .and_then(|c| c.members.iter().find(|m| m.id == tid))
                    .cloned();
                if let Some(orig) = orig
                    && let Some(m) = member_mut(reg, cls, id)
                {
                    apply_alias(m, &orig);
                }
            }
            None => diags.warn(
                Category::Alias,
                format!("Alias target not found for {cls}#{id}"),
                loc,
            ),
        }
    }

    done.insert(key);
}

/// Locate the member a reference points at, returning the owning class
/// and member id of the real definition.
fn find_target(
    reg: &Registry,
    cls_name: &str,
    member: &MemberRecord,
    target: &MemberRef,
    diags: &Diagnostics,
) -> Option<(String, String)> {
    let loc = member.files.first().map(|f| (f.filename.clone(), f.line));
    let loc = loc.as_ref().map(|(f, l)| (f.as_str(), *l));
    let wanted = target.member.clone().unwrap_or_else(|| member.name.clone());

    match &target.cls {
        Some(tcls) => {
            let record = reg.lookup(tcls, loc, diags);
            if !record.exists {
                return None;
            }
            let real = record.name.clone();
            find_in(reg, &real, &wanted, target.kind, target.statics, diags)
        }
        None if target.member.is_some() => {
            // `#member`: a sibling on the same class.
            find_in(reg, cls_name, &wanted, target.kind, target.statics, diags)
        }
        None => {
            // Bare form: mixins in declared order, then the parent.
            let cls = reg.get(cls_name)?;
            let mixins = cls.mixins.clone();
            let parent = cls.extends.clone();
            for mixin in mixins {
                if let Some(hit) = find_in(
                    reg,
                    &mixin,
                    &member.name,
                    Some(member.kind),
                    member.flags.statics,
                    diags,
                ) {
                    return Some(hit);
                }
            }
            find_in(
                reg,
                &parent?,
                &member.name,
                Some(member.kind),
                member.flags.statics,
                diags,
            )
        }
    }
}

fn find_in(
    reg: &Registry,
    cls: &str,
    name: &str,
    kind: Option<MemberKind>,
    statics: bool,
    diags: &Diagnostics,
) -> Option<(String, String)> {
    let index = MembersIndex::new(reg, diags);
    let members = index.global_by_id(cls);
    members
        .iter()
        .find(|m| {
            m.name == name && kind.is_none_or(|k| m.kind == k) && m.flags.statics == statics
        })
        .map(|m| (m.owner.clone(), m.id.clone()))
}

fn member_mut<'a>(reg: &'a mut Registry, cls: &str, id: &str) -> Option<&'a mut MemberRecord> {
    reg.get_mut(cls)?.members.iter_mut().find(|m| m.id == id)
}

/// Append the original's doc after the member's own, and take over the
/// signature docs when the member documented none of its own.
fn apply_inherit(m: &mut MemberRecord, orig: &MemberRecord) {
    if m.doc.is_empty() {
        m.doc = orig.doc.clone();
    } else if !orig.doc.is_empty() {
        m.doc.push_str("\n\n");
        m.doc.push_str(&orig.doc);
    }
    // Code-derived parameter stubs carry no docs; they don't count as a
    // signature of the member's own.
    let undocumented = m.params.iter().all(|p| p.ty.is_none() && p.doc.is_empty());
    if undocumented && m.ret.is_none() {
        if !orig.params.is_empty() {
            m.params = orig.params.clone();
        }
        m.ret = orig.ret.clone();
    }
    m.inheritdoc = None;
}

fn apply_alias(m: &mut MemberRecord, orig: &MemberRecord) {
    if m.doc.is_empty() {
        m.doc = orig.doc.clone();
    } else if !orig.doc.is_empty() {
        m.doc.push_str("\n\n");
        m.doc.push_str(&orig.doc);
    }
    m.params = orig.params.clone();
    m.ret = orig.ret.clone();
    m.alias = None;
}
