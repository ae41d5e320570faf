//! The class registry.
//!
//! Owns every merged [`ClassRecord`], indexed by primary and alternate
//! names. Inserting a name that already exists merges the new record
//! into the old one: docs append, lists extend, scalar fields keep the
//! first non-empty value seen. Lookup is total; unknown names come back
//! as placeholder records with `exists == false`.
//!
//! A generation counter ticks on every mutation. The flattened member
//! views cached here (see [`crate::members`]) are stamped with the
//! generation they were computed at, so any mutation invalidates every
//! dependent cache entry at once, subclasses included.

use std::borrow::Cow;
use std::collections::HashMap;

use parking_lot::Mutex;

use crate::diag::{Category, Diagnostics};
use crate::members::MembersMap;
use crate::model::ClassRecord;

#[derive(Debug)]
pub struct Registry {
    // Removal leaves a hole so indices stay stable.
    classes: Vec<Option<ClassRecord>>,
    index: HashMap<String, usize>,
    /// External-class patterns whose lookups never warn.
    ignore: Vec<String>,
    generation: u64,
    pub(crate) flat_cache: Mutex<HashMap<String, (u64, MembersMap)>>,
}

impl Registry {
    pub fn new(ignore: Vec<String>) -> Self {
        Registry {
            classes: Vec::new(),
            index: HashMap::new(),
            ignore,
            generation: 0,
            flat_cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.classes.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassRecord> {
        self.classes.iter().filter_map(|c| c.as_ref())
    }

    /// Insert a merged class record, combining it with any record the
    /// same name (or an alternate of it) already points at.
    pub fn insert(&mut self, cls: ClassRecord) {
        self.generation += 1;
        match self.index.get(&cls.name).copied() {
            Some(idx) => {
                let alternates = cls.alternate_class_names.clone();
                if let Some(existing) = self.classes[idx].as_mut() {
                    merge_into(existing, cls);
                }
                for alt in alternates {
                    self.index.entry(alt).or_insert(idx);
                }
            }
            None => {
                let idx = self.classes.len();
                self.index.insert(cls.name.clone(), idx);
                for alt in &cls.alternate_class_names {
                    self.index.entry(alt.clone()).or_insert(idx);
                }
                self.classes.push(Some(cls));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&ClassRecord> {
        let idx = *self.index.get(name)?;
        self.classes[idx].as_ref()
    }

    /// Mutable access to a class; counts as a mutation for cache purposes.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut ClassRecord> {
        self.generation += 1;
        let idx = *self.index.get(name)?;
        self.classes[idx].as_mut()
    }

    /// Remove a class (override pseudo-classes after application),
    /// dropping its index entries.
    pub fn remove(&mut self, name: &str) -> Option<ClassRecord> {
        self.generation += 1;
        let idx = self.index.remove(name)?;
        let cls = self.classes[idx].take()?;
        for alt in &cls.alternate_class_names {
            if self.index.get(alt) == Some(&idx) {
                self.index.remove(alt);
            }
        }
        Some(cls)
    }

    /// Total lookup: a hit borrows the record; anything else is a
    /// placeholder, warned about unless the name is ignorable.
    pub fn lookup<'a>(
        &'a self,
        name: &str,
        loc: Option<(&str, u32)>,
        diags: &Diagnostics,
    ) -> Cow<'a, ClassRecord> {
        if let Some(cls) = self.get(name) {
            return Cow::Borrowed(cls);
        }
        if !self.ignored(name) {
            diags.warn(Category::ClassNotFound, format!("Class not found: {name}"), loc);
        }
        Cow::Owned(ClassRecord::placeholder(name))
    }

    fn ignored(&self, name: &str) -> bool {
        name.contains('*') || self.ignore.iter().any(|p| wildcard_match(p, name))
    }

    /// Names of classes that directly extend `name`.
    pub fn subclasses(&self, name: &str) -> Vec<String> {
        self.classes()
            .filter(|c| c.extends.as_deref() == Some(name))
            .map(|c| c.name.clone())
            .collect()
    }

    /// Names of classes that directly mix in `name`.
    pub fn mixed_into(&self, name: &str) -> Vec<String> {
        self.classes()
            .filter(|c| c.mixins.iter().any(|m| m == name))
            .map(|c| c.name.clone())
            .collect()
    }
}

/// Later comment blocks for the same class append onto earlier ones;
/// scalar fields keep the first value set.
fn merge_into(existing: &mut ClassRecord, new: ClassRecord) {
    if existing.doc.is_empty() {
        existing.doc = new.doc;
    } else if !new.doc.is_empty() {
        existing.doc.push_str("\n\n");
        existing.doc.push_str(&new.doc);
    }
    if existing.extends.is_none() {
        existing.extends = new.extends;
    }
    if existing.enum_type.is_none() {
        existing.enum_type = new.enum_type;
    }
    if existing.override_target.is_none() {
        existing.override_target = new.override_target;
    }
    extend_unique(&mut existing.mixins, new.mixins);
    extend_unique(&mut existing.requires, new.requires);
    extend_unique(&mut existing.uses, new.uses);
    extend_unique(&mut existing.alternate_class_names, new.alternate_class_names);
    for (ns, names) in new.aliases {
        extend_unique(existing.aliases.entry(ns).or_default(), names);
    }
    existing.singleton |= new.singleton;
    existing.private |= new.private;
    existing.exists |= new.exists;
    for (k, v) in new.meta {
        existing.meta.entry(k).or_insert(v);
    }
    existing.members.extend(new.members);
    existing.files.extend(new.files);
}

fn extend_unique(dst: &mut Vec<String>, src: Vec<String>) {
    for s in src {
        if !dst.contains(&s) {
            dst.push(s);
        }
    }
}

/// Match a class name against an ignore pattern with `*` wildcards.
fn wildcard_match(pattern: &str, name: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();
    if parts.len() == 1 {
        return pattern == name;
    }
    let mut pos = 0;
    for (i, part) in parts.iter().enumerate() {
        if part.is_empty() {
            continue;
        }
        if i == 0 {
            if !name.starts_with(part) {
                return false;
            }
            pos = part.len();
        } else if i == parts.len() - 1 {
            return name.len() >= pos && name[pos..].ends_with(part);
        } else {
            match name[pos..].find(part) {
                Some(found) => pos += found + part.len(),
                None => return false,
            }
        }
    }
    true
}
