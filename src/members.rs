//! Flattened, inheritance-aware member views.
//!
//! `global_by_id` builds the full member map a class presents to the
//! world: the parent's flattened map first (minus non-inheritable
//! statics), then each mixin's in declared order, then the class's own
//! members. A later member with an id already present replaces the
//! earlier one and records what it shadowed; a member whose meta marks
//! it `hide` removes the inherited entry instead of replacing it.
//!
//! Results are cached on the registry, stamped with the generation they
//! were computed at, so they survive repeated queries but never a
//! mutation.

use std::collections::HashMap;

use crate::diag::{Category, Diagnostics};
use crate::model::MemberRecord;
use crate::registry::Registry;

/// An ordered id-to-member map. Replacement keeps the original position
/// of the id; only new ids append.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MembersMap {
    order: Vec<String>,
    map: HashMap<String, MemberRecord>,
}

impl MembersMap {
    pub fn get(&self, id: &str) -> Option<&MemberRecord> {
        self.map.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.map.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Members in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &MemberRecord> {
        self.order.iter().filter_map(|id| self.map.get(id))
    }

    pub fn to_vec(&self) -> Vec<MemberRecord> {
        self.iter().cloned().collect()
    }

    /// Merge one member in, applying hide-removal and shadow recording.
    pub fn merge(&mut self, m: MemberRecord, diags: &Diagnostics) {
        if m.meta.contains_key("hide") {
            if self.map.remove(&m.id).is_some() {
                self.order.retain(|id| id != &m.id);
            } else {
                let loc = m
                    .files
                    .first()
                    .map(|f| (f.filename.as_str(), f.line));
                diags.warn(
                    Category::Hide,
                    format!("@hide {}: no inherited member to hide", m.id),
                    loc,
                );
            }
            return;
        }
        match self.map.get(&m.id) {
            Some(existing) => {
                let mut m = m;
                m.overrides = existing.overrides.clone();
                // A same-owner reappearance (diamond mixins) is not a
                // shadowing.
                if existing.owner != m.owner {
                    m.overrides.push(existing.source());
                }
                self.map.insert(m.id.clone(), m);
            }
            None => {
                self.order.push(m.id.clone());
                self.map.insert(m.id.clone(), m);
            }
        }
    }
}

/// Inheritance-aware member queries over a registry.
pub struct MembersIndex<'a> {
    reg: &'a Registry,
    diags: &'a Diagnostics,
}

impl<'a> MembersIndex<'a> {
    pub fn new(reg: &'a Registry, diags: &'a Diagnostics) -> Self {
        MembersIndex { reg, diags }
    }

    /// The flattened member map of a class, memoized per registry
    /// generation. Unknown names yield an empty map.
    pub fn global_by_id(&self, name: &str) -> MembersMap {
        if let Some((generation, cached)) = self.reg.flat_cache.lock().get(name)
            && *generation == self.reg.generation()
        {
            return cached.clone();
        }
        let computed = self.compute(name);
        self.reg
            .flat_cache
            .lock()
            .insert(name.to_string(), (self.reg.generation(), computed.clone()));
        computed
    }

    /// The flattened map grouped by member name.
    pub fn global_by_name(&self, name: &str) -> HashMap<String, Vec<MemberRecord>> {
        let mut out: HashMap<String, Vec<MemberRecord>> = HashMap::new();
        for m in self.global_by_id(name).iter() {
            out.entry(m.name.clone()).or_default().push(m.clone());
        }
        out
    }

    fn compute(&self, name: &str) -> MembersMap {
        let Some(cls) = self.reg.get(name) else {
            return MembersMap::default();
        };
        let loc = cls.files.first().map(|f| (f.filename.clone(), f.line));
        let loc = loc.as_ref().map(|(f, l)| (f.as_str(), *l));

        let mut out = MembersMap::default();
        if let Some(parent) = cls.extends.clone() {
            let parent = self.reg.lookup(&parent, loc, self.diags).name.clone();
            for m in self.global_by_id(&parent).iter() {
                // Statics don't inherit unless declared inheritable.
                if m.flags.statics && !m.flags.inheritable {
                    continue;
                }
                out.merge(m.clone(), self.diags);
            }
        }
        for mixin in cls.mixins.clone() {
            let mixin = self.reg.lookup(&mixin, loc, self.diags).name.clone();
            for m in self.global_by_id(&mixin).iter() {
                out.merge(m.clone(), self.diags);
            }
        }
        for m in cls.members.clone() {
            out.merge(m, self.diags);
        }
        out
    }
}
