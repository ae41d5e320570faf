//! The meta-tag registry.
//!
//! Doc-comment directives that are not part of the built-in tag grammar
//! (`@static`, `@deprecated`, `@since`, ...) are looked up in a registry of
//! [`MetaTag`] descriptors, each declaring how its value is parsed:
//!
//!   - `Boolean` — the tag is a flag with no value.
//!   - `SingleLine` — the rest of the line is the value.
//!   - `MultiLine` — free text until the next tag is the value.
//!
//! The registry is built once at startup from a static default table plus
//! any extra tags declared in the project config; there is no runtime
//! plugin discovery. An `@word` found in neither the built-in grammar nor
//! this registry produces a warning and is kept as literal text.

use std::collections::HashMap;

use serde::Deserialize;

/// How a meta tag's value is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetaKind {
    Boolean,
    SingleLine,
    MultiLine,
}

/// One registered meta-tag descriptor.
#[derive(Debug, Clone, Deserialize)]
pub struct MetaTag {
    pub name: String,
    pub kind: MetaKind,
    /// Whether the presence of this tag marks the member private
    /// (`@private`, `@hide`, `@ignore`).
    #[serde(default)]
    pub private: bool,
}

impl MetaTag {
    fn new(name: &str, kind: MetaKind) -> Self {
        MetaTag {
            name: name.to_string(),
            kind,
            private: false,
        }
    }

    fn private(name: &str, kind: MetaKind) -> Self {
        MetaTag {
            name: name.to_string(),
            kind,
            private: true,
        }
    }
}

/// Name → descriptor table of recognized meta tags.
#[derive(Debug, Clone)]
pub struct MetaRegistry {
    tags: HashMap<String, MetaTag>,
}

impl MetaRegistry {
    /// Empty registry, for tests that want full control.
    pub fn empty() -> Self {
        MetaRegistry {
            tags: HashMap::new(),
        }
    }

    /// The default table shipped with the tool.
    pub fn with_defaults() -> Self {
        use MetaKind::*;
        let mut reg = MetaRegistry::empty();
        for tag in [
            MetaTag::new("static", Boolean),
            MetaTag::new("protected", Boolean),
            MetaTag::new("readonly", Boolean),
            MetaTag::new("template", Boolean),
            MetaTag::new("abstract", Boolean),
            MetaTag::new("inheritable", Boolean),
            MetaTag::new("accessor", Boolean),
            MetaTag::new("evented", Boolean),
            MetaTag::new("chainable", Boolean),
            MetaTag::new("markdown", Boolean),
            MetaTag::new("experimental", Boolean),
            MetaTag::new("preventable", MultiLine),
            MetaTag::new("deprecated", MultiLine),
            MetaTag::new("removed", SingleLine),
            MetaTag::new("since", SingleLine),
            MetaTag::new("author", SingleLine),
            MetaTag::new("docauthor", SingleLine),
            MetaTag::private("private", Boolean),
            MetaTag::private("hide", Boolean),
            MetaTag::private("ignore", Boolean),
        ] {
            reg.register(tag);
        }
        reg
    }

    pub fn register(&mut self, tag: MetaTag) {
        self.tags.insert(tag.name.clone(), tag);
    }

    pub fn get(&self, name: &str) -> Option<&MetaTag> {
        self.tags.get(name)
    }

    /// Whether the named tag is registered as private-producing.
    pub fn is_private_tag(&self, name: &str) -> bool {
        self.tags.get(name).is_some_and(|t| t.private)
    }
}

impl Default for MetaRegistry {
    fn default() -> Self {
        MetaRegistry::with_defaults()
    }
}
