//! Project configuration.
//!
//! Configuration comes from an optional `classdoc.json` file in the
//! project root, overridden by command-line flags. The file is a plain
//! JSON object:
//!
//! ```json
//! {
//!     "inputs": ["src"],
//!     "namespaces": ["Ext", "MyApp"],
//!     "external": ["HTMLElement", "google.maps.*"],
//!     "meta_tags": [{"name": "internal", "kind": "boolean", "private": true}]
//! }
//! ```
//!
//! Unknown keys are ignored so config files can be shared with other
//! tooling.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

use crate::meta::{MetaRegistry, MetaTag};

/// On-disk configuration file shape.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub inputs: Vec<PathBuf>,
    #[serde(default)]
    pub namespaces: Vec<String>,
    #[serde(default)]
    pub external: Vec<String>,
    #[serde(default)]
    pub meta_tags: Vec<MetaTag>,
}

impl ConfigFile {
    /// Parse a `classdoc.json` file.
    pub fn load(path: &Path) -> anyhow::Result<ConfigFile> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("failed to parse {}", path.display()))
    }
}

/// Fully resolved configuration handed to the pipeline.
#[derive(Debug, Clone)]
pub struct Config {
    pub inputs: Vec<PathBuf>,
    /// Namespace aliases matched by the framework define/extend/override/
    /// emptyFn patterns.
    pub namespaces: Vec<String>,
    /// External/ignorable class-name patterns (exact names and `*`
    /// wildcards) that suppress not-found warnings.
    pub external: Vec<String>,
    pub meta: MetaRegistry,
}

impl Config {
    pub fn new() -> Self {
        Config {
            inputs: Vec::new(),
            namespaces: vec!["Ext".to_string()],
            external: Vec::new(),
            meta: MetaRegistry::with_defaults(),
        }
    }

    /// Layer a config file over the defaults.
    pub fn with_file(mut self, file: ConfigFile) -> Self {
        if !file.inputs.is_empty() {
            self.inputs = file.inputs;
        }
        if !file.namespaces.is_empty() {
            self.namespaces = file.namespaces;
        }
        self.external.extend(file.external);
        for tag in file.meta_tags {
            self.meta.register(tag);
        }
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}
