//! Diagnostics collection.
//!
//! Parsing and resolution never panic on bad input; they report through a
//! [`Diagnostics`] sink carrying a severity, a category tag, a message and
//! an optional source location. Warnings are deduplicated by exact message
//! text and never halt processing. The only truly fatal condition in the
//! core is a cycle in the extends/mixins graph, which surfaces as a
//! [`FatalError`] before any member flattening is attempted.
//!
//! The collector is internally locked so the parallel per-file phase can
//! share one sink; workers that need deterministic ordering collect into
//! their own sink and merge with [`Diagnostics::absorb`].

use std::collections::HashSet;

use parking_lot::Mutex;
use serde::Serialize;

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Fatal,
}

/// Category tag carried on every diagnostic so consumers can filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Unsupported `@tag` in a doc-comment.
    Tag,
    /// Statement after a comment matched no known code shape.
    Shape,
    /// Referenced class not found.
    ClassNotFound,
    /// Referenced member not found.
    MemberNotFound,
    /// Documented vs. detected parameter mismatch.
    Param,
    /// Sub-property with no matching parent tag.
    Subproperty,
    /// `@hide` with nothing to hide.
    Hide,
    /// Override application problems.
    Override,
    /// Member docset with no preceding class.
    NoClass,
    /// `@inheritdoc` resolution problems.
    Inheritdoc,
    /// `@alias` resolution problems.
    Alias,
    /// Circular dependency in the extends/mixins graph.
    Circular,
}

/// One diagnostic message with enough context to report precisely.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub category: Category,
    pub message: String,
    pub file: Option<String>,
    pub line: Option<u32>,
}

#[derive(Default)]
struct Inner {
    seen: HashSet<String>,
    list: Vec<Diagnostic>,
}

/// Thread-safe diagnostics sink with exact-duplicate suppression.
#[derive(Default)]
pub struct Diagnostics {
    inner: Mutex<Inner>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics::default()
    }

    /// Record a warning unless an identical message was already recorded.
    pub fn warn(&self, category: Category, message: impl Into<String>, loc: Option<(&str, u32)>) {
        let message = message.into();
        let mut inner = self.inner.lock();
        if !inner.seen.insert(message.clone()) {
            return;
        }
        match loc {
            Some((file, line)) => tracing::warn!(file, line, "{message}"),
            None => tracing::warn!("{message}"),
        }
        inner.list.push(Diagnostic {
            severity: Severity::Warning,
            category,
            message,
            file: loc.map(|(f, _)| f.to_string()),
            line: loc.map(|(_, l)| l),
        });
    }

    /// Record a fatal diagnostic. The caller is expected to abort the run
    /// by propagating a [`FatalError`].
    pub fn fatal(&self, category: Category, message: impl Into<String>, loc: Option<(&str, u32)>) {
        let message = message.into();
        tracing::error!("{message}");
        self.inner.lock().list.push(Diagnostic {
            severity: Severity::Fatal,
            category,
            message,
            file: loc.map(|(f, _)| f.to_string()),
            line: loc.map(|(_, l)| l),
        });
    }

    /// Merge diagnostics collected by a worker, applying the same
    /// duplicate suppression as [`Diagnostics::warn`].
    pub fn absorb(&self, batch: Vec<Diagnostic>) {
        let mut inner = self.inner.lock();
        for diag in batch {
            if diag.severity == Severity::Warning && !inner.seen.insert(diag.message.clone()) {
                continue;
            }
            inner.list.push(diag);
        }
    }

    /// Snapshot of everything recorded so far.
    pub fn all(&self) -> Vec<Diagnostic> {
        self.inner.lock().list.clone()
    }

    /// Drain the collected diagnostics, leaving the sink empty but keeping
    /// the duplicate-suppression set intact.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.inner.lock().list)
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().list.is_empty()
    }

    pub fn has_fatal(&self) -> bool {
        self.inner
            .lock()
            .list
            .iter()
            .any(|d| d.severity == Severity::Fatal)
    }
}

/// Conditions that abort the whole run with a non-zero status.
#[derive(Debug, thiserror::Error)]
pub enum FatalError {
    #[error("circular dependency: {path}")]
    CircularDependency { path: String },
    #[error("failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
