//! Doc-comment parsing.
//!
//! This module turns the text of one `/** ... */` comment into an ordered
//! list of [`crate::model::Tag`]s. The implicit leading `default` tag
//! collects free text before the first `@directive`; every recognized
//! directive dispatches to its own sub-rule.
//!
//! # Submodules
//!
//! - [`tags`]: the tag grammar itself (boundary detection, per-tag
//!   sub-rules, meta-tag dispatch, member references).
//! - [`types`]: the balanced-brace `{Type}` expression sub-grammar.
//! - [`names`]: the `[name=default]` name sub-grammar.
//! - [`scanner`]: the character scanner shared by the above.

pub mod names;
pub mod scanner;
pub mod tags;
pub mod types;

pub use names::{NameDef, parse_name_def};
pub use scanner::Scanner;
pub use tags::{parse_doc_comment, parse_member_ref};
pub use types::{TypeExpr, parse_type};
