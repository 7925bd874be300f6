//! # ICSS Keyframes Scoping
//!
//! Rewrites locally declared `@keyframes` names to globally unique scoped
//! names and publishes the mapping through ICSS `:export`.
//!
//! ## Pipeline
//!
//! 1. **Collect**: every top-level `@keyframes` (also `-webkit-`, `-moz-`,
//!    `-o-`, `-ms-`) is validated and renamed to the generated scoped name.
//!    Reserved animation keywords and non-identifiers are skipped with a
//!    warning and left untouched.
//! 2. **Rewrite**: every `animation` / `animation-name` declaration (any
//!    vendor prefix, any depth) has its known local names replaced. The map is
//!    keyed by the bare local name, so prefixes on properties and at-rules
//!    are independent.
//! 3. **Merge**: the mapping is merged into the `:export` block, created
//!    after any `:import` block if missing. A key exported with a different
//!    value is overwritten with a warning.
//! 4. **Notify**: one `icss-scoped` message per scoped keyframes rule, in
//!    source order.
//!
//! ## Duplicate Names
//!
//! Two keyframes rules with the same local name each get their own
//! generator call and keep their own scoped name. References and the
//! export entry follow the last one.

mod ast;
mod error;
mod finalize;
mod icss;
mod naming;
mod parse;
mod renamer;
mod scope;
mod tokens;
mod transform;
mod validate;
mod vendor;


pub use ast::{AtRule, Comment, Declaration, Node, Rule, Stylesheet};
pub use error::{ConfigError, CssError};
pub use finalize::{ScopeEvent, ScopeOutput, PLUGIN_NAME, SCOPED_MESSAGE_TYPE};
pub use icss::{icss_block, merge_exports, IcssBlock};
pub use naming::{DefaultNameGenerator, PatternNameGenerator, ScopedNameGenerator};
pub use parse::parse_stylesheet;
pub use renamer::{is_animation_property, rewrite_value};
pub use scope::{is_keyframes, NameMap};
pub use transform::{
    process, process_batch, scope_keyframes, Compilation, ScopeConfig, ScopeOptions, SourceFile,
};
pub use validate::{classify, NameClass, Warning, WarningKind, RESERVED_NAMES};
pub use vendor::VENDOR_PREFIXES;

#[cfg(feature = "napi")]
pub use transform::scope_keyframes_native;
