//! Scoping Pipeline
//!
//! Collect → rewrite references → merge exports → notify, over one
//! stylesheet at a time. Each call owns its own name map, warnings and
//! events; nothing is shared between calls.

#[cfg(feature = "napi")]
use napi_derive::napi;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::ast::Stylesheet;
use crate::error::{ConfigError, CssError};
use crate::finalize::{notify, ScopeEvent, ScopeOutput};
use crate::icss::merge_exports;
use crate::naming::{DefaultNameGenerator, PatternNameGenerator, ScopedNameGenerator};
use crate::parse::parse_stylesheet;
use crate::renamer::RenamerVisitor;
use crate::scope::{KeyframesCollector, NameMap};
use crate::validate::Warning;

// ═══════════════════════════════════════════════════════════════════════════════
// OPTIONS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Default)]
pub struct ScopeOptions {
    /// Falls back to [`DefaultNameGenerator`] when unset.
    pub generate_scoped_name: Option<Arc<dyn ScopedNameGenerator>>,
}

impl ScopeOptions {
    pub fn with_generator<G>(generator: G) -> Self
    where
        G: ScopedNameGenerator + 'static,
    {
        ScopeOptions {
            generate_scoped_name: Some(Arc::new(generator)),
        }
    }
}

impl fmt::Debug for ScopeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeOptions")
            .field("generate_scoped_name", &self.generate_scoped_name.is_some())
            .finish()
    }
}

/// Host-facing configuration, as received over JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeConfig {
    /// e.g. `"[name]__[local]___[hash:5]"`
    #[serde(default)]
    pub scoped_name_pattern: Option<String>,
}

impl ScopeConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl TryFrom<ScopeConfig> for ScopeOptions {
    type Error = ConfigError;

    fn try_from(config: ScopeConfig) -> Result<Self, Self::Error> {
        match config.scoped_name_pattern {
            Some(pattern) => Ok(ScopeOptions::with_generator(PatternNameGenerator::new(&pattern)?)),
            None => Ok(ScopeOptions::default()),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// COMPILATION CONTEXT
// ═══════════════════════════════════════════════════════════════════════════════

/// What the host compiler knows about the stylesheet being processed, and
/// where diagnostics and messages for it accumulate.
#[derive(Debug, Clone, Default)]
pub struct Compilation {
    /// Input file path.
    pub from: String,
    /// Full source text.
    pub source: String,
    pub warnings: Vec<Warning>,
    pub messages: Vec<ScopeEvent>,
}

impl Compilation {
    pub fn new(from: &str, source: &str) -> Self {
        Compilation {
            from: from.to_string(),
            source: source.to_string(),
            ..Default::default()
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ENTRY POINTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Scopes the keyframes names of an already parsed stylesheet in place.
/// Warnings and scope events are appended to `compilation`.
pub fn scope_keyframes(
    stylesheet: &mut Stylesheet,
    compilation: &mut Compilation,
    options: &ScopeOptions,
) -> NameMap {
    let default_generator = DefaultNameGenerator;
    let generator: &dyn ScopedNameGenerator = match &options.generate_scoped_name {
        Some(generator) => generator.as_ref(),
        None => &default_generator,
    };

    let mut collector = KeyframesCollector::new(generator, &compilation.from, &compilation.source);
    collector.collect(stylesheet);
    let KeyframesCollector {
        names,
        events,
        warnings,
        ..
    } = collector;

    let mut renamer = RenamerVisitor::new(&names);
    renamer.visit_stylesheet(stylesheet);

    compilation.warnings.extend(warnings);
    compilation.warnings.extend(merge_exports(stylesheet, &names));
    notify(&mut compilation.messages, events);

    names
}

/// Parses, scopes and serializes one stylesheet.
pub fn process(css: &str, from: &str, options: &ScopeOptions) -> Result<ScopeOutput, CssError> {
    let mut stylesheet = parse_stylesheet(css)?;
    let mut compilation = Compilation::new(from, css);
    let exports = scope_keyframes(&mut stylesheet, &mut compilation, options);

    Ok(ScopeOutput {
        css: stylesheet.to_string(),
        exports,
        warnings: compilation.warnings,
        messages: compilation.messages,
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFile {
    pub path: String,
    pub css: String,
}

/// Processes independent stylesheets in parallel. Results are in input order.
pub fn process_batch(
    files: &[SourceFile],
    options: &ScopeOptions,
) -> Vec<Result<ScopeOutput, CssError>> {
    files
        .par_iter()
        .map(|file| process(&file.css, &file.path, options))
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════════════
// NODE-API
// ═══════════════════════════════════════════════════════════════════════════════

/// Returns the JSON-encoded [`ScopeOutput`].
#[cfg(feature = "napi")]
#[napi]
pub fn scope_keyframes_native(
    css: String,
    from: String,
    config_json: Option<String>,
) -> napi::Result<String> {
    let config = match config_json {
        Some(json) => ScopeConfig::from_json(&json)
            .map_err(|e| napi::Error::from_reason(format!("Config parse error: {}", e)))?,
        None => ScopeConfig::default(),
    };
    let options = ScopeOptions::try_from(config)
        .map_err(|e| napi::Error::from_reason(e.to_string()))?;
    let output = process(&css, &from, &options)
        .map_err(|e| napi::Error::from_reason(format!("CSS parse error in {}: {}", from, e)))?;

    serde_json::to_string(&output)
        .map_err(|e| napi::Error::from_reason(format!("Serialization error: {}", e)))
}
