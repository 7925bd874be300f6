//! Keyframes Collection
//!
//! First pass of scoping: every top-level keyframes at-rule (any recognized
//! vendor prefix) has its name validated, a scoped name generated, and its
//! params rewritten in place. The resulting [`NameMap`] drives the later
//! passes.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

use crate::ast::{Node, Stylesheet};
use crate::finalize::ScopeEvent;
use crate::naming::ScopedNameGenerator;
use crate::tokens::{tokenize, LexemeKind};
use crate::validate::{classify, NameClass, Warning};
use crate::vendor::matches_unprefixed;

// ═══════════════════════════════════════════════════════════════════════════════
// NAME MAP
// ═══════════════════════════════════════════════════════════════════════════════

/// Local name → scoped name, in first-insertion order. Re-inserting a key
/// replaces its value without moving it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameMap {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl NameMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the previous scoped name, if any.
    pub fn insert(&mut self, local: &str, scoped: &str) -> Option<String> {
        match self.index.get(local) {
            Some(&i) => Some(std::mem::replace(&mut self.entries[i].1, scoped.to_string())),
            None => {
                self.index.insert(local.to_string(), self.entries.len());
                self.entries.push((local.to_string(), scoped.to_string()));
                None
            }
        }
    }

    pub fn get(&self, local: &str) -> Option<&str> {
        self.index.get(local).map(|&i| self.entries[i].1.as_str())
    }

    pub fn contains(&self, local: &str) -> bool {
        self.index.contains_key(local)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(l, s)| (l.as_str(), s.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for NameMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (local, scoped) in &self.entries {
            map.serialize_entry(local, scoped)?;
        }
        map.end()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// COLLECTOR
// ═══════════════════════════════════════════════════════════════════════════════

pub struct KeyframesCollector<'a> {
    pub generator: &'a dyn ScopedNameGenerator,
    pub input_path: &'a str,
    pub source: &'a str,
    pub names: NameMap,
    pub events: Vec<ScopeEvent>,
    pub warnings: Vec<Warning>,
}

impl<'a> KeyframesCollector<'a> {
    pub fn new(generator: &'a dyn ScopedNameGenerator, input_path: &'a str, source: &'a str) -> Self {
        Self {
            generator,
            input_path,
            source,
            names: NameMap::new(),
            events: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn collect(&mut self, stylesheet: &mut Stylesheet) {
        for node in stylesheet.nodes.iter_mut() {
            let Node::AtRule(at) = node else {
                continue;
            };
            if !is_keyframes(&at.name) {
                continue;
            }
            let Some(name) = keyframes_name(&at.params) else {
                continue;
            };

            match classify(&name) {
                NameClass::Reserved => {
                    self.warn(Warning::reserved_name(&name));
                    continue;
                }
                NameClass::InvalidIdentifier => {
                    self.warn(Warning::invalid_identifier(&name));
                    continue;
                }
                NameClass::Valid => {}
            }

            let scoped = self.generator.generate(&name, self.input_path, self.source);
            log::debug!("[icss-keyframes] {}: '{}' -> '{}'", self.input_path, name, scoped);

            // `@keyframes"foo"` has no separator to keep once unquoted.
            if at.after_name.is_empty() {
                at.after_name = " ".to_string();
            }
            at.params = scoped.clone();
            self.names.insert(&name, &scoped);
            self.events.push(ScopeEvent::new(&name, &scoped));
        }
    }

    fn warn(&mut self, warning: Warning) {
        log::warn!("[icss-keyframes] {}: {}", self.input_path, warning);
        self.warnings.push(warning);
    }
}

pub fn is_keyframes(at_rule_name: &str) -> bool {
    matches_unprefixed(at_rule_name, &["keyframes"])
}

/// The declared animation name, with comments dropped and quotes removed.
/// `None` when the params are empty.
pub fn keyframes_name(params: &str) -> Option<String> {
    let stripped: String = match tokenize(params) {
        Ok(lexemes) => lexemes
            .iter()
            .filter(|l| l.kind != LexemeKind::Comment)
            .map(|l| l.text(params))
            .collect(),
        Err(_) => params.to_string(),
    };

    let trimmed = stripped.trim();
    if trimmed.is_empty() {
        return None;
    }
    let bytes = trimmed.as_bytes();
    let first = bytes[0];
    if trimmed.len() >= 2 && (first == b'"' || first == b'\'') && bytes[bytes.len() - 1] == first {
        return Some(trimmed[1..trimmed.len() - 1].to_string());
    }
    Some(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_stylesheet;

    fn scope_prefix(local: &str, _path: &str, _css: &str) -> String {
        format!("__scope__{}", local)
    }

    #[test]
    fn test_name_map_keeps_first_position() {
        let mut names = NameMap::new();
        assert_eq!(names.insert("a", "1"), None);
        names.insert("b", "2");
        assert_eq!(names.insert("a", "3"), Some("1".to_string()));
        let entries: Vec<_> = names.iter().collect();
        assert_eq!(entries, vec![("a", "3"), ("b", "2")]);
        assert_eq!(
            serde_json::to_string(&names).unwrap(),
            r#"{"a":"3","b":"2"}"#
        );
    }

    #[test]
    fn test_keyframes_name_extraction() {
        assert_eq!(keyframes_name("  foo ").as_deref(), Some("foo"));
        assert_eq!(keyframes_name("\"foo\"").as_deref(), Some("foo"));
        assert_eq!(keyframes_name("'foo'").as_deref(), Some("foo"));
        assert_eq!(keyframes_name("   "), None);
        assert_eq!(keyframes_name("\"").as_deref(), Some("\""));
        assert_eq!(keyframes_name("/* x */ foo").as_deref(), Some("foo"));
        assert_eq!(keyframes_name("foo /* x */").as_deref(), Some("foo"));
        assert_eq!(keyframes_name("/* only */"), None);
    }

    #[test]
    fn test_collects_prefixed_keyframes() {
        let mut sheet =
            parse_stylesheet("@keyframes a {}\n@-webkit-keyframes b {}\n@-moz-keyframes c {}\n@media print {}")
                .unwrap();
        let mut collector = KeyframesCollector::new(&scope_prefix, "a.css", "");
        collector.collect(&mut sheet);

        let entries: Vec<_> = collector.names.iter().collect();
        assert_eq!(
            entries,
            vec![("a", "__scope__a"), ("b", "__scope__b"), ("c", "__scope__c")]
        );
        assert_eq!(
            sheet.to_string(),
            "@keyframes __scope__a {}\n@-webkit-keyframes __scope__b {}\n@-moz-keyframes __scope__c {}\n@media print {}"
        );
        assert!(collector.warnings.is_empty());
    }

    #[test]
    fn test_ignores_unrecognized_at_rules() {
        let css = "@-khtml-keyframes a {}\n@keyframes-extra b {}\n@media screen { @keyframes c {} }";
        let mut sheet = parse_stylesheet(css).unwrap();
        let mut collector = KeyframesCollector::new(&scope_prefix, "a.css", css);
        collector.collect(&mut sheet);

        assert!(collector.names.is_empty());
        assert!(collector.events.is_empty());
        assert!(collector.warnings.is_empty());
        assert_eq!(sheet.to_string(), css);
    }

    #[test]
    fn test_rejected_names_are_left_alone() {
        let css = "@keyframes none {}\n@keyframes 22s {}\n@keyframes anim22 {}";
        let mut sheet = parse_stylesheet(css).unwrap();
        let mut collector = KeyframesCollector::new(&scope_prefix, "a.css", css);
        collector.collect(&mut sheet);

        assert_eq!(
            sheet.to_string(),
            "@keyframes none {}\n@keyframes 22s {}\n@keyframes __scope__anim22 {}"
        );
        let messages: Vec<String> = collector.warnings.iter().map(|w| w.to_string()).collect();
        assert_eq!(
            messages,
            vec![
                "Unable to use reserve 'none' animation name",
                "Invalid animation name identifier '22s'",
            ]
        );
        assert_eq!(collector.events.len(), 1);
    }

    #[test]
    fn test_quoted_name_without_space() {
        let mut sheet = parse_stylesheet("@keyframes\"foo\"{}").unwrap();
        let mut collector = KeyframesCollector::new(&scope_prefix, "a.css", "");
        collector.collect(&mut sheet);
        assert_eq!(sheet.to_string(), "@keyframes __scope__foo{}");
    }

    #[test]
    fn test_comment_in_params_is_dropped() {
        let mut sheet = parse_stylesheet("@keyframes /* x */ foo {}").unwrap();
        let mut collector = KeyframesCollector::new(&scope_prefix, "a.css", "");
        collector.collect(&mut sheet);
        assert!(collector.warnings.is_empty());
        assert_eq!(collector.names.get("foo"), Some("__scope__foo"));
        assert_eq!(sheet.to_string(), "@keyframes __scope__foo {}");
    }

    #[test]
    fn test_empty_params_are_skipped_silently() {
        let mut sheet = parse_stylesheet("@keyframes {}").unwrap();
        let mut collector = KeyframesCollector::new(&scope_prefix, "a.css", "");
        collector.collect(&mut sheet);
        assert!(collector.names.is_empty());
        assert!(collector.warnings.is_empty());
    }

    #[test]
    fn test_duplicate_names_generate_per_occurrence() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        let counter = AtomicUsize::new(0);
        let numbered = |local: &str, _path: &str, _css: &str| {
            format!("{}_{}", local, counter.fetch_add(1, Ordering::SeqCst))
        };

        let mut sheet = parse_stylesheet("@keyframes foo {}\n@keyframes foo {}").unwrap();
        let mut collector = KeyframesCollector::new(&numbered, "a.css", "");
        collector.collect(&mut sheet);

        assert_eq!(sheet.to_string(), "@keyframes foo_0 {}\n@keyframes foo_1 {}");
        assert_eq!(collector.names.get("foo"), Some("foo_1"));
        assert_eq!(collector.names.len(), 1);
        assert_eq!(collector.events.len(), 2);
    }
}
