//! Rewrites keyframes references in `animation` / `animation-name`
//! declarations, with or without a vendor prefix.

use crate::ast::{Declaration, Stylesheet};
use crate::scope::NameMap;
use crate::tokens::{tokenize, LexemeKind};
use crate::vendor::matches_unprefixed;

const ANIMATION_PROPERTIES: &[&str] = &["animation", "animation-name"];

pub struct RenamerVisitor<'a> {
    pub names: &'a NameMap,
    /// Declarations whose value changed.
    pub rewritten: usize,
}

impl<'a> RenamerVisitor<'a> {
    pub fn new(names: &'a NameMap) -> Self {
        RenamerVisitor {
            names,
            rewritten: 0,
        }
    }

    pub fn visit_stylesheet(&mut self, stylesheet: &mut Stylesheet) {
        if self.names.is_empty() {
            return;
        }
        stylesheet.walk_declarations_mut(|decl| self.visit_declaration(decl));
    }

    pub fn visit_declaration(&mut self, decl: &mut Declaration) {
        if !is_animation_property(&decl.prop) {
            return;
        }
        if let Some(value) = rewrite_value(&decl.value, self.names) {
            decl.value = value;
            self.rewritten += 1;
        }
    }
}

pub fn is_animation_property(prop: &str) -> bool {
    matches_unprefixed(prop, ANIMATION_PROPERTIES)
}

/// Replaces every top-level word of `value` that is a known local name.
/// Commas, whitespace and comments are separators, and `!` starts a new
/// word. Parenthesized groups and quoted strings stay inside a single word.
/// Returns `None` if nothing matched.
pub fn rewrite_value(value: &str, names: &NameMap) -> Option<String> {
    let mut out = String::with_capacity(value.len());
    let mut last = 0;
    let mut changed = false;

    for (start, end) in top_level_words(value) {
        if let Some(scoped) = names.get(&value[start..end]) {
            out.push_str(&value[last..start]);
            out.push_str(scoped);
            last = end;
            changed = true;
        }
    }

    if !changed {
        return None;
    }
    out.push_str(&value[last..]);
    Some(out)
}

fn top_level_words(value: &str) -> Vec<(usize, usize)> {
    // Values come from parsed declarations, so this only fails on
    // hand-built ones; those are left as they are.
    let Ok(lexemes) = tokenize(value) else {
        return Vec::new();
    };

    let mut words = Vec::new();
    let mut current: Option<(usize, usize)> = None;
    for lexeme in &lexemes {
        match lexeme.kind {
            LexemeKind::Whitespace | LexemeKind::Comma | LexemeKind::Comment => {
                words.extend(current.take());
            }
            LexemeKind::Bang => {
                words.extend(current.take());
                current = Some((lexeme.start, lexeme.end));
            }
            _ => match current.as_mut() {
                Some(word) => word.1 = lexeme.end,
                None => current = Some((lexeme.start, lexeme.end)),
            },
        }
    }
    words.extend(current);
    words
}
