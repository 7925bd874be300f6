//! ICSS `:export` / `:import` Blocks
//!
//! Scoped names are published through the stylesheet's `:export` rule.
//! `:import(...)` rules only anchor where a new `:export` goes; they are
//! never modified.

use crate::ast::{Node, Rule, Stylesheet};
use crate::scope::NameMap;
use crate::validate::Warning;

const EXPORT_SELECTOR: &str = ":export";
const IMPORT_SELECTOR: &str = ":import";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IcssBlock {
    Import,
    Export,
}

/// Recognizes ICSS pseudo-rules by their selector.
pub fn icss_block(node: &Node) -> Option<IcssBlock> {
    let Node::Rule(rule) = node else {
        return None;
    };
    let selector = rule.selector.trim();
    if selector == EXPORT_SELECTOR {
        Some(IcssBlock::Export)
    } else if selector.starts_with(IMPORT_SELECTOR) {
        Some(IcssBlock::Import)
    } else {
        None
    }
}

/// Merges `names` into the stylesheet's `:export` rule, creating it when
/// missing. Keys already exported with a different value are overwritten and
/// reported; everything else in the block is left as is.
pub fn merge_exports(stylesheet: &mut Stylesheet, names: &NameMap) -> Vec<Warning> {
    let mut warnings = Vec::new();
    if names.is_empty() {
        return warnings;
    }

    let index = locate_or_insert_export(stylesheet);
    let Node::Rule(export) = &mut stylesheet.nodes[index] else {
        return warnings;
    };

    for (local, scoped) in names.iter() {
        let existing = export.declarations_mut().find(|decl| decl.prop == local);
        match existing {
            Some(decl) if decl.value.trim() == scoped => {}
            Some(decl) => {
                let warning = Warning::export_key_collision(local);
                log::warn!("[icss-keyframes] {}", warning);
                warnings.push(warning);
                decl.value = scoped.to_string();
            }
            None => export.append_declaration(local, scoped),
        }
    }

    warnings
}

fn locate_or_insert_export(stylesheet: &mut Stylesheet) -> usize {
    let nodes = &mut stylesheet.nodes;
    if let Some(index) = nodes
        .iter()
        .position(|node| icss_block(node) == Some(IcssBlock::Export))
    {
        return index;
    }

    let last_import = nodes
        .iter()
        .rposition(|node| icss_block(node) == Some(IcssBlock::Import));

    let mut node = Node::Rule(Rule::new(EXPORT_SELECTOR));
    match last_import {
        Some(import) => {
            *node.before_mut() = "\n".to_string();
            nodes.insert(import + 1, node);
            import + 1
        }
        None => {
            if !nodes.is_empty() {
                *node.before_mut() = "\n".to_string();
            }
            nodes.push(node);
            nodes.len() - 1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_stylesheet;

    fn names(pairs: &[(&str, &str)]) -> NameMap {
        let mut names = NameMap::new();
        for (local, scoped) in pairs {
            names.insert(local, scoped);
        }
        names
    }

    #[test]
    fn test_recognizes_icss_blocks() {
        let sheet = parse_stylesheet(":import(\"a.css\") { x: y }\n:export { a: b }\n.c {}").unwrap();
        let kinds: Vec<_> = sheet.nodes.iter().map(icss_block).collect();
        assert_eq!(kinds, vec![Some(IcssBlock::Import), Some(IcssBlock::Export), None]);
    }

    #[test]
    fn test_creates_export_at_end() {
        let mut sheet = parse_stylesheet(".a {}").unwrap();
        let warnings = merge_exports(&mut sheet, &names(&[("foo", "__s__foo")]));
        assert!(warnings.is_empty());
        assert_eq!(sheet.to_string(), ".a {}\n:export {\n  foo: __s__foo;\n}");
    }

    #[test]
    fn test_creates_export_after_import() {
        let mut sheet = parse_stylesheet(":import(\"a.css\") {\n  i: j;\n}\n.a {}\n").unwrap();
        merge_exports(&mut sheet, &names(&[("foo", "__s__foo")]));
        assert_eq!(
            sheet.to_string(),
            ":import(\"a.css\") {\n  i: j;\n}\n:export {\n  foo: __s__foo;\n}\n.a {}\n"
        );
    }

    #[test]
    fn test_extends_existing_export() {
        let mut sheet = parse_stylesheet(":export {\n  a: b;\n  foo: __s__foo\n}").unwrap();
        let warnings = merge_exports(&mut sheet, &names(&[("foo", "__s__foo"), ("bar", "__s__bar")]));
        assert!(warnings.is_empty());
        assert_eq!(
            sheet.to_string(),
            ":export {\n  a: b;\n  foo: __s__foo;\n  bar: __s__bar;\n}"
        );
    }

    #[test]
    fn test_collision_overwrites_with_warning() {
        let mut sheet = parse_stylesheet(":export {\n  foo: __scope__selector;\n}").unwrap();
        let warnings = merge_exports(&mut sheet, &names(&[("foo", "__scope__foo")]));
        assert_eq!(
            warnings.iter().map(|w| w.to_string()).collect::<Vec<_>>(),
            vec!["'foo' identifier is already declared and will be override"]
        );
        assert_eq!(sheet.to_string(), ":export {\n  foo: __scope__foo;\n}");
    }

    #[test]
    fn test_empty_names_leave_stylesheet_untouched() {
        let mut sheet = parse_stylesheet(".a { animation: foo }").unwrap();
        merge_exports(&mut sheet, &NameMap::new());
        assert_eq!(sheet.to_string(), ".a { animation: foo }");
    }
}
