//! Stylesheet Tree
//!
//! A statement-level CSS tree. Every node keeps the raw text around it
//! (`before`, `between`, `after`) so that a stylesheet which is parsed and
//! not modified serializes back to exactly the same bytes.

use std::fmt;

// ═══════════════════════════════════════════════════════════════════════════════
// NODES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Stylesheet {
    pub nodes: Vec<Node>,
    /// Raw text after the last node.
    pub after: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    AtRule(AtRule),
    Rule(Rule),
    Declaration(Declaration),
    Comment(Comment),
}

/// `@name params { ... }` or `@name params;`
#[derive(Debug, Clone, PartialEq)]
pub struct AtRule {
    pub before: String,
    /// Name without the leading `@`.
    pub name: String,
    /// Whitespace between the name and the params.
    pub after_name: String,
    pub params: String,
    /// Whitespace between the params and `{` / `;`.
    pub between: String,
    /// `None` for statement at-rules such as `@import "a.css";`.
    pub body: Option<Vec<Node>>,
    /// Raw text before the closing `}`.
    pub after: String,
    /// Statement at-rules: whether a `;` terminated the rule.
    pub semicolon: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub before: String,
    pub selector: String,
    /// Whitespace between the selector and `{`.
    pub between: String,
    pub nodes: Vec<Node>,
    /// Raw text before the closing `}`.
    pub after: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub before: String,
    pub prop: String,
    /// Raw text between the property and the value, colon included.
    pub between: String,
    pub value: String,
    pub semicolon: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub before: String,
    /// Full comment text including `/*` and `*/`.
    pub text: String,
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONSTRUCTION
// ═══════════════════════════════════════════════════════════════════════════════

impl Rule {
    pub fn new(selector: &str) -> Self {
        Rule {
            before: String::new(),
            selector: selector.to_string(),
            between: " ".to_string(),
            nodes: Vec::new(),
            after: "\n".to_string(),
        }
    }

    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Declaration(decl) => Some(decl),
            _ => None,
        })
    }

    pub fn declarations_mut(&mut self) -> impl Iterator<Item = &mut Declaration> {
        self.nodes.iter_mut().filter_map(|node| match node {
            Node::Declaration(decl) => Some(decl),
            _ => None,
        })
    }

    /// Appends a declaration, borrowing the indentation of the last existing
    /// one and terminating it so the new declaration stays separate.
    pub fn append_declaration(&mut self, prop: &str, value: &str) {
        let mut before = "\n  ".to_string();
        if let Some(last) = self.declarations_mut().last() {
            last.semicolon = true;
            if !last.before.is_empty() {
                before = last.before.clone();
            }
        }
        self.nodes.push(Node::Declaration(Declaration {
            before,
            prop: prop.to_string(),
            between: ": ".to_string(),
            value: value.to_string(),
            semicolon: true,
        }));
    }
}

impl Node {
    pub fn before_mut(&mut self) -> &mut String {
        match self {
            Node::AtRule(at) => &mut at.before,
            Node::Rule(rule) => &mut rule.before,
            Node::Declaration(decl) => &mut decl.before,
            Node::Comment(comment) => &mut comment.before,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TRAVERSAL
// ═══════════════════════════════════════════════════════════════════════════════

impl Stylesheet {
    /// Calls `f` for every declaration in the tree, at any depth, in source order.
    pub fn walk_declarations_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut Declaration),
    {
        walk_nodes_mut(&mut self.nodes, &mut f);
    }
}

fn walk_nodes_mut<F>(nodes: &mut [Node], f: &mut F)
where
    F: FnMut(&mut Declaration),
{
    for node in nodes {
        match node {
            Node::Declaration(decl) => f(decl),
            Node::Rule(rule) => walk_nodes_mut(&mut rule.nodes, f),
            Node::AtRule(at) => {
                if let Some(body) = at.body.as_mut() {
                    walk_nodes_mut(body, f);
                }
            }
            Node::Comment(_) => {}
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SERIALIZATION
// ═══════════════════════════════════════════════════════════════════════════════

impl fmt::Display for Stylesheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            write!(f, "{}", node)?;
        }
        f.write_str(&self.after)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::AtRule(at) => {
                write!(f, "{}@{}{}{}{}", at.before, at.name, at.after_name, at.params, at.between)?;
                match &at.body {
                    Some(body) => {
                        f.write_str("{")?;
                        for child in body {
                            write!(f, "{}", child)?;
                        }
                        write!(f, "{}}}", at.after)
                    }
                    None if at.semicolon => f.write_str(";"),
                    None => Ok(()),
                }
            }
            Node::Rule(rule) => {
                write!(f, "{}{}{}{{", rule.before, rule.selector, rule.between)?;
                for child in &rule.nodes {
                    write!(f, "{}", child)?;
                }
                write!(f, "{}}}", rule.after)
            }
            Node::Declaration(decl) => {
                write!(f, "{}{}{}{}", decl.before, decl.prop, decl.between, decl.value)?;
                if decl.semicolon {
                    f.write_str(";")?;
                }
                Ok(())
            }
            Node::Comment(comment) => write!(f, "{}{}", comment.before, comment.text),
        }
    }
}
