//! Parse Module
//!
//! Statement-level CSS parser. It splits source text into at-rules, rules,
//! declarations and comments without interpreting selectors or values,
//! keeping every byte of whitespace so unmodified input round-trips exactly.
//! Lexing is done by [`crate::tokens`]; this module only groups lexemes into
//! statements.

use crate::ast::{AtRule, Comment, Declaration, Node, Rule, Stylesheet};
use crate::error::CssError;
use crate::tokens::{line_column, tokenize, Lexeme, LexemeKind};

/// Parse a complete stylesheet.
pub fn parse_stylesheet(input: &str) -> Result<Stylesheet, CssError> {
    let lexemes = tokenize(input)?;
    let mut parser = Parser {
        src: input,
        lexemes: &lexemes,
        pos: 0,
    };
    let (nodes, after) = parser.parse_nodes(false)?;
    Ok(Stylesheet { nodes, after })
}

struct Parser<'a> {
    src: &'a str,
    lexemes: &'a [Lexeme],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<LexemeKind> {
        self.lexemes.get(self.pos).map(|l| l.kind)
    }

    /// Byte offset of the current lexeme, or the end of input.
    fn offset(&self) -> usize {
        self.lexemes
            .get(self.pos)
            .map(|l| l.start)
            .unwrap_or(self.src.len())
    }

    /// Parses nodes until end of input (top level) or the `}` closing the
    /// current block. The closing brace is left for the caller.
    fn parse_nodes(&mut self, nested: bool) -> Result<(Vec<Node>, String), CssError> {
        let mut nodes = Vec::new();

        loop {
            let before_start = self.offset();
            // Stray semicolons carry no meaning; keep them as raw text.
            while matches!(
                self.peek(),
                Some(LexemeKind::Whitespace | LexemeKind::Semicolon)
            ) {
                self.pos += 1;
            }
            let before = self.src[before_start..self.offset()].to_string();

            let node = match self.peek() {
                None => return Ok((nodes, before)),
                Some(LexemeKind::CloseBrace) if nested => return Ok((nodes, before)),
                Some(LexemeKind::CloseBrace) => {
                    let (line, column) = line_column(self.src, self.offset());
                    return Err(CssError::UnexpectedCloseBrace { line, column });
                }
                Some(LexemeKind::Comment) => {
                    let text = self.lexemes[self.pos].text(self.src).to_string();
                    self.pos += 1;
                    Node::Comment(Comment { before, text })
                }
                Some(LexemeKind::AtKeyword) => self.parse_at_rule(before)?,
                Some(_) => self.parse_rule_or_declaration(before)?,
            };
            nodes.push(node);
        }
    }

    /// Parses a `{ ... }` body. The current lexeme is the opening brace.
    fn parse_block(&mut self) -> Result<(Vec<Node>, String), CssError> {
        self.pos += 1; // '{'
        let body = self.parse_nodes(true)?;
        if self.peek() == Some(LexemeKind::CloseBrace) {
            self.pos += 1;
        }
        Ok(body)
    }

    fn parse_at_rule(&mut self, before: String) -> Result<Node, CssError> {
        let keyword = self.lexemes[self.pos].text(self.src);
        let name = keyword[1..].to_string();
        self.pos += 1;

        let prelude_start = self.offset();
        let terminator = self.scan_prelude();
        let prelude = &self.src[prelude_start..self.offset()];
        let lead = prelude.len() - prelude.trim_start().len();
        let rest = &prelude[lead..];
        let params = rest.trim_end();

        let mut at = AtRule {
            before,
            name,
            after_name: prelude[..lead].to_string(),
            params: params.to_string(),
            between: rest[params.len()..].to_string(),
            body: None,
            after: String::new(),
            semicolon: false,
        };

        match terminator {
            Some(LexemeKind::OpenBrace) => {
                let (body, after) = self.parse_block()?;
                at.body = Some(body);
                at.after = after;
            }
            Some(LexemeKind::Semicolon) => {
                self.pos += 1;
                at.semicolon = true;
            }
            _ => {}
        }

        Ok(Node::AtRule(at))
    }

    fn parse_rule_or_declaration(&mut self, before: String) -> Result<Node, CssError> {
        let start_pos = self.pos;
        let start = self.offset();
        let terminator = self.scan_prelude();

        if terminator == Some(LexemeKind::OpenBrace) {
            let text = &self.src[start..self.offset()];
            let selector = text.trim_end();
            let between = text[selector.len()..].to_string();
            let (nodes, after) = self.parse_block()?;
            return Ok(Node::Rule(Rule {
                before,
                selector: selector.to_string(),
                between,
                nodes,
                after,
            }));
        }

        let semicolon = terminator == Some(LexemeKind::Semicolon);
        if !semicolon {
            // Whitespace before a closing brace belongs to the enclosing block.
            while self.pos > start_pos && self.lexemes[self.pos - 1].kind == LexemeKind::Whitespace {
                self.pos -= 1;
            }
        }
        let end = self.offset();
        let colon = self.lexemes[start_pos..self.pos]
            .iter()
            .find(|l| l.kind == LexemeKind::Colon)
            .map(|l| l.start - start);
        let text = &self.src[start..end];
        if semicolon {
            self.pos += 1;
        }

        let (prop, between, value) = match colon {
            Some(colon) => {
                let prop = text[..colon].trim_end();
                let value = text[colon + 1..].trim_start();
                let between_end = text.len() - value.len();
                (prop, &text[prop.len()..between_end], value)
            }
            None => (text, "", ""),
        };

        Ok(Node::Declaration(Declaration {
            before,
            prop: prop.to_string(),
            between: between.to_string(),
            value: value.to_string(),
            semicolon,
        }))
    }

    /// Advances to the next `{`, `;` or `}` of the current block. Strings,
    /// comments and bracketed groups are already single lexemes. Returns the
    /// terminator found, or `None` at end of input.
    fn scan_prelude(&mut self) -> Option<LexemeKind> {
        while let Some(kind) = self.peek() {
            match kind {
                LexemeKind::OpenBrace | LexemeKind::Semicolon | LexemeKind::CloseBrace => {
                    return Some(kind)
                }
                _ => self.pos += 1,
            }
        }
        None
    }
}
