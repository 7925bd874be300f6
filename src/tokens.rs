//! Tokens Module
//!
//! Thin layer over `cssparser`'s tokenizer that records each token as a
//! byte span of the source. Parenthesized, bracketed and function groups
//! collapse into a single span; curly blocks stay open so the statement
//! parser can recurse into them. Every span points back into the input, so
//! callers can rebuild any slice of it byte-for-byte.

use cssparser::{
    BasicParseErrorKind, ParseError, ParseErrorKind, Parser, ParserInput, SourcePosition, Token,
};

use crate::error::CssError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexemeKind {
    Whitespace,
    Comment,
    String,
    AtKeyword,
    Colon,
    Semicolon,
    Comma,
    /// `!`, which starts `!important`.
    Bang,
    OpenBrace,
    CloseBrace,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lexeme {
    pub kind: LexemeKind,
    pub start: usize,
    pub end: usize,
}

impl Lexeme {
    pub fn text<'s>(&self, src: &'s str) -> &'s str {
        &src[self.start..self.end]
    }
}

/// Splits `src` into lexemes. Fails on an unclosed block, comment or string.
pub fn tokenize(src: &str) -> Result<Vec<Lexeme>, CssError> {
    let mut input = ParserInput::new(src);
    let mut parser = Parser::new(&mut input);
    let lexer = Lexer {
        src,
        origin: parser.position(),
    };

    let mut lexemes = Vec::new();
    match lexer.lex(&mut parser, &mut lexemes) {
        Ok(()) => Ok(lexemes),
        Err(err) => Err(into_css_error(err)),
    }
}

/// 1-based line and column of a byte offset.
pub fn line_column(src: &str, offset: usize) -> (u32, u32) {
    let prefix = &src[..offset];
    let line = prefix.matches('\n').count() + 1;
    let line_start = prefix.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let column = prefix[line_start..].chars().count() + 1;
    (line as u32, column as u32)
}

type LexResult<'i, T> = Result<T, ParseError<'i, CssError>>;

struct Lexer<'s> {
    src: &'s str,
    origin: SourcePosition,
}

impl<'s> Lexer<'s> {
    fn offset(&self, parser: &Parser<'_, '_>) -> usize {
        parser.slice_from(self.origin).len()
    }

    fn lex<'i>(&self, parser: &mut Parser<'i, '_>, out: &mut Vec<Lexeme>) -> LexResult<'i, ()> {
        loop {
            let start = self.offset(parser);
            let token = match parser.next_including_whitespace_and_comments() {
                Ok(token) => token.clone(),
                Err(err) if matches!(err.kind, BasicParseErrorKind::EndOfInput) => return Ok(()),
                Err(err) => return Err(err.into()),
            };

            let kind = match token {
                Token::WhiteSpace(_) => LexemeKind::Whitespace,
                Token::Comment(_) => {
                    if !comment_is_closed(&self.src[start..self.offset(parser)]) {
                        let (line, column) = line_column(self.src, start);
                        return Err(parser.new_custom_error(CssError::UnclosedComment { line, column }));
                    }
                    LexemeKind::Comment
                }
                Token::QuotedString(_) => {
                    if !string_is_closed(&self.src[start..self.offset(parser)]) {
                        let (line, column) = line_column(self.src, start);
                        return Err(parser.new_custom_error(CssError::UnclosedString { line, column }));
                    }
                    LexemeKind::String
                }
                // Ended by a raw newline; scanning resumes there.
                Token::BadString(_) => LexemeKind::String,
                Token::AtKeyword(_) => LexemeKind::AtKeyword,
                Token::Colon => LexemeKind::Colon,
                Token::Semicolon => LexemeKind::Semicolon,
                Token::Comma => LexemeKind::Comma,
                Token::Delim('!') => LexemeKind::Bang,
                Token::CloseCurlyBracket => LexemeKind::CloseBrace,
                Token::CurlyBracketBlock => {
                    out.push(Lexeme {
                        kind: LexemeKind::OpenBrace,
                        start,
                        end: start + 1,
                    });
                    let inner_end = parser.parse_nested_block(|nested| -> LexResult<'i, usize> {
                        self.lex(nested, out)?;
                        Ok(self.offset(nested))
                    })?;
                    let end = self.offset(parser);
                    if end == inner_end {
                        let (line, column) = line_column(self.src, start);
                        return Err(parser.new_custom_error(CssError::UnclosedBlock { line, column }));
                    }
                    out.push(Lexeme {
                        kind: LexemeKind::CloseBrace,
                        start: inner_end,
                        end,
                    });
                    continue;
                }
                Token::ParenthesisBlock | Token::SquareBracketBlock | Token::Function(_) => {
                    let mut inner = Vec::new();
                    parser.parse_nested_block(|nested| self.lex(nested, &mut inner))?;
                    LexemeKind::Other
                }
                _ => LexemeKind::Other,
            };

            out.push(Lexeme {
                kind,
                start,
                end: self.offset(parser),
            });
        }
    }
}

fn into_css_error(err: ParseError<'_, CssError>) -> CssError {
    match err.kind {
        ParseErrorKind::Custom(css) => css,
        ParseErrorKind::Basic(_) => CssError::UnexpectedToken {
            line: err.location.line + 1,
            column: err.location.column,
        },
    }
}

fn comment_is_closed(raw: &str) -> bool {
    raw.len() >= 4 && raw.ends_with("*/")
}

fn string_is_closed(raw: &str) -> bool {
    let mut chars = raw.chars();
    let Some(quote) = chars.next() else {
        return false;
    };
    let mut escaped = false;
    for c in chars {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<LexemeKind> {
        tokenize(src).unwrap().iter().map(|l| l.kind).collect()
    }

    #[test]
    fn test_spans_cover_input() {
        let src = "a:b /* c */ \"d\" url(x;y) [e{f}] !important;";
        let lexemes = tokenize(src).unwrap();
        let joined: String = lexemes.iter().map(|l| l.text(src)).collect();
        assert_eq!(joined, src);
    }

    #[test]
    fn test_groups_collapse() {
        use LexemeKind::*;
        assert_eq!(
            kinds("steps(4, end) {x}"),
            vec![Other, Whitespace, OpenBrace, Other, CloseBrace]
        );
        assert_eq!(kinds("foo!important"), vec![Other, Bang, Other]);
        assert_eq!(kinds("@media;"), vec![AtKeyword, Semicolon]);
    }

    #[test]
    fn test_unclosed_constructs() {
        assert_eq!(
            tokenize("a {\n b { }").unwrap_err(),
            CssError::UnclosedBlock { line: 1, column: 3 }
        );
        assert_eq!(
            tokenize("/*/").unwrap_err(),
            CssError::UnclosedComment { line: 1, column: 1 }
        );
        assert_eq!(
            tokenize("x 'a\\'").unwrap_err(),
            CssError::UnclosedString { line: 1, column: 3 }
        );
    }

    #[test]
    fn test_bad_string_is_not_fatal() {
        assert_eq!(kinds("'a\nb"), vec![LexemeKind::String, LexemeKind::Whitespace, LexemeKind::Other]);
    }

    #[test]
    fn test_line_column() {
        assert_eq!(line_column("ab\ncd", 0), (1, 1));
        assert_eq!(line_column("ab\ncd", 4), (2, 2));
    }
}
