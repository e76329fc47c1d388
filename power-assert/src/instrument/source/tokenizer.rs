//! Source tokenizer
//!
//!     Two passes over raw Swift source:
//!
//!     1. A `logos` lexer classifies byte spans ([`RawToken`]). Strings are scanned by
//!        callbacks so that escapes, interpolations (`\(g("b"))`) and nested strings never
//!        end a string early.
//!     2. A location pass turns spans into [`SourceToken`]s with character locations, and
//!        whitespace at the start of a line into [`SourceTokenKind::Indent`].
//!
//!     The tokenizer is lossless: concatenating the `text` of every token gives back the
//!     input. Characters the lexer cannot classify (a stray `"`, a lone `\r`) become plain
//!     tokens instead of errors.

use super::token::{SourceToken, SourceTokenKind};
use crate::instrument::ast::SourceLocation;
use logos::{Lexer, Logos};

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawToken {
    #[regex(r"[ \t]+")]
    Whitespace,

    #[regex(r"\r?\n")]
    Newline,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[token("/*", block_comment)]
    BlockComment,

    #[token("\"\"\"", multiline_string)]
    MultilineString,

    #[token("\"", string)]
    String,

    #[regex(r"[.,()\[\]{}:;?!]")]
    Punctuation,

    #[regex(r"[=\-+*/%<>&|^~]+")]
    #[regex(r"![=]=?")]
    #[regex(r"\.\.[.<]")]
    #[token("??")]
    Operator,

    #[regex(r#"[^ \t\r\n.,()\[\]{}:;?!=\-+*/%<>&|^~"]+"#)]
    Word,
}

fn string(lex: &mut Lexer<RawToken>) -> bool {
    match scan_quoted(lex.remainder().as_bytes()) {
        Some(length) => {
            lex.bump(length);
            true
        }
        None => false,
    }
}

fn multiline_string(lex: &mut Lexer<RawToken>) -> bool {
    let bytes = lex.remainder().as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' {
            i += 2;
            continue;
        }
        if bytes[i..].starts_with(b"\"\"\"") {
            lex.bump(i + 3);
            return true;
        }
        i += 1;
    }
    false
}

fn block_comment(lex: &mut Lexer<RawToken>) -> bool {
    let bytes = lex.remainder().as_bytes();
    let mut depth = 1;
    let mut i = 0;
    while i + 1 < bytes.len() {
        match (bytes[i], bytes[i + 1]) {
            (b'/', b'*') => {
                depth += 1;
                i += 2;
            }
            (b'*', b'/') => {
                depth -= 1;
                i += 2;
                if depth == 0 {
                    lex.bump(i);
                    return true;
                }
            }
            _ => i += 1,
        }
    }
    false
}

/// Length in bytes of a single-line string body including its closing quote.
///
/// Every delimiter is ASCII, so scanning bytes never splits a multi-byte character.
fn scan_quoted(bytes: &[u8]) -> Option<usize> {
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => return Some(i + 1),
            b'\n' => return None,
            b'\\' if bytes.get(i + 1) == Some(&b'(') => {
                i = skip_interpolation(bytes, i + 2)?;
                continue;
            }
            b'\\' => {
                i += 2;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Index just past the `)` closing an interpolation that starts at `i`.
fn skip_interpolation(bytes: &[u8], mut i: usize) -> Option<usize> {
    let mut depth = 1;
    while i < bytes.len() {
        match bytes[i] {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            b'"' => {
                i += 1 + scan_quoted(&bytes[i + 1..])?;
                continue;
            }
            b'\n' => return None,
            _ => {}
        }
        i += 1;
    }
    None
}

/// Tokenize a whole source text.
pub fn tokenize(text: &str) -> Vec<SourceToken> {
    let mut tokens = Vec::new();
    let mut location = SourceLocation::default();
    let mut at_line_start = true;

    let mut lexer = RawToken::lexer(text);
    while let Some(result) = lexer.next() {
        let slice = lexer.slice();
        let kind = match result {
            Ok(RawToken::Whitespace) if at_line_start => {
                SourceTokenKind::Indent(slice.chars().count())
            }
            Ok(RawToken::Whitespace | RawToken::LineComment | RawToken::BlockComment) => {
                SourceTokenKind::Whitespace
            }
            Ok(RawToken::Newline) => SourceTokenKind::Newline,
            Ok(RawToken::String) => SourceTokenKind::String,
            Ok(RawToken::MultilineString) => SourceTokenKind::MultilineString {
                indent: multiline_indent(slice),
            },
            Ok(RawToken::Punctuation | RawToken::Operator | RawToken::Word) | Err(_) => {
                SourceTokenKind::Token
            }
        };

        let end = advance(location, slice);
        at_line_start = kind == SourceTokenKind::Newline;
        tokens.push(SourceToken {
            kind,
            text: slice.to_string(),
            location,
            end,
        });
        location = end;
    }
    tokens
}

fn advance(mut location: SourceLocation, text: &str) -> SourceLocation {
    for c in text.chars() {
        if c == '\n' {
            location = SourceLocation::new(location.line + 1, 0);
        } else {
            location.column += 1;
        }
    }
    location
}

/// Column of the first non-whitespace character on the line after the opening fence.
fn multiline_indent(text: &str) -> usize {
    text.split('\n')
        .nth(1)
        .map_or(0, |line| line.chars().take_while(|c| c.is_whitespace()).count())
}
