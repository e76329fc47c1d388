//! Source formatter
//!
//!     Collapses a run of source tokens into one displayable line. Assertions are rendered on a
//!     single line in the diagram and embedded as a string literal in generated code, so every
//!     line break inside them has to go.
//!
//! Line Breaks
//!
//!     Indentation is dropped, and so is whitespace at the ends and before a line break. A line
//!     break then becomes:
//!
//!     - nothing after `(` or `[`, and before `)`, `]`, `.` or `,`
//!     - `; ` when it ends a statement, given a hint expression (see below)
//!     - a single space otherwise
//!
//!     Comments render as a single space. Multiline string literals are folded into an
//!     ordinary literal with their common indentation removed and `\n` escapes between lines.
//!
//! Statement Ends
//!
//!     Inside a closure, a line break can separate two statements:
//!
//!         xs.map { x in
//!             let y = x * 2
//!             return y
//!         }
//!
//!     Joining with a space would produce `let y = x * 2 return y`, which no longer compiles.
//!     With a hint (the AST of the formatted expression), a break becomes `; ` when a binary,
//!     call, tuple, paren or erasure expression ends exactly at the preceding token, the
//!     preceding token is not an operator, and the next token neither continues an operator
//!     chain nor closes a delimiter.

use super::token::{SourceToken, SourceTokenKind};
use crate::instrument::ast::{traverse, Expression, SourceLocation, Walk};

/// Formatter output: the text, plus where each emitted token landed in it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Formatted {
    pub text: String,
    /// `(token start, token end, char offset in text)` for every emitted token, in order.
    spans: Vec<(SourceLocation, SourceLocation, usize)>,
}

impl Formatted {
    /// Char offset in `text` of a source location.
    ///
    /// Locations inside trivia resolve to the next emitted token.
    pub fn offset_of(&self, location: SourceLocation) -> Option<usize> {
        let index = self.spans.partition_point(|(_, end, _)| *end <= location);
        let (start, _, offset) = self.spans.get(index)?;
        if *start <= location && start.line == location.line {
            Some(offset + (location.column - start.column))
        } else {
            Some(*offset)
        }
    }

    /// Char offset just past the end of the text.
    pub fn len_chars(&self) -> usize {
        self.text.chars().count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending<'a> {
    Nothing,
    Space(&'a str),
    LineBreak,
}

/// Lay tokens out on one line.
pub fn layout(tokens: &[SourceToken], hint: Option<&Expression>) -> Formatted {
    let mut formatted = Formatted::default();
    let mut length = 0;
    let mut pending = Pending::Nothing;
    let mut previous: Option<&SourceToken> = None;

    for token in tokens {
        match token.kind {
            SourceTokenKind::Indent(_) => continue,
            SourceTokenKind::Whitespace => {
                if pending == Pending::Nothing {
                    let space = if token.is_comment() { " " } else { token.text.as_str() };
                    pending = Pending::Space(space);
                }
                continue;
            }
            SourceTokenKind::Newline => {
                pending = Pending::LineBreak;
                continue;
            }
            _ => {}
        }

        if let Some(previous) = previous {
            let separator = match pending {
                Pending::Nothing => "",
                Pending::Space(space) => space,
                Pending::LineBreak => line_break(previous, token, hint),
            };
            formatted.text.push_str(separator);
            length += separator.chars().count();
        }
        pending = Pending::Nothing;

        let rendered = match token.kind {
            SourceTokenKind::MultilineString { indent } => fold_multiline(&token.text, indent),
            _ => token.text.clone(),
        };
        formatted.spans.push((token.location, token.end, length));
        length += rendered.chars().count();
        formatted.text.push_str(&rendered);
        previous = Some(token);
    }
    formatted
}

/// Single-line text of the tokens.
pub fn format(tokens: &[SourceToken]) -> String {
    layout(tokens, None).text
}

/// Single-line text of the tokens, separating statements with `;`.
pub fn format_with_hint(tokens: &[SourceToken], hint: &Expression) -> String {
    layout(tokens, Some(hint)).text
}

/// [`format`] with the hint, escaped for embedding in a string literal.
pub fn escaped(tokens: &[SourceToken], hint: Option<&Expression>) -> String {
    escape(&layout(tokens, hint).text)
}

/// Escape backslashes and double quotes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c == '\\' || c == '"' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn line_break(previous: &SourceToken, next: &SourceToken, hint: Option<&Expression>) -> &'static str {
    if previous.is("(") || previous.is("[") {
        return "";
    }
    if next.is(")") || next.is("]") || next.is(".") || next.is(",") {
        return "";
    }
    let continues = next.is_operator() || [")", "]", "}", ".", ":", ";"].iter().any(|c| next.is(c));
    if let Some(hint) = hint {
        if !continues && !previous.is_operator() && ends_statement(hint, previous.location) {
            return "; ";
        }
    }
    " "
}

/// Whether a statement-like expression of the subtree ends at `location`.
fn ends_statement(hint: &Expression, location: SourceLocation) -> bool {
    let mut found = false;
    traverse(hint, &mut |e: &Expression| {
        if found {
            return Walk::SkipChildren;
        }
        found = e.kind.is_statement_like() && e.range.is_some_and(|r| r.end == location);
        Walk::Continue
    });
    found
}

/// `"""` literal body as one `"..."` literal.
fn fold_multiline(text: &str, indent: usize) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let body = match lines.len() {
        0..=2 => &[][..],
        n => &lines[1..n - 1],
    };
    let folded: Vec<String> = body
        .iter()
        .map(|line| {
            let line = line.strip_suffix('\r').unwrap_or(line);
            let strip = line
                .chars()
                .take(indent)
                .take_while(|c| c.is_whitespace())
                .count();
            line.chars().skip(strip).collect()
        })
        .collect();
    format!("\"{}\"", folded.join("\\n"))
}
