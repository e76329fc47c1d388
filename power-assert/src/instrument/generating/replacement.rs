//! Source replacements
//!
//!     A replacement swaps one assertion's source range for generated code. Generated code is
//!     a single line, so it is padded with one line break per line the original spanned: every
//!     line after the assertion keeps its number, and compiler diagnostics still point at the
//!     user's lines.

use crate::instrument::ast::SourceRange;
use crate::instrument::source::SourceFile;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Replacement {
    pub range: SourceRange,
    pub text: String,
}

impl Replacement {
    /// Replace `range` with single-line `code`, padded to the range's line span.
    pub fn new(range: SourceRange, code: &str) -> Self {
        let breaks = range.end.line.saturating_sub(range.start.line);
        Self {
            range,
            text: format!("{}{}", code, "\n".repeat(breaks)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplacementError {
    Overlapping {
        first: SourceRange,
        second: SourceRange,
    },
}

impl fmt::Display for ReplacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplacementError::Overlapping { first, second } => {
                write!(f, "overlapping replacements at {} and {}", first, second)
            }
        }
    }
}

impl std::error::Error for ReplacementError {}

/// Apply the replacements, last in the file first.
pub fn apply(source: &SourceFile, replacements: &[Replacement]) -> Result<String, ReplacementError> {
    let mut ordered: Vec<&Replacement> = replacements.iter().collect();
    ordered.sort_by(|a, b| b.range.start.cmp(&a.range.start));

    for pair in ordered.windows(2) {
        let (later, earlier) = (pair[0], pair[1]);
        if earlier.range.end > later.range.start {
            return Err(ReplacementError::Overlapping {
                first: earlier.range,
                second: later.range,
            });
        }
    }

    let mut chars: Vec<char> = source.text().chars().collect();
    for replacement in ordered {
        let start = source.offset(replacement.range.start);
        let end = source.offset(replacement.range.end).max(start);
        chars.splice(start..end, replacement.text.chars());
    }
    Ok(chars.into_iter().collect())
}
