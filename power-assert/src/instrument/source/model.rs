//! Source model
//!
//! An indexed view over one source file. Lines are split once; every `(line, column)` pair
//! maps to an absolute character index in constant time.

use crate::instrument::ast::{SourceLocation, SourceRange};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unit the frontend's dump columns are counted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnUnit {
    /// UTF-8 bytes, as `swiftc -dump-ast` reports them.
    #[default]
    Bytes,
    #[serde(alias = "chars")]
    Characters,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    RangeOutOfBounds { range: SourceRange, lines: usize },
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::RangeOutOfBounds { range, lines } => {
                write!(f, "range {} outside of a {}-line source", range, lines)
            }
        }
    }
}

impl std::error::Error for SourceError {}

/// One line of the file, without its terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    /// One-based line number.
    pub number: usize,
    pub text: String,
    /// Character index of the line's first character in the file.
    pub offset: usize,
}

#[derive(Debug, Clone)]
pub struct SourceFile {
    text: String,
    chars: Vec<char>,
    lines: Vec<SourceLine>,
}

impl SourceFile {
    pub fn new(text: &str) -> Self {
        let mut lines = Vec::new();
        let mut offset = 0;
        for (index, line) in text.split('\n').enumerate() {
            let length = line.chars().count();
            lines.push(SourceLine {
                number: index + 1,
                text: line.strip_suffix('\r').unwrap_or(line).to_string(),
                offset,
            });
            offset += length + 1;
        }
        Self {
            text: text.to_string(),
            chars: text.chars().collect(),
            lines,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn lines(&self) -> &[SourceLine] {
        &self.lines
    }

    /// The zero-based line, if it exists.
    pub fn line(&self, line: usize) -> Option<&SourceLine> {
        self.lines.get(line)
    }

    pub fn len_chars(&self) -> usize {
        self.chars.len()
    }

    /// Absolute character index of a location, clamped to the end of the file.
    ///
    /// Line 0 counts columns from the start of the file, so a location on the first line
    /// doubles as an absolute offset.
    pub fn offset(&self, location: SourceLocation) -> usize {
        let base = self.lines.get(location.line).map_or(self.chars.len(), |l| l.offset);
        (base + location.column).min(self.chars.len())
    }

    /// The location of an absolute character index.
    pub fn location_at(&self, offset: usize) -> SourceLocation {
        let offset = offset.min(self.chars.len());
        let line = self
            .lines
            .partition_point(|l| l.offset <= offset)
            .saturating_sub(1);
        SourceLocation::new(line, offset - self.lines[line].offset)
    }

    /// The location just past the last character.
    pub fn end(&self) -> SourceLocation {
        self.location_at(self.chars.len())
    }

    /// The characters of a half-open range.
    pub fn slice(&self, range: SourceRange) -> Result<String, SourceError> {
        let out_of_bounds = || SourceError::RangeOutOfBounds {
            range,
            lines: self.lines.len(),
        };
        if range.start.line >= self.lines.len() || range.end.line >= self.lines.len() {
            return Err(out_of_bounds());
        }
        let start = self.offset(range.start);
        let end = self.offset(range.end);
        if start > end {
            return Err(out_of_bounds());
        }
        Ok(self.chars[start..end].iter().collect())
    }

    /// The characters from `start` to the end of the file.
    pub fn rest(&self, start: SourceLocation) -> &[char] {
        &self.chars[self.offset(start)..]
    }

    /// Convert a location whose column is counted in `unit` into a character column.
    pub fn normalize(&self, location: SourceLocation, unit: ColumnUnit) -> SourceLocation {
        match unit {
            ColumnUnit::Characters => location,
            ColumnUnit::Bytes => {
                let Some(line) = self.lines.get(location.line) else {
                    return location;
                };
                let mut bytes = 0;
                let mut column = 0;
                for c in line.text.chars() {
                    if bytes >= location.column {
                        break;
                    }
                    bytes += c.len_utf8();
                    column += 1;
                }
                // Past the end of the line: keep the overshoot as characters.
                column += location.column.saturating_sub(bytes);
                SourceLocation::new(location.line, column)
            }
        }
    }
}
