//! Positions and ranges in Swift source
//!
//! ## Types
//!
//! - [`SourceLocation`] - A zero-based line:column position
//! - [`SourceRange`] - A range between two locations
//!
//! ## Key Design
//!
//! - **Character columns**: `column` counts `char`s from the start of the line, never bytes.
//!   The dump reports UTF-8 byte columns; the pipeline converts them through
//!   [`SourceFile::normalize`](crate::instrument::source::SourceFile::normalize) before any
//!   range is compared against source tokens.
//! - **Two conventions for `end`**: ranges parsed out of the dump keep the frontend's
//!   convention, where `end` is the start of the last token. Spans produced by
//!   [`SourceCompletion`](crate::instrument::capture::SourceCompletion) are half-open.
//! - **Zero sentinel**: [`SourceRange::ZERO`] stands in where no range applies.

use serde::Serialize;
use std::fmt;

/// A zero-based line:column position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// The location `columns` characters further on the same line.
    pub fn advanced(self, columns: usize) -> Self {
        Self::new(self.line, self.column + columns)
    }

    /// The location `columns` characters back on the same line, clamped at column 0.
    pub fn retreated(self, columns: usize) -> Self {
        Self::new(self.line, self.column.saturating_sub(columns))
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A range between two locations. Equality and hashing use `(start, end)` only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct SourceRange {
    pub start: SourceLocation,
    pub end: SourceLocation,
}

impl SourceRange {
    pub const ZERO: SourceRange = SourceRange {
        start: SourceLocation::new(0, 0),
        end: SourceLocation::new(0, 0),
    };

    pub const fn new(start: SourceLocation, end: SourceLocation) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Half-open containment: `start <= location < end`.
    pub fn contains(&self, location: SourceLocation) -> bool {
        self.start <= location && location < self.end
    }

    /// Whether `other` lies entirely inside this range.
    pub fn encloses(&self, other: &SourceRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Check if another half-open range overlaps with this one
    pub fn overlaps(&self, other: &SourceRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Build a bounding box that contains all provided ranges.
    pub fn bounding_box<'a, I>(mut ranges: I) -> Option<SourceRange>
    where
        I: Iterator<Item = &'a SourceRange>,
    {
        let first = *ranges.next()?;
        Some(ranges.fold(first, |acc, range| {
            SourceRange::new(acc.start.min(range.start), acc.end.max(range.end))
        }))
    }

    /// Apply `f` to both ends of the range.
    pub fn map(self, f: impl Fn(SourceLocation) -> SourceLocation) -> Self {
        Self::new(f(self.start), f(self.end))
    }
}

impl fmt::Display for SourceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(sl: usize, sc: usize, el: usize, ec: usize) -> SourceRange {
        SourceRange::new(SourceLocation::new(sl, sc), SourceLocation::new(el, ec))
    }

    #[test]
    fn test_location_ordering_is_line_major() {
        assert!(SourceLocation::new(1, 40) < SourceLocation::new(2, 0));
        assert!(SourceLocation::new(2, 3) < SourceLocation::new(2, 4));
        assert_eq!(SourceLocation::new(2, 4), SourceLocation::new(2, 4));
    }

    #[test]
    fn test_zero_sentinel() {
        assert!(SourceRange::ZERO.is_empty());
        assert_eq!(SourceRange::default(), SourceRange::ZERO);
    }

    #[test]
    fn test_contains_is_half_open() {
        let r = range(0, 2, 0, 5);
        assert!(r.contains(SourceLocation::new(0, 2)));
        assert!(r.contains(SourceLocation::new(0, 4)));
        assert!(!r.contains(SourceLocation::new(0, 5)));
        assert!(!r.contains(SourceLocation::new(0, 1)));
    }

    #[test]
    fn test_contains_multiline() {
        let r = range(1, 5, 3, 2);
        assert!(r.contains(SourceLocation::new(2, 0)));
        assert!(r.contains(SourceLocation::new(2, 80)));
        assert!(!r.contains(SourceLocation::new(1, 4)));
        assert!(!r.contains(SourceLocation::new(3, 2)));
    }

    #[test]
    fn test_overlaps_and_encloses() {
        let outer = range(0, 0, 0, 10);
        let inner = range(0, 2, 0, 4);
        let touching = range(0, 10, 0, 12);
        assert!(outer.overlaps(&inner));
        assert!(outer.encloses(&inner));
        assert!(!outer.overlaps(&touching));
        assert!(!inner.encloses(&outer));
    }

    #[test]
    fn test_bounding_box() {
        let ranges = [range(2, 4, 2, 9), range(1, 8, 2, 1), range(2, 0, 3, 1)];
        assert_eq!(
            SourceRange::bounding_box(ranges.iter()),
            Some(range(1, 8, 3, 1))
        );
        assert_eq!(SourceRange::bounding_box([].iter()), None);
    }
}
