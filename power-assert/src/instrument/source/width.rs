//! Display widths
//!
//! Columns in the rendered diagram are terminal cells, not characters: East Asian wide and
//! fullwidth characters take two cells. The table is a trait so that a renderer targeting a
//! different display can swap it.

use unicode_width::UnicodeWidthChar;

pub trait WidthTable {
    fn width(&self, c: char) -> usize;

    fn str_width(&self, s: &str) -> usize {
        s.chars().map(|c| self.width(c)).sum()
    }
}

/// Two cells for wide and fullwidth characters, one for everything else.
///
/// Zero-width and control characters count as one cell so that every character
/// occupies a distinct column.
#[derive(Debug, Clone, Copy, Default)]
pub struct EastAsianWidth;

impl WidthTable for EastAsianWidth {
    fn width(&self, c: char) -> usize {
        match UnicodeWidthChar::width(c) {
            Some(2) => 2,
            _ => 1,
        }
    }
}

/// Display width with the default table.
pub fn display_width(s: &str) -> usize {
    EastAsianWidth.str_width(s)
}
