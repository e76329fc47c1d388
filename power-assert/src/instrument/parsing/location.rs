//! `location=` and `range=` values
//!
//!     location=t.swift:15:23
//!     range=[t.swift:15:15 - line:15:19]
//!
//! The end of a range comes in several spellings depending on the frontend version:
//! `line:L:C`, `path:L:C`, `L:C`, or a bare column on the start line. Lines and columns are
//! one-based in the dump and zero-based once parsed.

use super::error::{DumpError, ParserResult};
use crate::instrument::ast::{SourceLocation, SourceRange};
use once_cell::sync::Lazy;
use regex::Regex;

static LOCATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(?P<path>.+):)?(?P<line>\d+):(?P<column>\d+)$").expect("valid location pattern")
});

static RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[(?P<start>.+?) - (?P<end>.+)\]$").expect("valid range pattern")
});

static BARE_COLUMN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+$").expect("valid column pattern"));

/// Marker the frontend prints for synthesized nodes without a source position.
const INVALID_LOC: &str = "<invalid loc>";

/// Parse `path:line:column`.
pub fn parse_location(value: &str) -> ParserResult<SourceLocation> {
    let captures = LOCATION
        .captures(value.trim())
        .ok_or_else(|| DumpError::InvalidLocation(value.to_string()))?;
    let line = one_based(&captures["line"], value, DumpError::InvalidLocation)?;
    let column = one_based(&captures["column"], value, DumpError::InvalidLocation)?;
    Ok(SourceLocation::new(line, column))
}

/// Parse `[start - end]`. `Ok(None)` for ranges the frontend marks as invalid.
pub fn parse_range(value: &str) -> ParserResult<Option<SourceRange>> {
    if value.contains(INVALID_LOC) {
        return Ok(None);
    }
    let invalid = || DumpError::InvalidRange(value.to_string());
    let captures = RANGE.captures(value.trim()).ok_or_else(invalid)?;
    let start = parse_location(&captures["start"]).map_err(|_| invalid())?;

    let end_text = &captures["end"];
    let end = if BARE_COLUMN.is_match(end_text) {
        let column = one_based(end_text, value, DumpError::InvalidRange)?;
        SourceLocation::new(start.line, column)
    } else {
        parse_location(end_text).map_err(|_| invalid())?
    };
    Ok(Some(SourceRange::new(start, end)))
}

fn one_based(
    digits: &str,
    value: &str,
    error: fn(String) -> DumpError,
) -> ParserResult<usize> {
    digits
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .ok_or_else(|| error(value.to_string()))
}
