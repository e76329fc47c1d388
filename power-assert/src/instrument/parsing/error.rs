//! Malformed dump errors

use std::fmt;

/// The dump did not have the shape the parser expects. Fatal for the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DumpError {
    /// A node without a `(kind` prefix where one is required.
    MissingKind { excerpt: String },
    /// A declaration without its quoted name.
    MissingName { kind: String },
    /// A `location=` value that is not `path:line:column`.
    InvalidLocation(String),
    /// A `range=` value that is not `[path:line:column - ...]`.
    InvalidRange(String),
    /// An expression the capture engine inspects has no `range=`.
    MissingRange { kind: String, excerpt: String },
    /// A token that cannot appear where it was found.
    UnexpectedToken { expected: String, found: String },
}

impl fmt::Display for DumpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DumpError::MissingKind { excerpt } => {
                write!(f, "malformed dump: node without a kind: {}", excerpt)
            }
            DumpError::MissingName { kind } => {
                write!(f, "malformed dump: {} without a name", kind)
            }
            DumpError::InvalidLocation(value) => {
                write!(f, "malformed dump: invalid location '{}'", value)
            }
            DumpError::InvalidRange(value) => {
                write!(f, "malformed dump: invalid range '{}'", value)
            }
            DumpError::MissingRange { kind, excerpt } => {
                write!(f, "malformed dump: {} without a range: {}", kind, excerpt)
            }
            DumpError::UnexpectedToken { expected, found } => {
                write!(f, "malformed dump: expected {}, found '{}'", expected, found)
            }
        }
    }
}

impl std::error::Error for DumpError {}

pub type ParserResult<T> = Result<T, DumpError>;
