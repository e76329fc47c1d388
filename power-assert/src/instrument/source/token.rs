//! Source tokens

use crate::instrument::ast::SourceLocation;
use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "indent", rename_all = "snake_case")]
pub enum SourceTokenKind {
    /// Identifiers, keywords, literals, operators and punctuation.
    Token,
    /// `"..."`, escapes and interpolations included.
    String,
    /// `"""..."""`; `indent` is the column of the body's first line.
    MultilineString { indent: usize },
    /// Leading whitespace of a line, in characters.
    Indent(usize),
    /// Inline whitespace and comments.
    Whitespace,
    Newline,
}

/// A token of the raw source. `text` is exactly the source characters it covers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SourceToken {
    pub kind: SourceTokenKind,
    pub text: String,
    pub location: SourceLocation,
    /// Location just past the last character.
    pub end: SourceLocation,
}

const OPERATOR_CHARS: &str = "=-+*/%<>&|^~!?.";
const PUNCTUATION: &str = ".,()[]{}:;?!";

impl SourceToken {
    pub fn is_punctuation(&self) -> bool {
        self.kind == SourceTokenKind::Token
            && self.text.chars().count() == 1
            && self.text.chars().all(|c| PUNCTUATION.contains(c))
    }

    /// Operators such as `==`, `&&`, `..<`. A lone `.`, `?` or `!` is punctuation as well.
    pub fn is_operator(&self) -> bool {
        self.kind == SourceTokenKind::Token
            && !self.text.is_empty()
            && self.text.chars().all(|c| OPERATOR_CHARS.contains(c))
    }

    /// Whitespace, indentation, comments and line breaks.
    pub fn is_trivia(&self) -> bool {
        matches!(
            self.kind,
            SourceTokenKind::Whitespace | SourceTokenKind::Newline | SourceTokenKind::Indent(_)
        )
    }

    pub fn is_comment(&self) -> bool {
        self.kind == SourceTokenKind::Whitespace && self.text.starts_with("//")
    }

    pub fn is_string(&self) -> bool {
        matches!(
            self.kind,
            SourceTokenKind::String | SourceTokenKind::MultilineString { .. }
        )
    }

    pub fn is(&self, text: &str) -> bool {
        self.kind == SourceTokenKind::Token && self.text == text
    }

    pub fn is_opening(&self) -> bool {
        self.is("(") || self.is("[") || self.is("{")
    }

    pub fn is_closing(&self) -> bool {
        self.is(")") || self.is("]") || self.is("}")
    }
}

impl PartialOrd for SourceToken {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Tokens order by location.
impl Ord for SourceToken {
    fn cmp(&self, other: &Self) -> Ordering {
        self.location
            .cmp(&other.location)
            .then_with(|| self.end.cmp(&other.end))
    }
}
