//! Tokens of the textual AST dump

use serde::Serialize;
use std::fmt;

/// One token of the dump.
///
/// Quotes are stripped from symbols (`'Int'`) and strings (`"testA()"`); the variant keeps the
/// distinction so that attribute values and node names can be told apart from bare words.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "token", content = "value", rename_all = "snake_case")]
pub enum DumpToken {
    Token(String),
    Symbol(String),
    String(String),
    /// Leading spaces of a line; starts a new node.
    Indent(usize),
}

impl DumpToken {
    pub fn token(text: &str) -> Self {
        DumpToken::Token(text.to_string())
    }

    /// `true` for a bare token with exactly this text.
    pub fn is(&self, text: &str) -> bool {
        matches!(self, DumpToken::Token(t) if t == text)
    }

    /// The bare text of a bare token.
    pub fn as_token(&self) -> Option<&str> {
        match self {
            DumpToken::Token(t) => Some(t),
            _ => None,
        }
    }

    /// The unquoted text of a symbol or string.
    pub fn as_quoted(&self) -> Option<&str> {
        match self {
            DumpToken::Symbol(t) | DumpToken::String(t) => Some(t),
            _ => None,
        }
    }
}

/// Renders tokens back in dump syntax.
impl fmt::Display for DumpToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DumpToken::Token(t) => write!(f, "{}", t),
            DumpToken::Symbol(t) => write!(f, "'{}'", t),
            DumpToken::String(t) => write!(f, "{:?}", t),
            DumpToken::Indent(depth) => write!(f, "\n{}", " ".repeat(*depth)),
        }
    }
}
