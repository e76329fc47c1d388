//! AST parser
//!
//!     Walks the dump [`Tree`] and produces the typed [`Ast`].
//!
//!     Every node's token list starts with `(` and the node kind; dispatch happens on that kind:
//!
//!         import_decl, struct_decl, class_decl, enum_decl, extension_decl, func_decl
//!
//!     Declarations are handled in [declarations](declarations); function bodies are handed to
//!     [expressions](expressions), which turns every node below them into an
//!     [`Expression`](crate::instrument::ast::Expression). Nodes marked `implicit` are skipped at
//!     the declaration level (synthesized initializers, `deinit`, ...), but kept inside
//!     expressions where later stages need to see through them.
//!
//!     The parser reports every shape problem as a [`DumpError`]; it never panics on bad input.
//!     Locations are kept exactly as the dump reports them (byte columns); the pipeline
//!     normalizes them against the source afterwards.

pub mod declarations;
pub mod error;
pub mod expressions;
pub mod location;

pub use error::{DumpError, ParserResult};
pub use location::{parse_location, parse_range};

use crate::instrument::ast::Ast;
use crate::instrument::dump::{lex_dump, DumpToken, NodeId, Tree};

/// Parse dump text into the typed AST.
pub fn parse_dump<S: AsRef<str>>(text: &str, noise_markers: &[S]) -> ParserResult<Ast> {
    let tree = lex_dump(text, noise_markers);
    parse(&tree)
}

/// Parse an already lexed dump tree.
pub fn parse(tree: &Tree<Vec<DumpToken>>) -> ParserResult<Ast> {
    let mut parser = Parser::new(tree);
    let top_level = parser.top_level();
    let declarations = parser.declarations(&top_level)?;
    tracing::debug!(
        declarations = declarations.len(),
        expressions = parser.next_id,
        "parsed dump"
    );
    Ok(Ast { declarations })
}

pub(crate) struct Parser<'t> {
    tree: &'t Tree<Vec<DumpToken>>,
    next_id: usize,
}

impl<'t> Parser<'t> {
    fn new(tree: &'t Tree<Vec<DumpToken>>) -> Self {
        Self { tree, next_id: 0 }
    }

    fn tokens(&self, id: NodeId) -> &'t [DumpToken] {
        self.tree.value(id)
    }

    fn children(&self, id: NodeId) -> &'t [NodeId] {
        self.tree.children(id)
    }

    /// Root nodes, looking through any `source_file` wrapper.
    fn top_level(&self) -> Vec<NodeId> {
        let mut nodes = Vec::new();
        for child in self.children(self.tree.root()) {
            if node_kind(self.tokens(*child)) == Some("source_file") {
                nodes.extend_from_slice(self.children(*child));
            } else {
                nodes.push(*child);
            }
        }
        nodes
    }

    /// The first child node of the given kind.
    fn child_of_kind(&self, id: NodeId, kind: &str) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|child| node_kind(self.tokens(*child)) == Some(kind))
    }
}

/// The kind word following the opening `(`.
pub fn node_kind(tokens: &[DumpToken]) -> Option<&str> {
    match tokens {
        [open, kind, ..] if open.is("(") => kind.as_token(),
        _ => None,
    }
}

/// A short, single-line rendering of a node for error messages.
fn excerpt(tokens: &[DumpToken]) -> String {
    let text: Vec<String> = tokens.iter().take(8).map(|t| t.to_string()).collect();
    let mut excerpt = text.join(" ");
    if tokens.len() > 8 {
        excerpt.push_str(" ...");
    }
    excerpt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instrument::dump::tokenize;

    #[test]
    fn test_node_kind() {
        // Skip the leading indent marker.
        assert_eq!(node_kind(&tokenize("(call_expr type='()')")[1..]), Some("call_expr"));
        assert_eq!(node_kind(&tokenize("'XCTest'")[1..]), None);
        assert_eq!(node_kind(&[]), None);
    }

    #[test]
    fn test_source_file_is_transparent() {
        let ast = parse_dump(
            "(source_file \"t.swift\"\n  (import_decl range=[t.swift:1:1 - line:1:8] 'XCTest'))",
            &[] as &[&str],
        )
        .unwrap();
        assert_eq!(ast.declarations.len(), 1);
        assert_eq!(ast.declarations[0].name(), "XCTest");
    }

    #[test]
    fn test_excerpt_is_truncated() {
        let tokens = tokenize("(a b c d e f g h i j)");
        assert_eq!(excerpt(&tokens[1..]), "( a b c d e f g ...");
    }
}
