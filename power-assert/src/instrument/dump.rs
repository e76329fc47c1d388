//! AST dump lexing
//!
//!     The frontend's `-dump-ast` output is a parenthesized, indented tree, one node per line:
//!
//!         (source_file "t.swift"
//!           (import_decl range=[t.swift:1:1 - line:1:8] 'XCTest')
//!           (class_decl range=[t.swift:3:1 - line:9:1] "Tests" interface type='Tests.Type' access=internal inherits: XCTestCase
//!             ...
//!
//!     Lexing happens in two passes:
//!
//!     1. [tokenizer](tokenizer): noise filtering, then a character-class state machine producing
//!        a flat stream of [`DumpToken`]s with an indent marker at the start of every line.
//!     2. [tree](tree): indentation regroups the stream into a [`Tree`] of token lists, one
//!        list per node.
//!
//!     Neither pass can fail: anything unexpected surfaces later as a
//!     [`DumpError`](crate::instrument::parsing::DumpError) from the parser.

pub mod attributes;
pub mod token;
pub mod tokenizer;
pub mod tree;

pub use attributes::{has_flag, Attributes};
pub use token::DumpToken;
pub use tokenizer::{filter_noise, tokenize, DEFAULT_NOISE_MARKERS};
pub use tree::{build_tree, NodeId, Tree};

/// Filter, tokenize and regroup dump text.
pub fn lex_dump<S: AsRef<str>>(text: &str, noise_markers: &[S]) -> Tree<Vec<DumpToken>> {
    let filtered = filter_noise(text, noise_markers);
    let tokens = tokenize(&filtered);
    tracing::trace!(tokens = tokens.len(), "tokenized dump");
    build_tree(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_lex_dump_skips_conformances() {
        let text = "(source_file \"t.swift\"\n  (struct_decl \"Foo\"\n    (normal_conformance type='Foo' protocol='Equatable'\n      (value req=== witness=main.(file).Foo.==))\n    (var_decl \"val\" type='Int'))\n  (func_decl \"f()\"))\n";
        let tree = lex_dump(text, DEFAULT_NOISE_MARKERS);
        let file = tree.children(tree.root())[0];
        let structure = tree.children(file)[0];
        let members: Vec<_> = tree
            .children(structure)
            .iter()
            .map(|id| tree.value(*id)[1].to_string())
            .collect();
        assert_eq!(members, vec!["var_decl"]);
        assert_eq!(tree.children(file).len(), 2);
    }

    proptest! {
        #[test]
        fn prop_one_node_per_non_blank_line(lines in prop::collection::vec("[ ]{0,6}\\([a-z_]{1,8}( [a-z]{1,4}='[A-Za-z ]{0,6}')?\\)", 1..20)) {
            let text = lines.join("\n");
            let tree = lex_dump(&text, &[] as &[&str]);
            prop_assert_eq!(tree.len(), lines.len() + 1);
        }
    }
}
