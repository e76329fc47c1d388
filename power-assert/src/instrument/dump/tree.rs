//! Dump tree
//!
//!     An index arena holding the rose tree the tree lexer builds. Children are owned through
//!     the arena and referenced by [`NodeId`]; the parent link is a plain index, so walking up
//!     never fights the borrow checker.
//!
//!     Nesting is recovered from indentation alone: every [`DumpToken::Indent`] starts a node
//!     that is a child of the closest preceding node with a smaller indent.

use super::token::DumpToken;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct Slot<T> {
    value: T,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

/// Rose tree stored as an arena. The root always exists.
#[derive(Debug, Clone)]
pub struct Tree<T> {
    slots: Vec<Slot<T>>,
}

impl<T> Tree<T> {
    pub fn new(root: T) -> Self {
        Self {
            slots: vec![Slot {
                value: root,
                children: Vec::new(),
                parent: None,
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn add_child(&mut self, parent: NodeId, value: T) -> NodeId {
        let id = NodeId(self.slots.len());
        self.slots.push(Slot {
            value,
            children: Vec::new(),
            parent: Some(parent),
        });
        self.slots[parent.0].children.push(id);
        id
    }

    pub fn value(&self, id: NodeId) -> &T {
        &self.slots[id.0].value
    }

    pub fn value_mut(&mut self, id: NodeId) -> &mut T {
        &mut self.slots[id.0].value
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.slots[id.0].children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slots[id.0].parent
    }

    /// Distance from the root; the root is at depth 0.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            depth += 1;
            current = parent;
        }
        depth
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        // The root is always present.
        false
    }
}

/// Build the tree of token lists out of a flat token stream.
pub fn build_tree(tokens: Vec<DumpToken>) -> Tree<Vec<DumpToken>> {
    let mut tree = Tree::new(Vec::new());
    let mut stack: Vec<(usize, NodeId)> = Vec::new();
    let mut current = tree.root();

    for token in tokens {
        match token {
            DumpToken::Indent(indent) => {
                while stack.last().is_some_and(|(top, _)| *top >= indent) {
                    stack.pop();
                }
                let parent = stack.last().map_or(tree.root(), |(_, id)| *id);
                current = tree.add_child(parent, Vec::new());
                stack.push((indent, current));
            }
            other => tree.value_mut(current).push(other),
        }
    }
    tree
}

/// One node per line, indented by depth, tokens separated by spaces.
impl fmt::Display for Tree<Vec<DumpToken>> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_node(
            tree: &Tree<Vec<DumpToken>>,
            id: NodeId,
            f: &mut fmt::Formatter<'_>,
        ) -> fmt::Result {
            let depth = tree.depth(id);
            if depth > 0 {
                let line: Vec<String> = tree.value(id).iter().map(|t| t.to_string()).collect();
                writeln!(f, "{}{}", "  ".repeat(depth - 1), line.join(" "))?;
            }
            for child in tree.children(id) {
                write_node(tree, *child, f)?;
            }
            Ok(())
        }
        write_node(self, self.root(), f)
    }
}
