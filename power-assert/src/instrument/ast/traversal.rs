//! Read-only traversal helpers
//!
//! Free functions rather than methods: both the locator and the capture engine walk the same
//! trees, and the helpers work for any node type implementing [`TreeNode`].

use super::expression::{ExprKind, Expression};

/// A node with ordered children.
pub trait TreeNode: Sized {
    fn child_nodes(&self) -> &[Self];
}

impl TreeNode for Expression {
    fn child_nodes(&self) -> &[Self] {
        &self.children
    }
}

/// What a visitor wants after seeing a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    Continue,
    SkipChildren,
}

/// Pre-order traversal.
pub fn traverse<T: TreeNode>(node: &T, visit: &mut impl FnMut(&T) -> Walk) {
    if visit(node) == Walk::Continue {
        for child in node.child_nodes() {
            traverse(child, visit);
        }
    }
}

/// The first node, in pre-order, satisfying `predicate`.
pub fn find_first<'a, T: TreeNode>(node: &'a T, predicate: &impl Fn(&T) -> bool) -> Option<&'a T> {
    if predicate(node) {
        return Some(node);
    }
    node.child_nodes()
        .iter()
        .find_map(|child| find_first(child, predicate))
}

/// The nearest ancestor satisfying `predicate` of the first node satisfying `target`.
pub fn find_first_parent<'a, T: TreeNode>(
    root: &'a T,
    target: &impl Fn(&T) -> bool,
    predicate: &impl Fn(&T) -> bool,
) -> Option<&'a T> {
    fn walk<'a, T: TreeNode>(
        node: &'a T,
        ancestors: &mut Vec<&'a T>,
        target: &impl Fn(&T) -> bool,
        predicate: &impl Fn(&T) -> bool,
    ) -> Option<Option<&'a T>> {
        if target(node) {
            return Some(ancestors.iter().rev().find(|a| predicate(a)).copied());
        }
        ancestors.push(node);
        for child in node.child_nodes() {
            if let Some(found) = walk(child, ancestors, target, predicate) {
                return Some(found);
            }
        }
        ancestors.pop();
        None
    }
    walk(root, &mut Vec::new(), target, predicate).flatten()
}

/// Whether any node of the subtree satisfies `predicate`, without entering closures.
pub fn any_outside_closures(node: &Expression, predicate: &impl Fn(&Expression) -> bool) -> bool {
    let mut found = false;
    traverse(node, &mut |e: &Expression| {
        if found || e.kind == ExprKind::Closure {
            return Walk::SkipChildren;
        }
        found = predicate(e);
        Walk::Continue
    });
    found
}
