//! Typed AST
//!
//!     The parser turns the dump tree into [`Declaration`]s, and function bodies into
//!     [`Expression`] trees. Both are immutable once built; later stages only read them through
//!     the helpers in [traversal](traversal).

pub mod declaration;
pub mod expression;
pub mod range;
pub mod traversal;

pub use declaration::{
    AccessLevel, Ast, Declaration, FunctionDecl, ImportDecl, Parameter, TypeDecl,
};
pub use expression::{decl_base_name, ExprId, ExprKind, Expression};
pub use range::{SourceLocation, SourceRange};
pub use traversal::{any_outside_closures, find_first, find_first_parent, traverse, TreeNode, Walk};
