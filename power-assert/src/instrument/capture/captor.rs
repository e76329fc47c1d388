//! Argument captor
//!
//!     Walks the expression tree of every assertion argument and decides, node by node, what
//!     gets recorded at runtime: the node's printable source text and the column its value is
//!     printed under.
//!
//!     Captured kinds: variable references that are not functions, member accesses that are not
//!     `@lvalue`, `inout` or pointer typed, calls, subscripts, binary and ternary expressions,
//!     collection and object literals, magic literals (`#line`), `.self`, tuple elements, key
//!     paths, and implicit members (`.red`, printed as `(.red as Color)`).
//!
//!     Implicit nodes are never captured but are looked through. Closures end the walk: their
//!     bodies run in a different scope than the recorder.

use super::completion::SourceCompletion;
use super::AssertionContext;
use crate::instrument::ast::{any_outside_closures, traverse, ExprId, ExprKind, Expression};
use crate::instrument::ast::{SourceLocation, SourceRange, Walk};
use crate::instrument::source::format_with_hint;
use serde::Serialize;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// One sub-expression recorded by the generated code.
///
/// Equality, hashing and ordering use the column only.
#[derive(Debug, Clone, Serialize)]
pub struct CapturedExpression {
    /// Source text, single-line, as it is recorded.
    pub text: String,
    /// Display column in the flattened assertion text.
    pub column: usize,
    /// The completed source span the text was taken from.
    pub span: SourceRange,
    pub expression: ExprId,
    pub kind: ExprKind,
}

impl PartialEq for CapturedExpression {
    fn eq(&self, other: &Self) -> bool {
        self.column == other.column
    }
}

impl Eq for CapturedExpression {}

impl Hash for CapturedExpression {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.column.hash(state);
    }
}

impl PartialOrd for CapturedExpression {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CapturedExpression {
    fn cmp(&self, other: &Self) -> Ordering {
        self.column.cmp(&other.column)
    }
}

pub struct Captor<'c, 'a> {
    context: &'c AssertionContext,
    completion: &'c SourceCompletion<'a>,
    captures: Vec<CapturedExpression>,
}

impl<'c, 'a> Captor<'c, 'a> {
    pub fn new(context: &'c AssertionContext, completion: &'c SourceCompletion<'a>) -> Self {
        Self {
            context,
            completion,
            captures: Vec::new(),
        }
    }

    /// Captures in visit order.
    pub fn finish(self) -> Vec<CapturedExpression> {
        self.captures
    }

    pub fn visit(&mut self, expression: &Expression, parent: Option<&Expression>) {
        if expression.kind == ExprKind::Closure {
            return;
        }
        if !expression.implicit && is_captureable(expression, parent) {
            if let Some(capture) = self.capture(expression) {
                self.captures.push(capture);
            }
        }
        for child in &expression.children {
            self.visit(child, Some(expression));
        }
    }

    fn capture(&self, expression: &Expression) -> Option<CapturedExpression> {
        let Some(raw) = self.raw_range(expression) else {
            tracing::debug!(kind = %expression.raw_kind, "no range, not captured");
            return None;
        };
        let span = self.completion.complete_raw(raw);
        if !self.completion.span().encloses(&span) {
            tracing::debug!(kind = %expression.raw_kind, %span, "span outside the arguments");
            return None;
        }

        let text = format_with_hint(self.completion.tokens_in(span), expression);
        if text.is_empty() || text.starts_with(['#', '?', '!']) {
            return None;
        }
        let text = match (&expression.ty, text.starts_with('.')) {
            (Some(ty), true) => format!("({} as {})", text, ty),
            _ => text,
        };
        let text = if any_outside_closures(expression, &|e: &Expression| e.throws) {
            format!("try {}", text)
        } else {
            text
        };

        let Some(column) = anchor(expression).and_then(|a| self.context.column_of(a)) else {
            tracing::debug!(kind = %expression.raw_kind, "no column, not captured");
            return None;
        };
        Some(CapturedExpression {
            text,
            column,
            span,
            expression: expression.id,
            kind: expression.kind.clone(),
        })
    }

    /// The range to complete, before completion.
    fn raw_range(&self, expression: &Expression) -> Option<SourceRange> {
        let range = expression.range?;
        match expression.kind {
            ExprKind::Binary | ExprKind::PrefixUnary => Some(widest_range(expression)),
            ExprKind::Call => {
                let callee_start = expression.callee().and_then(|c| c.range).map(|r| r.start);
                match callee_start {
                    Some(start) if start < range.start => Some(SourceRange::new(
                        self.completion.extended_start(range.start),
                        range.end,
                    )),
                    _ => Some(range),
                }
            }
            _ => Some(range),
        }
    }
}

fn is_captureable(expression: &Expression, parent: Option<&Expression>) -> bool {
    match expression.kind {
        ExprKind::DeclRef => {
            let is_callee = parent
                .and_then(|p| p.callee())
                .is_some_and(|callee| callee.id == expression.id);
            !expression.is_function_typed() && !is_callee
        }
        ExprKind::MemberRef => !expression.is_reference_typed(),
        ExprKind::DotSyntaxCall => !expression.is_function_typed(),
        ExprKind::MagicLiteral
        | ExprKind::Call
        | ExprKind::Subscript
        | ExprKind::Binary
        | ExprKind::Ternary
        | ExprKind::ArrayLiteral
        | ExprKind::DictionaryLiteral
        | ExprKind::ObjectLiteral
        | ExprKind::DotSelf
        | ExprKind::TupleElement
        | ExprKind::KeyPath => true,
        _ => false,
    }
}

/// Bounding box of every range in the subtree.
fn widest_range(expression: &Expression) -> SourceRange {
    let mut ranges = Vec::new();
    traverse(expression, &mut |e: &Expression| {
        ranges.extend(e.range);
        Walk::Continue
    });
    SourceRange::bounding_box(ranges.iter()).unwrap_or_default()
}

/// The location whose column the value is printed under.
pub fn anchor(expression: &Expression) -> Option<SourceLocation> {
    let start = expression.range.map(|r| r.start);
    match expression.kind {
        ExprKind::MemberRef
        | ExprKind::DotSyntaxCall
        | ExprKind::TupleElement
        | ExprKind::DotSelf => expression.range.map(|r| r.end),
        ExprKind::Binary | ExprKind::Ternary | ExprKind::Subscript => {
            expression.location.or(start)
        }
        ExprKind::Call => expression.callee().and_then(anchor).or(start),
        _ => start,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instrument::ast::SourceLocation;

    fn loc(column: usize) -> SourceLocation {
        SourceLocation::new(0, column)
    }

    fn ranged(id: usize, raw: &str, start: usize, end: usize) -> Expression {
        Expression::new(ExprId(id), raw).with_range(SourceRange::new(loc(start), loc(end)))
    }

    #[test]
    fn test_anchors() {
        let member = ranged(0, "member_ref_expr", 10, 14);
        assert_eq!(anchor(&member), Some(loc(14)));

        let binary = ranged(1, "binary_expr", 10, 29).with_location(loc(18));
        assert_eq!(anchor(&binary), Some(loc(18)));

        let method = ranged(2, "dot_syntax_call_expr", 10, 14);
        let call = ranged(3, "call_expr", 10, 18).with_children(vec![method]);
        assert_eq!(anchor(&call), Some(loc(14)));

        let reference = ranged(4, "declref_expr", 21, 21);
        assert_eq!(anchor(&reference), Some(loc(21)));
    }

    #[test]
    fn test_captureability() {
        let function = ranged(0, "declref_expr", 0, 0).with_type("(Int) -> Int");
        assert!(!is_captureable(&function, None));

        let value = ranged(1, "declref_expr", 2, 2).with_type("Int");
        assert!(is_captureable(&value, None));

        let call = ranged(2, "call_expr", 0, 4).with_children(vec![value.clone()]);
        assert!(!is_captureable(&value, Some(&call)));

        let lvalue = ranged(3, "member_ref_expr", 0, 2).with_type("@lvalue Int");
        assert!(!is_captureable(&lvalue, None));

        assert!(is_captureable(&ranged(4, "keypath_expr", 0, 2), None));
        assert!(!is_captureable(&ranged(5, "integer_literal_expr", 0, 0), None));
        assert!(!is_captureable(&ranged(6, "closure_expr", 0, 9), None));
    }

    #[test]
    fn test_widest_range() {
        let binary = ranged(0, "binary_expr", 14, 22).with_children(vec![
            ranged(1, "declref_expr", 10, 10),
            ranged(2, "member_ref_expr", 25, 33),
        ]);
        assert_eq!(widest_range(&binary), SourceRange::new(loc(10), loc(33)));
    }

    #[test]
    fn test_captures_compare_by_column() {
        let capture = |text: &str, column| CapturedExpression {
            text: text.to_string(),
            column,
            span: SourceRange::ZERO,
            expression: ExprId(0),
            kind: ExprKind::DeclRef,
        };
        assert_eq!(capture("a", 3), capture("b", 3));
        assert!(capture("z", 1) < capture("a", 2));
    }
}
