//! Capture engine
//!
//!     For one assertion, find every sub-expression worth printing, its source text and the
//!     display column its value goes under:
//!
//!         XCTAssert(bar.val == bar.foo.val)
//!                   |   |   |  |   |   |
//!                   10  14  18 21  25  29
//!
//!     The work is split over:
//!
//!     - [boundary](boundary): the locations a captured span may end at.
//!     - [completion](completion): extends the dump's raw ranges into printable spans.
//!     - [captor](captor): walks the argument trees and decides what is captured, and where.
//!     - [conflict](conflict): resolves captures that land on the same column.
//!
//!     Columns are display widths into the assertion's single-line rendering (see
//!     [source::layout](crate::instrument::source::layout)), so a wrapped assertion and its
//!     diagram agree, and wide characters take two cells.

pub mod boundary;
pub mod captor;
pub mod completion;
pub mod conflict;

pub use captor::{anchor, Captor, CapturedExpression};
pub use completion::SourceCompletion;

use crate::instrument::ast::{SourceLocation, SourceRange};
use crate::instrument::locating::Assertion;
use crate::instrument::source::{display_width, layout, Formatted, SourceToken};

/// The source side of one assertion: its tokens from the callee through the closing `)`,
/// and its single-line rendering.
#[derive(Debug, Clone)]
pub struct AssertionContext {
    tokens: Vec<SourceToken>,
    open: usize,
    close: usize,
    formatted: Formatted,
}

impl AssertionContext {
    /// `None` when the call's parentheses cannot be found in the source tokens.
    pub fn new(assertion: &Assertion, source_tokens: &[SourceToken]) -> Option<Self> {
        let first = source_tokens.partition_point(|t| t.location < assertion.source_range.start);
        let rest = &source_tokens[first..];
        let open = rest.iter().position(|t| t.is("("))?;

        let mut depth = 0usize;
        let mut close = None;
        for (index, token) in rest.iter().enumerate().skip(open) {
            if token.is_opening() {
                depth += 1;
            } else if token.is_closing() {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    close = Some(index);
                    break;
                }
            }
        }
        let close = close?;

        let tokens = rest[..=close].to_vec();
        let formatted = layout(&tokens, None);
        Some(Self {
            tokens,
            open,
            close,
            formatted,
        })
    }

    /// Tokens from the callee through the closing parenthesis.
    pub fn tokens(&self) -> &[SourceToken] {
        &self.tokens
    }

    /// Tokens strictly between the call's parentheses.
    pub fn argument_tokens(&self) -> &[SourceToken] {
        &self.tokens[self.open + 1..self.close]
    }

    /// The whole call, from the callee to the end of `)`.
    pub fn range(&self) -> SourceRange {
        SourceRange::new(self.tokens[0].location, self.tokens[self.close].end)
    }

    /// From just after `(` to the start of `)`.
    pub fn arguments_span(&self) -> SourceRange {
        SourceRange::new(self.tokens[self.open].end, self.tokens[self.close].location)
    }

    /// The assertion on one line, unescaped.
    pub fn text(&self) -> &str {
        &self.formatted.text
    }

    /// Display column of a source location in [`text`](Self::text).
    pub fn column_of(&self, location: SourceLocation) -> Option<usize> {
        let offset = self.formatted.offset_of(location)?;
        let prefix: String = self.formatted.text.chars().take(offset).collect();
        Some(display_width(&prefix))
    }
}

/// Captures for one assertion, conflict-free and sorted by column.
///
/// Only the compared operands are walked; a trailing message is left as written.
pub fn capture(assertion: &Assertion, context: &AssertionContext) -> Vec<CapturedExpression> {
    let operands = &assertion.arguments[..assertion.kind.arity().min(assertion.arguments.len())];
    let completion = SourceCompletion::new(context.tokens(), context.arguments_span(), operands);
    let mut captor = Captor::new(context, &completion);
    for operand in operands {
        captor.visit(operand, None);
    }
    let captures = captor.finish();
    tracing::trace!(line = assertion.line_number, count = captures.len(), "captured");
    conflict::resolve(captures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instrument::ast::{ExprId, Expression};
    use crate::instrument::locating::{AssertKind, ComparisonOperator};
    use crate::instrument::source::tokenize;

    fn loc(column: usize) -> SourceLocation {
        SourceLocation::new(0, column)
    }

    fn range(start: usize, end: usize) -> SourceRange {
        SourceRange::new(loc(start), loc(end))
    }

    fn assertion(text_end: usize, arguments: Vec<Expression>) -> Assertion {
        Assertion {
            expression: Expression::new(ExprId(100), "call_expr").with_range(range(0, text_end)),
            argument_count: arguments.len(),
            arguments,
            kind: AssertKind::Boolean,
            op: ComparisonOperator::IsTrue,
            source_range: range(0, text_end),
            line_number: 1,
        }
    }

    /// `bar.val == bar.foo.val`, shaped the way the dump reports it.
    fn member_comparison() -> Expression {
        let bar = |id, column| {
            Expression::new(ExprId(id), "declref_expr")
                .with_range(range(column, column))
                .with_type("Bar")
                .with_decl("main.(file).test().bar@t.swift:14:13")
        };
        let member = |id, start, end, ty: &str, children| {
            Expression::new(ExprId(id), "member_ref_expr")
                .with_range(range(start, end))
                .with_type(ty)
                .with_children(children)
        };
        Expression::new(ExprId(1), "binary_expr")
            .with_range(range(10, 29))
            .with_location(loc(18))
            .with_type("Bool")
            .with_children(vec![
                Expression::new(ExprId(2), "dot_syntax_call_expr")
                    .implicit()
                    .with_range(range(18, 18))
                    .with_type("(Int, Int) -> Bool")
                    .with_children(vec![Expression::new(ExprId(3), "declref_expr")
                        .with_range(range(18, 18))
                        .with_type("(Int.Type) -> (Int, Int) -> Bool")
                        .with_decl("Swift.(file).Int extension.==")]),
                Expression::new(ExprId(4), "argument_list")
                    .implicit()
                    .with_children(vec![
                        member(5, 10, 14, "Int", vec![bar(6, 10)]),
                        member(
                            7,
                            21,
                            29,
                            "Int",
                            vec![member(8, 21, 25, "Foo", vec![bar(9, 21)])],
                        ),
                    ]),
            ])
    }

    #[test]
    fn test_context_of_wrapped_assertion() {
        let text = "    XCTAssert(\n        a ==\n        b)\n";
        let tokens = tokenize(text);
        let assertion = assertion(0, vec![]);
        let assertion = Assertion {
            source_range: SourceRange::new(SourceLocation::new(0, 4), SourceLocation::new(2, 9)),
            ..assertion
        };
        let context = AssertionContext::new(&assertion, &tokens).unwrap();
        assert_eq!(context.text(), "XCTAssert(a == b)");
        assert_eq!(
            context.arguments_span(),
            SourceRange::new(SourceLocation::new(0, 14), SourceLocation::new(2, 9))
        );
        assert_eq!(context.column_of(SourceLocation::new(1, 8)), Some(10));
        assert_eq!(context.column_of(SourceLocation::new(1, 10)), Some(12));
        assert_eq!(context.column_of(SourceLocation::new(2, 8)), Some(15));
    }

    #[test]
    fn test_columns_are_display_widths() {
        let text = "XCTAssert(\"日本\" == s)";
        let tokens = tokenize(text);
        let context = AssertionContext::new(&assertion(20, vec![]), &tokens).unwrap();
        // The literal spans four characters but six cells.
        assert_eq!(context.column_of(loc(15)), Some(17));
    }

    #[test]
    fn test_member_access_columns() {
        let text = "XCTAssert(bar.val == bar.foo.val)";
        let tokens = tokenize(text);
        let assertion = assertion(32, vec![member_comparison()]);
        let context = AssertionContext::new(&assertion, &tokens).unwrap();

        let captures: Vec<(String, usize)> = capture(&assertion, &context)
            .into_iter()
            .map(|c| (c.text, c.column))
            .collect();
        let expected = vec![
            ("bar", 10),
            ("bar.val", 14),
            ("bar.val == bar.foo.val", 18),
            ("bar", 21),
            ("bar.foo", 25),
            ("bar.foo.val", 29),
        ];
        assert_eq!(
            captures,
            expected
                .into_iter()
                .map(|(t, c)| (t.to_string(), c))
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_closures_are_not_entered() {
        let text = "XCTAssert(xs.contains { $0 > n })";
        let tokens = tokenize(text);
        let closure = Expression::new(ExprId(3), "closure_expr")
            .with_range(range(22, 31))
            .with_children(vec![Expression::new(ExprId(4), "declref_expr")
                .with_range(range(29, 29))
                .with_type("Int")]);
        let call = Expression::new(ExprId(1), "call_expr")
            .with_range(range(10, 31))
            .with_type("Bool")
            .with_children(vec![
                Expression::new(ExprId(2), "dot_syntax_call_expr")
                    .with_range(range(10, 13))
                    .with_type("((Int) -> Bool) -> Bool")
                    .with_children(vec![
                        Expression::new(ExprId(6), "declref_expr")
                            .with_range(range(13, 13))
                            .with_type("([Int]) -> ((Int) -> Bool) -> Bool")
                            .with_decl("Swift.(file).Sequence extension.contains(where:)"),
                        Expression::new(ExprId(5), "declref_expr")
                            .with_range(range(10, 10))
                            .with_type("[Int]"),
                    ]),
                closure,
            ]);
        let assertion = assertion(32, vec![call]);
        let context = AssertionContext::new(&assertion, &tokens).unwrap();
        let captures: Vec<(String, usize)> = capture(&assertion, &context)
            .into_iter()
            .map(|c| (c.text, c.column))
            .collect();
        assert_eq!(
            captures,
            vec![
                ("xs".to_string(), 10),
                ("xs.contains { $0 > n }".to_string(), 13)
            ]
        );
    }
}
