//! Span boundaries
//!
//! Locations inside an assertion where a captured span may end:
//!
//! - from the AST: the start of every variable reference, the start and end of every
//!   explicit call, the `.` before every member name, the start of every string literal,
//!   and the end of every parenthesized expression or tuple
//! - from the source: the start of every punctuation, whitespace, line break, indentation
//!   and string token, and the end of every string token
//! - the end of the argument span

use super::completion::token_end;
use crate::instrument::ast::{traverse, ExprKind, Expression, SourceLocation, SourceRange, Walk};
use crate::instrument::source::SourceToken;
use std::collections::BTreeSet;

pub fn collect(
    tokens: &[SourceToken],
    span: SourceRange,
    arguments: &[Expression],
) -> BTreeSet<SourceLocation> {
    let mut boundaries = BTreeSet::new();
    let inside = |location: SourceLocation| span.start <= location && location <= span.end;

    for token in tokens.iter().filter(|t| inside(t.location)) {
        if token.is_punctuation() || token.is_trivia() || token.is_string() {
            boundaries.insert(token.location);
        }
        if token.is_string() && inside(token.end) {
            boundaries.insert(token.end);
        }
    }

    for argument in arguments {
        traverse(argument, &mut |e: &Expression| {
            let Some(range) = e.range else {
                return Walk::Continue;
            };
            match e.kind {
                ExprKind::DeclRef => {
                    boundaries.insert(range.start);
                }
                ExprKind::Call if !e.implicit => {
                    boundaries.insert(range.start);
                    boundaries.insert(token_end(tokens, range.end));
                }
                ExprKind::MemberRef | ExprKind::DotSyntaxCall if range.end.column > 0 => {
                    boundaries.insert(range.end.retreated(1));
                }
                ExprKind::StringLiteral | ExprKind::InterpolatedStringLiteral => {
                    boundaries.insert(range.start);
                }
                ExprKind::Paren | ExprKind::Tuple => {
                    boundaries.insert(token_end(tokens, range.end));
                }
                _ => {}
            }
            Walk::Continue
        });
    }

    boundaries.retain(|b| inside(*b));
    boundaries.insert(span.end);
    boundaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instrument::ast::ExprId;
    use crate::instrument::source::tokenize;

    fn loc(column: usize) -> SourceLocation {
        SourceLocation::new(0, column)
    }

    #[test]
    fn test_boundaries_of_member_access() {
        let text = "XCTAssert(bar.val == bar.foo.val)";
        let tokens = tokenize(text);
        let span = SourceRange::new(loc(10), loc(32));
        let member = Expression::new(ExprId(1), "member_ref_expr")
            .with_range(SourceRange::new(loc(10), loc(14)))
            .with_children(vec![Expression::new(ExprId(2), "declref_expr")
                .with_range(SourceRange::new(loc(10), loc(10)))]);
        let boundaries: Vec<_> = collect(&tokens, span, &[member])
            .into_iter()
            .map(|b| b.column)
            .collect();
        // bar, `.`, ` `, ` `, `.`, `.`, `)`
        assert_eq!(boundaries, vec![10, 13, 17, 20, 24, 28, 32]);
    }

    #[test]
    fn test_string_ends_are_boundaries() {
        let text = "XCTAssertEqual(\"a\" + s, t)";
        let tokens = tokenize(text);
        let span = SourceRange::new(loc(15), loc(25));
        let boundaries = collect(&tokens, span, &[]);
        assert!(boundaries.contains(&loc(15)));
        assert!(boundaries.contains(&loc(18)));
    }
}
