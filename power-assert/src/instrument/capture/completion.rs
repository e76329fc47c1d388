//! Source completion
//!
//!     The dump's ranges end at the *start* of an expression's last token, and some of them
//!     stop short of what is needed to print the expression on its own: a subscript without
//!     its `]`, a call whose range stops before a trailing closure. Completion turns a raw
//!     range into a half-open span that covers complete tokens and balanced delimiters.
//!
//!     A span may only end at a boundary (see [boundary](super::boundary)). Completing a
//!     range picks the first boundary at or after the end of the range's last token that
//!     leaves every `(`, `[` and `{` in the span closed. Completing a completed span returns
//!     it unchanged.

use super::boundary;
use crate::instrument::ast::{Expression, SourceLocation, SourceRange};
use crate::instrument::source::{SourceToken, SourceTokenKind};
use std::collections::BTreeSet;

pub struct SourceCompletion<'a> {
    tokens: &'a [SourceToken],
    boundaries: BTreeSet<SourceLocation>,
    /// Between the assertion's parentheses.
    span: SourceRange,
}

impl<'a> SourceCompletion<'a> {
    pub fn new(tokens: &'a [SourceToken], span: SourceRange, arguments: &[Expression]) -> Self {
        let boundaries = boundary::collect(tokens, span, arguments);
        Self {
            tokens,
            boundaries,
            span,
        }
    }

    pub fn span(&self) -> SourceRange {
        self.span
    }

    pub fn boundaries(&self) -> &BTreeSet<SourceLocation> {
        &self.boundaries
    }

    /// End of the token starting at or containing `location`.
    pub fn token_end(&self, location: SourceLocation) -> SourceLocation {
        token_end(self.tokens, location)
    }

    /// Complete a half-open range.
    pub fn complete(&self, range: SourceRange) -> SourceRange {
        self.boundaries
            .range(range.end..)
            .find(|b| **b > range.start && self.balanced(SourceRange::new(range.start, **b)))
            .map_or(SourceRange::new(range.start, self.span.end), |b| {
                SourceRange::new(range.start, *b)
            })
    }

    /// Complete a range in the dump's convention, whose end is the start of its last token.
    pub fn complete_raw(&self, raw: SourceRange) -> SourceRange {
        self.complete(SourceRange::new(raw.start, self.token_end(raw.end)))
    }

    /// The tokens starting inside a half-open range.
    pub fn tokens_in(&self, range: SourceRange) -> &'a [SourceToken] {
        let low = self.tokens.partition_point(|t| t.location < range.start);
        let high = self.tokens.partition_point(|t| t.location < range.end);
        &self.tokens[low..high.max(low)]
    }

    /// Walk back from `start` over a postfix chain (`a.b?.c!`, `f(x).y`) to where it begins.
    pub fn extended_start(&self, start: SourceLocation) -> SourceLocation {
        let mut index = self.tokens.partition_point(|t| t.location < start);
        let mut depth = 0usize;
        while index > 0 {
            let previous = &self.tokens[index - 1];
            if previous.location < self.span.start {
                break;
            }
            if previous.is_closing() {
                depth += 1;
            } else if previous.is_opening() {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            } else if depth == 0 {
                let link = previous.is(".") || previous.is("?") || previous.is("!");
                let word = previous.kind == SourceTokenKind::Token
                    && !previous.is_punctuation()
                    && !previous.is_operator();
                if !link && !word {
                    break;
                }
            }
            index -= 1;
        }
        self.tokens.get(index).map_or(start, |t| t.location.min(start))
    }

    fn balanced(&self, range: SourceRange) -> bool {
        let mut depth = 0i32;
        for token in self.tokens_in(range) {
            if token.is_opening() {
                depth += 1;
            } else if token.is_closing() {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
        }
        depth == 0
    }
}

/// End of the token starting at or containing `location`; `location` itself when no token
/// covers it.
pub fn token_end(tokens: &[SourceToken], location: SourceLocation) -> SourceLocation {
    let index = tokens.partition_point(|t| t.end <= location);
    match tokens.get(index) {
        Some(token) if token.location <= location => token.end,
        _ => location,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instrument::ast::ExprId;
    use crate::instrument::source::tokenize;
    use proptest::prelude::*;

    fn loc(column: usize) -> SourceLocation {
        SourceLocation::new(0, column)
    }

    fn range(start: usize, end: usize) -> SourceRange {
        SourceRange::new(loc(start), loc(end))
    }

    const TEXT: &str = "XCTAssert(xs[i].count == f(a, b))";

    fn span() -> SourceRange {
        range(10, 32)
    }

    fn arguments() -> Vec<Expression> {
        vec![Expression::new(ExprId(0), "declref_expr").with_range(range(10, 10))]
    }

    #[test]
    fn test_token_end() {
        let tokens = tokenize(TEXT);
        assert_eq!(token_end(&tokens, loc(0)), loc(9));
        assert_eq!(token_end(&tokens, loc(4)), loc(9));
        assert_eq!(token_end(&tokens, loc(22)), loc(24));
        assert_eq!(token_end(&tokens, loc(99)), loc(99));
    }

    #[test]
    fn test_complete_raw_member() {
        let tokens = tokenize(TEXT);
        let completion = SourceCompletion::new(&tokens, span(), &arguments());
        // `xs[i].count`: the dump ends the range at `count`.
        assert_eq!(completion.complete_raw(range(10, 16)), range(10, 21));
    }

    #[test]
    fn test_complete_balances_delimiters() {
        let tokens = tokenize(TEXT);
        let completion = SourceCompletion::new(&tokens, span(), &arguments());
        // A subscript range stopping inside the brackets.
        assert_eq!(completion.complete(range(10, 13)), range(10, 15));
        // A call range stopping at its first argument.
        assert_eq!(completion.complete_raw(range(25, 27)), range(25, 32));
    }

    #[test]
    fn test_extended_start() {
        let text = "XCTAssert(a.b(c)!.d() == 1)";
        let tokens = tokenize(text);
        let completion = SourceCompletion::new(&tokens, range(10, 26), &[]);
        assert_eq!(completion.extended_start(loc(18)), loc(10));
        assert_eq!(completion.extended_start(loc(25)), loc(25));
    }

    proptest! {
        #[test]
        fn prop_complete_is_idempotent(start in 10usize..32, length in 0usize..22) {
            let tokens = tokenize(TEXT);
            let completion = SourceCompletion::new(&tokens, span(), &arguments());
            let end = (start + length).min(32);
            let once = completion.complete(range(start, end));
            prop_assert_eq!(completion.complete(once), once);
        }
    }
}
