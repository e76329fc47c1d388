//! Code generator
//!
//!     Builds the code that replaces one assertion. The assertion's own arguments are kept as
//!     written (flattened to one line) and handed to the recorder method matching the
//!     assertion kind; every capture adds a `record` call:
//!
//!         PowerAssert.Recorder("XCTAssert(a == b)", line: 12)
//!             .assertBoolean(a == b, op: .isTrue)
//!             .record(expression: a, column: 10)
//!             .record(expression: a == b, column: 12)
//!             .record(expression: b, column: 15)
//!             .render()
//!
//!     (shown wrapped; the generated code is one line). Long chains slow the type checker
//!     down badly, as do closures passed to higher-order functions inside one expression, so
//!     past a capture count, or when an argument calls one of those functions, the recorder
//!     is bound to a variable and each `record` becomes its own statement:
//!
//!         do { let __pa_12_5 = PowerAssert.Recorder(...).assertBoolean(...); _ = __pa_12_5.record(...); __pa_12_5.render() }

use crate::instrument::ast::{find_first, Expression, SourceRange};
use crate::instrument::capture::{AssertionContext, CapturedExpression};
use crate::instrument::locating::Assertion;
use crate::instrument::source::{escape, layout, SourceToken, SourceTokenKind};

use super::replacement::Replacement;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Type the generated code constructs.
    pub recorder: String,
    /// Prefix of the recorder variable in the multi-statement form.
    pub variable_prefix: String,
    /// More captures than this switch to the multi-statement form.
    pub max_inline_captures: usize,
    /// Functions whose presence in an argument switches to the multi-statement form.
    pub higher_order_functions: Vec<String>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            recorder: "PowerAssert.Recorder".to_string(),
            variable_prefix: "__pa_".to_string(),
            max_inline_captures: 30,
            higher_order_functions: ["map", "flatMap", "compactMap", "filter", "reduce"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// The replacement for one assertion; `None` when its operands cannot be found in the source.
pub fn generate(
    assertion: &Assertion,
    context: &AssertionContext,
    captures: &[CapturedExpression],
    options: &GeneratorOptions,
) -> Option<Replacement> {
    let pieces: Vec<String> = argument_pieces(context.argument_tokens(), &assertion.arguments)
        .into_iter()
        .map(|piece| render_piece(piece, &assertion.arguments))
        .collect();
    let arity = assertion.kind.arity();
    if pieces.len() < arity {
        tracing::debug!(
            line = assertion.line_number,
            found = pieces.len(),
            arity,
            "missing operands, assertion left as is"
        );
        return None;
    }

    let message = pieces
        .get(arity)
        .map(|m| format!(", message: {}", m))
        .unwrap_or_default();
    let head = format!(
        "{}(\"{}\", line: {}).{}({}, op: {}{})",
        options.recorder,
        escape(context.text()),
        assertion.line_number,
        assertion.kind.recorder_method(),
        pieces[..arity].join(", "),
        assertion.op.as_swift(),
        message,
    );
    let record = |capture: &CapturedExpression| {
        format!(
            "record(expression: {}, column: {})",
            capture.text, capture.column
        )
    };

    let inline = captures.len() <= options.max_inline_captures
        && !calls_higher_order(&assertion.arguments, &options.higher_order_functions);
    let code = if inline {
        let records: String = captures.iter().map(|c| format!(".{}", record(c))).collect();
        format!("{}{}.render()", head, records)
    } else {
        let variable = format!(
            "{}{}_{}",
            options.variable_prefix,
            assertion.line_number,
            assertion.source_range.start.column + 1
        );
        let mut statements = vec![format!("let {} = {}", variable, head)];
        statements.extend(captures.iter().map(|c| format!("_ = {}.{}", variable, record(c))));
        statements.push(format!("{}.render()", variable));
        format!("do {{ {} }}", statements.join("; "))
    };
    Some(Replacement::new(context.range(), &code))
}

/// Split argument tokens at top-level commas, dropping surrounding trivia and the
/// `file:` and `line:` arguments.
///
/// A comma inside the dump range of one of `arguments` never separates. Without ranges for
/// every argument, commas inside generic argument clauses (`Dictionary<String, Int>()`) are
/// recognized from the source alone: a `<` written directly after a capitalized name opens
/// a clause and `>` closes one.
pub fn argument_pieces<'t>(
    tokens: &'t [SourceToken],
    arguments: &[Expression],
) -> Vec<&'t [SourceToken]> {
    let ranges: Option<Vec<SourceRange>> = arguments.iter().map(|a| a.range).collect();
    let ranges = ranges.filter(|ranges| !ranges.is_empty());

    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut generics = 0usize;
    let mut start = 0;
    for (index, token) in tokens.iter().enumerate() {
        if token.is_opening() {
            depth += 1;
        } else if token.is_closing() {
            depth = depth.saturating_sub(1);
        } else if ranges.is_none() && opens_generic_clause(tokens, index) {
            generics += 1;
        } else if generics > 0 && closes_generic_clause(token) {
            generics = generics.saturating_sub(token.text.chars().count());
        } else if depth == 0 && token.is(",") {
            let separates = match &ranges {
                Some(ranges) => !ranges
                    .iter()
                    .any(|r| r.start < token.location && token.location < r.end),
                None => generics == 0,
            };
            if separates {
                pieces.push(&tokens[start..index]);
                start = index + 1;
            }
        }
    }
    pieces.push(&tokens[start..]);

    pieces
        .into_iter()
        .map(trim_trivia)
        .filter(|piece| !piece.is_empty() && !is_location_argument(piece))
        .collect()
}

fn opens_generic_clause(tokens: &[SourceToken], index: usize) -> bool {
    let token = &tokens[index];
    if !token.is("<") || index == 0 {
        return false;
    }
    let previous = &tokens[index - 1];
    previous.kind == SourceTokenKind::Token
        && previous.end == token.location
        && previous.text.starts_with(|c: char| c.is_uppercase())
}

fn closes_generic_clause(token: &SourceToken) -> bool {
    token.kind == SourceTokenKind::Token
        && !token.text.is_empty()
        && token.text.chars().all(|c| c == '>')
}

fn trim_trivia(piece: &[SourceToken]) -> &[SourceToken] {
    let start = piece.iter().position(|t| !t.is_trivia()).unwrap_or(piece.len());
    let end = piece.iter().rposition(|t| !t.is_trivia()).map_or(start, |i| i + 1);
    &piece[start..end.max(start)]
}

fn is_location_argument(piece: &[SourceToken]) -> bool {
    let mut significant = piece.iter().filter(|t| !t.is_trivia());
    let label = significant.next();
    let colon = significant.next();
    label.is_some_and(|l| l.is("file") || l.is("line")) && colon.is_some_and(|c| c.is(":"))
}

fn render_piece(piece: &[SourceToken], arguments: &[Expression]) -> String {
    let hint = piece.first().and_then(|first| {
        let end = piece.last().map_or(first.end, |t| t.end);
        arguments
            .iter()
            .find(|a| a.range.is_some_and(|r| first.location <= r.start && r.start < end))
    });
    layout(piece, hint).text
}

fn calls_higher_order(arguments: &[Expression], names: &[String]) -> bool {
    arguments.iter().any(|argument| {
        find_first(argument, &|e: &Expression| {
            e.decl_name()
                .is_some_and(|name| names.iter().any(|n| n == name))
        })
        .is_some()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instrument::ast::{ExprId, ExprKind, SourceLocation, SourceRange};
    use crate::instrument::locating::{AssertKind, ComparisonOperator};
    use crate::instrument::source::{format, tokenize};

    fn assertion(
        kind: AssertKind,
        op: ComparisonOperator,
        start: SourceLocation,
        arguments: Vec<Expression>,
    ) -> Assertion {
        Assertion {
            expression: Expression::new(ExprId(0), "call_expr"),
            argument_count: arguments.len(),
            arguments,
            kind,
            op,
            source_range: SourceRange::new(start, start),
            line_number: start.line + 1,
        }
    }

    fn capture(text: &str, column: usize) -> CapturedExpression {
        CapturedExpression {
            text: text.to_string(),
            column,
            span: SourceRange::ZERO,
            expression: ExprId(0),
            kind: ExprKind::DeclRef,
        }
    }

    #[test]
    fn test_argument_pieces() {
        let tokens = tokenize("f(a, g(b, c), [1, 2], file: #file, line: 3)");
        let inner = &tokens[2..tokens.len() - 1];
        let pieces: Vec<String> = argument_pieces(inner, &[]).into_iter().map(format).collect();
        assert_eq!(pieces, vec!["a", "g(b, c)", "[1, 2]"]);
    }

    fn pieces_of(text: &str, arguments: &[Expression]) -> Vec<String> {
        let tokens = tokenize(text);
        let inner = &tokens[2..tokens.len() - 1];
        argument_pieces(inner, arguments).into_iter().map(format).collect()
    }

    #[test]
    fn test_generic_clause_commas_without_ranges() {
        assert_eq!(
            pieces_of("f(Dictionary<String, Int>(), d)", &[]),
            vec!["Dictionary<String, Int>()", "d"]
        );
        assert_eq!(
            pieces_of("f(Array<Set<Pair<A, B>>>(), e, \"m\")", &[]),
            vec!["Array<Set<Pair<A, B>>>()", "e", "\"m\""]
        );
        assert_eq!(pieces_of("f(a<b, c > d)", &[]), vec!["a<b", "c > d"]);
    }

    #[test]
    fn test_argument_ranges_decide_separators() {
        let argument = |start: usize, end: usize| {
            Expression::new(ExprId(1), "call_expr")
                .with_range(SourceRange::new(SourceLocation::new(0, start), SourceLocation::new(0, end)))
        };
        // f(Dictionary<String, Int>(), d)
        let arguments = vec![argument(2, 26), argument(29, 29)];
        assert_eq!(
            pieces_of("f(Dictionary<String, Int>(), d)", &arguments),
            vec!["Dictionary<String, Int>()", "d"]
        );
        // f(a<b, c > d): the comparison and its message are separate arguments.
        let arguments = vec![argument(2, 4), argument(7, 11)];
        assert_eq!(pieces_of("f(a<b, c > d)", &arguments), vec!["a<b", "c > d"]);
    }

    #[test]
    fn test_inline_equality_with_message() {
        let text = "XCTAssertEqual(a.count, 3, \"message\")";
        let tokens = tokenize(text);
        let assertion = assertion(
            AssertKind::Equality,
            ComparisonOperator::Equal,
            SourceLocation::new(0, 0),
            vec![],
        );
        let context = AssertionContext::new(&assertion, &tokens).unwrap();
        let captures = vec![capture("a", 15), capture("a.count", 17)];
        let replacement =
            generate(&assertion, &context, &captures, &GeneratorOptions::default()).unwrap();
        assert_eq!(
            replacement.text,
            r#"PowerAssert.Recorder("XCTAssertEqual(a.count, 3, \"message\")", line: 1).assertEquality(a.count, 3, op: .equal, message: "message").record(expression: a, column: 15).record(expression: a.count, column: 17).render()"#
        );
        assert_eq!(replacement.range, context.range());
    }

    #[test]
    fn test_location_arguments_are_dropped() {
        let tokens = tokenize("XCTAssertFalse(flag, file: f, line: 3)");
        let assertion = assertion(
            AssertKind::Boolean,
            ComparisonOperator::IsFalse,
            SourceLocation::new(0, 0),
            vec![],
        );
        let context = AssertionContext::new(&assertion, &tokens).unwrap();
        let replacement = generate(&assertion, &context, &[], &GeneratorOptions::default()).unwrap();
        assert!(replacement
            .text
            .ends_with(".assertBoolean(flag, op: .isFalse).render()"));
    }

    #[test]
    fn test_missing_operands() {
        let tokens = tokenize("XCTAssertEqual(a)");
        let assertion = assertion(
            AssertKind::Equality,
            ComparisonOperator::Equal,
            SourceLocation::new(0, 0),
            vec![],
        );
        let context = AssertionContext::new(&assertion, &tokens).unwrap();
        assert!(generate(&assertion, &context, &[], &GeneratorOptions::default()).is_none());
    }

    #[test]
    fn test_higher_order_function_uses_statements() {
        let text = "\n\n\n\n        XCTAssertEqual(xs.map { $0 * 2 }, ys)\n";
        let tokens = tokenize(text);
        let map = Expression::new(ExprId(1), "call_expr")
            .with_range(SourceRange::new(SourceLocation::new(4, 23), SourceLocation::new(4, 39)))
            .with_children(vec![Expression::new(ExprId(2), "declref_expr")
                .with_decl("Swift.(file).Sequence extension.map")]);
        let assertion = assertion(
            AssertKind::Equality,
            ComparisonOperator::Equal,
            SourceLocation::new(4, 8),
            vec![map],
        );
        let context = AssertionContext::new(&assertion, &tokens).unwrap();
        let replacement = generate(
            &assertion,
            &context,
            &[capture("xs", 15)],
            &GeneratorOptions::default(),
        )
        .unwrap();
        insta::assert_snapshot!(replacement.text, @r#"do { let __pa_5_9 = PowerAssert.Recorder("XCTAssertEqual(xs.map { $0 * 2 }, ys)", line: 5).assertEquality(xs.map { $0 * 2 }, ys, op: .equal); _ = __pa_5_9.record(expression: xs, column: 15); __pa_5_9.render() }"#);
    }

    #[test]
    fn test_capture_threshold_uses_statements() {
        let tokens = tokenize("XCTAssert(a)");
        let assertion = assertion(
            AssertKind::Boolean,
            ComparisonOperator::IsTrue,
            SourceLocation::new(0, 0),
            vec![],
        );
        let context = AssertionContext::new(&assertion, &tokens).unwrap();
        let options = GeneratorOptions {
            max_inline_captures: 0,
            variable_prefix: "v".to_string(),
            ..GeneratorOptions::default()
        };
        let replacement = generate(&assertion, &context, &[capture("a", 10)], &options).unwrap();
        assert!(replacement.text.starts_with("do { let v1_1 = "));
        assert!(replacement.text.ends_with("; _ = v1_1.record(expression: a, column: 10); v1_1.render() }"));
    }

    #[test]
    fn test_wrapped_assertion_keeps_line_count() {
        let tokens = tokenize("XCTAssert(\n    a\n)");
        let assertion = assertion(
            AssertKind::Boolean,
            ComparisonOperator::IsTrue,
            SourceLocation::new(0, 0),
            vec![],
        );
        let context = AssertionContext::new(&assertion, &tokens).unwrap();
        let replacement = generate(&assertion, &context, &[], &GeneratorOptions::default()).unwrap();
        assert!(replacement.text.contains("(\"XCTAssert(a)\", line: 1)"));
        assert!(replacement.text.ends_with(".render()\n\n"));
    }
}
