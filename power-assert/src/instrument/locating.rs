//! Assertion locator
//!
//!     Finds the assertion calls in every function body of the typed AST.
//!
//!     A call is an assertion when the declaration its callee resolves to is one of the
//!     signatures in [`SIGNATURES`], declared in one of the configured assertion modules:
//!
//!         XCTest.(file).XCTAssertEqual(_:_:_:file:line:)
//!         ^^^^^^        ^^^^^^^^^^^^^^
//!         module        signature
//!
//!     Matching is on the resolved declaration, never on the spelling in the source, so a
//!     user function that happens to be called `XCTAssert` is left alone.
//!
//!     Assertions come out in source traversal order, de-duplicated by source range. The
//!     subtree of a matched assertion is not searched again.

use crate::instrument::ast::{
    decl_base_name, find_first, traverse, Ast, ExprKind, Expression, SourceRange, Walk,
};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

/// The family of comparison an assertion performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssertKind {
    Boolean,
    Equality,
    Comparable,
    Nil,
}

impl AssertKind {
    /// Number of compared operands.
    pub fn arity(self) -> usize {
        match self {
            AssertKind::Boolean | AssertKind::Nil => 1,
            AssertKind::Equality | AssertKind::Comparable => 2,
        }
    }

    /// The recorder method the generated code calls.
    pub fn recorder_method(self) -> &'static str {
        match self {
            AssertKind::Boolean => "assertBoolean",
            AssertKind::Equality => "assertEquality",
            AssertKind::Comparable => "assertComparable",
            AssertKind::Nil => "assertNil",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOperator {
    IsTrue,
    IsFalse,
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    IsNil,
    IsNotNil,
}

impl ComparisonOperator {
    /// The enum case spelled in generated code.
    pub fn as_swift(self) -> &'static str {
        match self {
            ComparisonOperator::IsTrue => ".isTrue",
            ComparisonOperator::IsFalse => ".isFalse",
            ComparisonOperator::Equal => ".equal",
            ComparisonOperator::NotEqual => ".notEqual",
            ComparisonOperator::GreaterThan => ".greaterThan",
            ComparisonOperator::GreaterThanOrEqual => ".greaterThanOrEqual",
            ComparisonOperator::LessThan => ".lessThan",
            ComparisonOperator::LessThanOrEqual => ".lessThanOrEqual",
            ComparisonOperator::IsNil => ".isNil",
            ComparisonOperator::IsNotNil => ".isNotNil",
        }
    }

    /// Whether `lhs.cmp(rhs)` satisfies an ordering operator. `None` for the other operators.
    pub fn accepts(self, ordering: Ordering) -> Option<bool> {
        let accepted = match self {
            ComparisonOperator::GreaterThan => ordering == Ordering::Greater,
            ComparisonOperator::GreaterThanOrEqual => ordering != Ordering::Less,
            ComparisonOperator::LessThan => ordering == Ordering::Less,
            ComparisonOperator::LessThanOrEqual => ordering != Ordering::Greater,
            ComparisonOperator::Equal => ordering == Ordering::Equal,
            ComparisonOperator::NotEqual => ordering != Ordering::Equal,
            _ => return None,
        };
        Some(accepted)
    }
}

/// Known assertion functions.
pub const SIGNATURES: &[(&str, AssertKind, ComparisonOperator)] = &[
    ("XCTAssert", AssertKind::Boolean, ComparisonOperator::IsTrue),
    ("XCTAssertTrue", AssertKind::Boolean, ComparisonOperator::IsTrue),
    ("XCTAssertFalse", AssertKind::Boolean, ComparisonOperator::IsFalse),
    ("XCTAssertEqual", AssertKind::Equality, ComparisonOperator::Equal),
    ("XCTAssertNotEqual", AssertKind::Equality, ComparisonOperator::NotEqual),
    ("XCTAssertGreaterThan", AssertKind::Comparable, ComparisonOperator::GreaterThan),
    (
        "XCTAssertGreaterThanOrEqual",
        AssertKind::Comparable,
        ComparisonOperator::GreaterThanOrEqual,
    ),
    ("XCTAssertLessThan", AssertKind::Comparable, ComparisonOperator::LessThan),
    (
        "XCTAssertLessThanOrEqual",
        AssertKind::Comparable,
        ComparisonOperator::LessThanOrEqual,
    ),
    ("XCTAssertNil", AssertKind::Nil, ComparisonOperator::IsNil),
    ("XCTAssertNotNil", AssertKind::Nil, ComparisonOperator::IsNotNil),
];

/// Match a resolved declaration against the signature table.
pub fn match_signature<S: AsRef<str>>(
    decl: &str,
    modules: &[S],
) -> Option<(AssertKind, ComparisonOperator)> {
    let (module, _) = decl.split_once(".(file).")?;
    if !modules.iter().any(|m| m.as_ref() == module) {
        return None;
    }
    let name = decl_base_name(decl);
    SIGNATURES
        .iter()
        .find(|(signature, _, _)| *signature == name)
        .map(|(_, kind, op)| (*kind, *op))
}

/// One assertion call found in the AST.
#[derive(Debug, Clone, Serialize)]
pub struct Assertion {
    /// The whole call expression.
    pub expression: Expression,
    /// The user-written arguments, unwrapped from implicit conversions, defaults excluded.
    pub arguments: Vec<Expression>,
    pub argument_count: usize,
    pub kind: AssertKind,
    pub op: ComparisonOperator,
    /// Range of the call as reported by the dump.
    pub source_range: SourceRange,
    /// One-based line of the call's start.
    pub line_number: usize,
}

impl PartialEq for Assertion {
    fn eq(&self, other: &Self) -> bool {
        self.source_range == other.source_range
    }
}

impl Eq for Assertion {}

impl Hash for Assertion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source_range.hash(state);
    }
}

/// Every assertion in the AST, in traversal order.
pub fn locate<S: AsRef<str>>(ast: &Ast, modules: &[S]) -> Vec<Assertion> {
    let mut seen = HashSet::new();
    let mut assertions = Vec::new();

    for function in ast.functions() {
        for statement in &function.body {
            traverse(statement, &mut |expression: &Expression| {
                let Some(assertion) = as_assertion(expression, modules) else {
                    return Walk::Continue;
                };
                if seen.insert(assertion.source_range) {
                    tracing::debug!(
                        line = assertion.line_number,
                        kind = ?assertion.kind,
                        function = function.name.as_str(),
                        "found assertion"
                    );
                    assertions.push(assertion);
                }
                Walk::SkipChildren
            });
        }
    }
    assertions
}

fn as_assertion<S: AsRef<str>>(expression: &Expression, modules: &[S]) -> Option<Assertion> {
    if expression.kind != ExprKind::Call || expression.implicit {
        return None;
    }
    let callee = expression.callee()?;
    let decl = find_first(callee, &|e: &Expression| e.decl.is_some())?.decl.as_deref()?;
    let (kind, op) = match_signature(decl, modules)?;
    let source_range = expression.range?;

    let arguments = call_arguments(expression);
    Some(Assertion {
        expression: expression.clone(),
        argument_count: arguments.len(),
        arguments,
        kind,
        op,
        source_range,
        line_number: source_range.start.line + 1,
    })
}

/// The user-written arguments of a call.
///
/// Newer dumps wrap arguments in `argument_list`/`argument`; older ones pass a `paren_expr`
/// or `tuple_expr` as the second child.
pub fn call_arguments(call: &Expression) -> Vec<Expression> {
    let Some(list) = call.children.get(1) else {
        return Vec::new();
    };
    let raw: Vec<&Expression> = match list.kind {
        ExprKind::ArgumentList => list
            .children
            .iter()
            .filter_map(|argument| match argument.kind {
                ExprKind::Argument => argument.children.first(),
                _ => Some(argument),
            })
            .collect(),
        ExprKind::Tuple => list.children.iter().collect(),
        ExprKind::Paren => list.children.first().into_iter().collect(),
        _ => Vec::new(),
    };

    raw.into_iter()
        .map(unwrap_implicit)
        .filter(|argument| argument.kind != ExprKind::DefaultArgument && !argument.implicit)
        .cloned()
        .collect()
}

/// Look through implicit single-child wrappers such as `autoclosure_expr`.
fn unwrap_implicit(mut expression: &Expression) -> &Expression {
    while expression.implicit && expression.children.len() == 1 {
        expression = &expression.children[0];
    }
    expression
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instrument::ast::{ExprId, SourceLocation};
    use rstest::rstest;

    #[rstest]
    #[case("XCTest.(file).XCTAssert(_:_:file:line:)", Some((AssertKind::Boolean, ComparisonOperator::IsTrue)))]
    #[case("XCTest.(file).XCTAssertFalse(_:_:file:line:)", Some((AssertKind::Boolean, ComparisonOperator::IsFalse)))]
    #[case("XCTest.(file).XCTAssertEqual(_:_:_:file:line:)", Some((AssertKind::Equality, ComparisonOperator::Equal)))]
    #[case("XCTest.(file).XCTAssertLessThanOrEqual(_:_:_:file:line:)", Some((AssertKind::Comparable, ComparisonOperator::LessThanOrEqual)))]
    #[case("XCTest.(file).XCTAssertNotNil(_:_:file:line:)", Some((AssertKind::Nil, ComparisonOperator::IsNotNil)))]
    #[case("main.(file).XCTAssert(_:)", None)]
    #[case("XCTest.(file).XCTFail(_:file:line:)", None)]
    fn test_match_signature(
        #[case] decl: &str,
        #[case] expected: Option<(AssertKind, ComparisonOperator)>,
    ) {
        assert_eq!(match_signature(decl, &["XCTest"]), expected);
    }

    #[test]
    fn test_custom_module() {
        let decl = "Testing.(file).XCTAssert(_:_:file:line:)";
        assert!(match_signature(decl, &["XCTest"]).is_none());
        assert!(match_signature(decl, &["XCTest", "Testing"]).is_some());
    }

    #[test]
    fn test_ordering_operators() {
        assert_eq!(ComparisonOperator::GreaterThan.accepts(Ordering::Greater), Some(true));
        assert_eq!(ComparisonOperator::LessThanOrEqual.accepts(Ordering::Greater), Some(false));
        assert_eq!(ComparisonOperator::IsNil.accepts(Ordering::Equal), None);
    }

    fn range(line: usize, start: usize, end: usize) -> SourceRange {
        SourceRange::new(SourceLocation::new(line, start), SourceLocation::new(line, end))
    }

    #[test]
    fn test_call_arguments_unwraps_and_skips_defaults() {
        let lhs = Expression::new(ExprId(4), "declref_expr").with_range(range(0, 10, 10));
        let rhs = Expression::new(ExprId(6), "integer_literal_expr").with_range(range(0, 15, 15));
        let call = Expression::new(ExprId(0), "call_expr")
            .with_range(range(0, 0, 16))
            .with_children(vec![
                Expression::new(ExprId(1), "declref_expr")
                    .with_decl("XCTest.(file).XCTAssertEqual(_:_:_:file:line:)"),
                Expression::new(ExprId(2), "argument_list").with_children(vec![
                    Expression::new(ExprId(3), "argument").with_children(vec![
                        Expression::new(ExprId(7), "autoclosure_expr")
                            .implicit()
                            .with_children(vec![lhs.clone()]),
                    ]),
                    Expression::new(ExprId(5), "argument").with_children(vec![rhs.clone()]),
                    Expression::new(ExprId(8), "argument").with_children(vec![
                        Expression::new(ExprId(9), "default_argument_expr").implicit(),
                    ]),
                ]),
            ]);

        assert_eq!(call_arguments(&call), vec![lhs, rhs]);

        let ast = Ast {
            declarations: vec![crate::instrument::ast::Declaration::Function(
                crate::instrument::ast::FunctionDecl {
                    access: Default::default(),
                    name: "test()".into(),
                    parameters: Vec::new(),
                    result: None,
                    body: vec![call.clone(), call],
                    range: None,
                },
            )],
        };
        let assertions = locate(&ast, &["XCTest"]);
        assert_eq!(assertions.len(), 1);
        assert_eq!(assertions[0].kind, AssertKind::Equality);
        assert_eq!(assertions[0].argument_count, 2);
        assert_eq!(assertions[0].line_number, 1);
    }
}
