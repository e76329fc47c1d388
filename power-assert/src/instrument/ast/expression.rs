//! Expression nodes
//!
//!     Every parenthesized node found below a function body becomes an [`Expression`]: real
//!     expressions, but also statements and local declarations (`brace_stmt`,
//!     `pattern_binding_decl`, ...). The raw kind string is always kept; [`ExprKind`] is the
//!     closed set of kinds the locator, the capture engine and the formatter reason about, with
//!     [`ExprKind::Other`] carrying everything else untouched.

use super::range::{SourceLocation, SourceRange};
use serde::Serialize;

/// Identifier assigned by the parser, unique within one parsed dump.
///
/// Two expressions can legitimately share a range (an implicit conversion wrapping its
/// operand, for instance), so identity never relies on the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct ExprId(pub usize);

/// The expression kinds the pipeline distinguishes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExprKind {
    DeclRef,
    MemberRef,
    DotSyntaxCall,
    Call,
    Subscript,
    Binary,
    PrefixUnary,
    PostfixUnary,
    Ternary,
    ArrayLiteral,
    DictionaryLiteral,
    ObjectLiteral,
    MagicLiteral,
    StringLiteral,
    InterpolatedStringLiteral,
    IntegerLiteral,
    FloatLiteral,
    BooleanLiteral,
    NilLiteral,
    DotSelf,
    TupleElement,
    KeyPath,
    Closure,
    Paren,
    Tuple,
    Erasure,
    ForceValue,
    BindOptional,
    OptionalEvaluation,
    Try,
    ArgumentList,
    Argument,
    DefaultArgument,
    /// A node kind the pipeline does not model; traversed but never captured.
    Other(String),
}

impl ExprKind {
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "declref_expr" => ExprKind::DeclRef,
            "member_ref_expr" => ExprKind::MemberRef,
            "dot_syntax_call_expr" => ExprKind::DotSyntaxCall,
            "call_expr" => ExprKind::Call,
            "subscript_expr" => ExprKind::Subscript,
            "binary_expr" => ExprKind::Binary,
            "prefix_unary_expr" => ExprKind::PrefixUnary,
            "postfix_unary_expr" => ExprKind::PostfixUnary,
            "ternary_expr" | "if_expr" => ExprKind::Ternary,
            "array_expr" => ExprKind::ArrayLiteral,
            "dictionary_expr" => ExprKind::DictionaryLiteral,
            "object_literal" => ExprKind::ObjectLiteral,
            "magic_identifier_literal_expr" => ExprKind::MagicLiteral,
            "string_literal_expr" => ExprKind::StringLiteral,
            "interpolated_string_literal_expr" => ExprKind::InterpolatedStringLiteral,
            "integer_literal_expr" => ExprKind::IntegerLiteral,
            "float_literal_expr" => ExprKind::FloatLiteral,
            "boolean_literal_expr" => ExprKind::BooleanLiteral,
            "nil_literal_expr" => ExprKind::NilLiteral,
            "dot_self_expr" => ExprKind::DotSelf,
            "tuple_element_expr" => ExprKind::TupleElement,
            "keypath_expr" => ExprKind::KeyPath,
            "closure_expr" => ExprKind::Closure,
            "paren_expr" => ExprKind::Paren,
            "tuple_expr" => ExprKind::Tuple,
            "erasure_expr" => ExprKind::Erasure,
            "force_value_expr" => ExprKind::ForceValue,
            "bind_optional_expr" => ExprKind::BindOptional,
            "optional_evaluation_expr" => ExprKind::OptionalEvaluation,
            "try_expr" | "force_try_expr" | "optional_try_expr" => ExprKind::Try,
            "argument_list" => ExprKind::ArgumentList,
            "argument" => ExprKind::Argument,
            "default_argument_expr" => ExprKind::DefaultArgument,
            other => ExprKind::Other(other.to_string()),
        }
    }

    /// Kinds the capture engine may inspect; the parser rejects them without a range.
    pub fn requires_range(&self) -> bool {
        !matches!(
            self,
            ExprKind::ArgumentList
                | ExprKind::Argument
                | ExprKind::DefaultArgument
                | ExprKind::Other(_)
        )
    }

    /// Kinds that read as a complete statement when they end a line.
    pub fn is_statement_like(&self) -> bool {
        matches!(
            self,
            ExprKind::Binary | ExprKind::Call | ExprKind::Tuple | ExprKind::Paren | ExprKind::Erasure
        )
    }
}

/// A node of the typed expression tree. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expression {
    pub id: ExprId,
    pub kind: ExprKind,
    pub raw_kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub throws: bool,
    pub implicit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<SourceRange>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Expression>,
}

impl Expression {
    /// A bare expression of the given raw kind; attributes are filled in by the caller.
    pub fn new(id: ExprId, raw_kind: &str) -> Self {
        Self {
            id,
            kind: ExprKind::from_raw(raw_kind),
            raw_kind: raw_kind.to_string(),
            ty: None,
            decl: None,
            value: None,
            throws: false,
            implicit: false,
            location: None,
            range: None,
            children: Vec::new(),
        }
    }

    pub fn with_range(mut self, range: SourceRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_type(mut self, ty: &str) -> Self {
        self.ty = Some(ty.to_string());
        self
    }

    pub fn with_decl(mut self, decl: &str) -> Self {
        self.decl = Some(decl.to_string());
        self
    }

    pub fn with_children(mut self, children: Vec<Expression>) -> Self {
        self.children = children;
        self
    }

    pub fn implicit(mut self) -> Self {
        self.implicit = true;
        self
    }

    /// The callee of a call-like node.
    pub fn callee(&self) -> Option<&Expression> {
        match self.kind {
            ExprKind::Call | ExprKind::DotSyntaxCall => self.children.first(),
            _ => None,
        }
    }

    pub fn is_function_typed(&self) -> bool {
        self.ty.as_deref().is_some_and(|ty| ty.contains("->"))
    }

    /// `@lvalue`, `inout` and raw pointer types cannot be printed as values.
    pub fn is_reference_typed(&self) -> bool {
        self.ty.as_deref().is_some_and(|ty| {
            ty.starts_with("@lvalue") || ty.starts_with("inout") || ty.contains("Unsafe")
        })
    }

    /// The unqualified name of the referenced declaration.
    ///
    /// `Swift.(file).Sequence extension.map` gives `map`,
    /// `XCTest.(file).XCTAssertEqual(_:_:_:file:line:)` gives `XCTAssertEqual`,
    /// `main.(file).Bar.val@/tmp/t.swift:3:7` gives `val`.
    pub fn decl_name(&self) -> Option<&str> {
        self.decl.as_deref().map(decl_base_name)
    }

    /// Apply `f` to every location in this subtree.
    pub fn map_locations(self, f: &impl Fn(SourceLocation) -> SourceLocation) -> Self {
        Self {
            location: self.location.map(f),
            range: self.range.map(|range| range.map(f)),
            children: self
                .children
                .into_iter()
                .map(|child| child.map_locations(f))
                .collect(),
            ..self
        }
    }
}

/// Strip the module path, source position and argument labels from a decl string.
pub fn decl_base_name(decl: &str) -> &str {
    let without_position = decl.split('@').next().unwrap_or(decl);
    let without_labels = match without_position.rfind('(') {
        Some(open) if without_position.ends_with(')') && open > 0 => &without_position[..open],
        _ => without_position,
    };
    let operator_run = without_labels
        .chars()
        .rev()
        .take_while(|c| OPERATOR_CHARS.contains(*c))
        .map(char::len_utf8)
        .sum::<usize>();
    if operator_run > 1 {
        // `Swift.(file).Comparable extension...<` names the operator `..<`
        let run = &without_labels[without_labels.len() - operator_run..];
        return run.strip_prefix('.').unwrap_or(run);
    }
    match without_labels.rfind('.') {
        Some(dot) if dot + 1 < without_labels.len() => &without_labels[dot + 1..],
        _ => without_labels,
    }
}

const OPERATOR_CHARS: &str = "=<>!&|+-*/%^~?.";
