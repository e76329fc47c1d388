//! Expression nodes
//!
//!     (call_expr type='()' location=t.swift:15:5 range=[t.swift:15:5 - line:15:37] nothrow
//!       (declref_expr type='(...) -> ()' location=t.swift:15:5 range=[t.swift:15:5 - line:15:5] decl=XCTest.(file).XCTAssert(_:_:file:line:) function_ref=single)
//!       (argument_list labels=_:
//!         (argument
//!           (autoclosure_expr implicit type='() throws -> Bool' ...
//!
//! The kind is the second token, attributes come from the node's own line, and every child
//! node with a kind becomes a child expression in source order. Identifiers are handed out
//! sequentially over the whole dump.

use super::error::{DumpError, ParserResult};
use super::location::{parse_location, parse_range};
use super::{excerpt, node_kind, Parser};
use crate::instrument::ast::{ExprId, ExprKind, Expression};
use crate::instrument::dump::{has_flag, Attributes, NodeId};

impl<'t> Parser<'t> {
    pub(super) fn expressions(&mut self, nodes: &[NodeId]) -> ParserResult<Vec<Expression>> {
        let mut expressions = Vec::with_capacity(nodes.len());
        for node in nodes {
            if let Some(expression) = self.expression(*node)? {
                expressions.push(expression);
            }
        }
        Ok(expressions)
    }

    fn expression(&mut self, node: NodeId) -> ParserResult<Option<Expression>> {
        let tokens = self.tokens(node);
        let Some(raw_kind) = node_kind(tokens) else {
            return Ok(None);
        };

        let id = ExprId(self.next_id);
        self.next_id += 1;

        let attributes = Attributes::collect(tokens);
        let mut expression = Expression::new(id, raw_kind);
        expression.ty = attributes.get("type").map(str::to_string);
        expression.decl = attributes.get("decl").map(str::to_string);
        expression.value = attributes.get("value").map(str::to_string);
        expression.throws = has_flag(tokens, "throws");
        expression.implicit = has_flag(tokens, "implicit");
        expression.location = attributes.get("location").map(parse_location).transpose()?;
        expression.range = match attributes.get("range") {
            Some(value) => parse_range(value)?,
            None => None,
        };

        if expression.range.is_none() && expression.kind.requires_range() && !expression.implicit
        {
            return Err(DumpError::MissingRange {
                kind: raw_kind.to_string(),
                excerpt: excerpt(tokens),
            });
        }
        if let ExprKind::Other(kind) = &expression.kind {
            tracing::trace!(kind = kind.as_str(), "unsupported expression kind");
        }

        expression.children = self.expressions(self.children(node))?;
        Ok(Some(expression))
    }
}

#[cfg(test)]
mod tests {
    use crate::instrument::ast::{
        Declaration, ExprId, ExprKind, Expression, SourceLocation, SourceRange,
    };
    use crate::instrument::parsing::{parse_dump, DumpError};

    fn body(dump: &str) -> Vec<Expression> {
        let ast = parse_dump(dump, &[] as &[&str]).unwrap();
        match ast.declarations.into_iter().next() {
            Some(Declaration::Function(function)) => function.body,
            other => panic!("expected a function, got {:?}", other),
        }
    }

    const MEMBER_ACCESS: &str = r#"(func_decl range=[t.swift:1:1 - line:3:1] "test()" access=internal
  (parameter_list range=[t.swift:1:10 - line:1:11])
  (brace_stmt range=[t.swift:1:13 - line:3:1]
    (call_expr type='()' location=t.swift:2:5 range=[t.swift:2:5 - line:2:23] nothrow
      (declref_expr type='(@autoclosure () throws -> Bool, @autoclosure () -> String, StaticString, UInt) -> ()' location=t.swift:2:5 range=[t.swift:2:5 - line:2:5] decl=XCTest.(file).XCTAssert(_:_:file:line:) function_ref=single)
      (argument_list labels=_:
        (argument
          (autoclosure_expr implicit type='() throws -> Bool' location=t.swift:2:19 range=[t.swift:2:15 - line:2:22] discriminator=0
            (binary_expr type='Bool' location=t.swift:2:19 range=[t.swift:2:15 - line:2:22] nothrow
              (dot_syntax_call_expr implicit type='(Int, Int) -> Bool' location=t.swift:2:19 range=[t.swift:2:19 - line:2:19] nothrow
                (declref_expr type='(Int.Type) -> (Int, Int) -> Bool' location=t.swift:2:19 range=[t.swift:2:19 - line:2:19] decl=Swift.(file).Int extension.== function_ref=unapplied)
                (type_expr implicit type='Int.Type' location=t.swift:2:19 range=[t.swift:2:19 - line:2:19] typerepr='Int'))
              (argument_list implicit
                (argument
                  (integer_literal_expr type='Int' location=t.swift:2:15 range=[t.swift:2:15 - line:2:15] value=1 builtin_initializer=Swift.(file).Int.init(_builtinIntegerLiteral:) initializer=**NULL**))
                (argument
                  (integer_literal_expr type='Int' location=t.swift:2:22 range=[t.swift:2:22 - line:2:22] value=2 builtin_initializer=Swift.(file).Int.init(_builtinIntegerLiteral:) initializer=**NULL**)))))))
        (argument
          (default_argument_expr implicit type='String' default_args_owner=XCTest.(file).XCTAssert(_:_:file:line:) param=1))))))"#;

    #[test]
    fn test_call_tree_shape() {
        let body = body(MEMBER_ACCESS);
        assert_eq!(body.len(), 1);
        let call = &body[0];
        assert_eq!(call.kind, ExprKind::Call);
        assert_eq!(
            call.range,
            Some(SourceRange::new(
                SourceLocation::new(1, 4),
                SourceLocation::new(1, 22)
            ))
        );
        assert_eq!(call.callee().and_then(|c| c.decl_name()), Some("XCTAssert"));

        let arguments = &call.children[1];
        assert_eq!(arguments.kind, ExprKind::ArgumentList);
        assert_eq!(arguments.children.len(), 2);

        let binary = &arguments.children[0].children[0].children[0];
        assert_eq!(binary.kind, ExprKind::Binary);
        assert_eq!(binary.location, Some(SourceLocation::new(1, 18)));
        let operator = binary.children[0].callee().and_then(|c| c.decl_name());
        assert_eq!(operator, Some("=="));
    }

    #[test]
    fn test_literal_values_and_flags() {
        let body = body(MEMBER_ACCESS);
        let binary = &body[0].children[1].children[0].children[0].children[0];
        let literal = &binary.children[1].children[1].children[0];
        assert_eq!(literal.kind, ExprKind::IntegerLiteral);
        assert_eq!(literal.value.as_deref(), Some("2"));
        assert!(binary.children[0].implicit);
        assert!(!binary.throws);
    }

    #[test]
    fn test_ids_are_sequential_preorder() {
        let body = body(MEMBER_ACCESS);
        assert_eq!(body[0].id, ExprId(0));
        assert_eq!(body[0].children[0].id, ExprId(1));
        assert_eq!(body[0].children[1].id, ExprId(2));
    }

    #[test]
    fn test_missing_range_is_malformed() {
        let dump = r#"(func_decl range=[t.swift:1:1 - line:3:1] "test()"
  (brace_stmt range=[t.swift:1:13 - line:3:1]
    (member_ref_expr type='Int' location=t.swift:2:9 decl=main.(file).Bar.val)))"#;
        let error = parse_dump(dump, &[] as &[&str]).unwrap_err();
        assert!(matches!(error, DumpError::MissingRange { ref kind, .. } if kind == "member_ref_expr"));
    }

    #[test]
    fn test_invalid_location_is_malformed() {
        let dump = r#"(func_decl range=[t.swift:1:1 - line:3:1] "test()"
  (brace_stmt range=[t.swift:1:13 - line:3:1]
    (declref_expr type='Int' location=nowhere range=[t.swift:2:9 - line:2:9] decl=main.(file).x)))"#;
        assert_eq!(
            parse_dump(dump, &[] as &[&str]),
            Err(DumpError::InvalidLocation("nowhere".into()))
        );
    }

    #[test]
    fn test_location_path_with_spaces() {
        let dump = r#"(func_decl range=[/tmp/My Tests/t.swift:1:1 - line:3:1] "test()"
  (brace_stmt range=[/tmp/My Tests/t.swift:1:13 - line:3:1]
    (declref_expr type='Int' location=/tmp/My Tests/t.swift:2:9 range=[/tmp/My Tests/t.swift:2:9 - line:2:9] decl=main.(file).x@/tmp/My Tests/t.swift:1:5 function_ref=unapplied)))"#;
        let body = body(dump);
        assert_eq!(body[0].location, Some(SourceLocation::new(1, 8)));
        assert_eq!(
            body[0].range,
            Some(SourceRange::new(SourceLocation::new(1, 8), SourceLocation::new(1, 8)))
        );
    }
}
