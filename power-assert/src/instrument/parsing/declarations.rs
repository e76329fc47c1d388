//! Declaration nodes
//!
//!     (class_decl range=[t.swift:5:1 - line:20:1] "Tests" interface type='Tests.Type' access=internal inherits: XCTestCase
//!       (func_decl range=[t.swift:6:3 - line:9:3] "testA()" interface type='(Tests) -> () -> ()' access=internal
//!         (parameter_list range=[t.swift:6:13 - line:6:14])
//!         (brace_stmt range=[t.swift:6:16 - line:9:3]
//!           ...)))
//!
//! The name is the first quoted token that is not an attribute value. Members keep source
//! order; declaration kinds that are not modeled (`var_decl`, `constructor_decl`, ...) are
//! dropped together with their subtrees.

use super::error::{DumpError, ParserResult};
use super::location::parse_range;
use super::{node_kind, Parser};
use crate::instrument::ast::{
    AccessLevel, Declaration, FunctionDecl, ImportDecl, Parameter, SourceRange, TypeDecl,
};
use crate::instrument::dump::{has_flag, Attributes, DumpToken, NodeId};

impl<'t> Parser<'t> {
    pub(super) fn declarations(&mut self, nodes: &[NodeId]) -> ParserResult<Vec<Declaration>> {
        let mut declarations = Vec::new();
        for node in nodes {
            if let Some(declaration) = self.declaration(*node)? {
                declarations.push(declaration);
            }
        }
        Ok(declarations)
    }

    fn declaration(&mut self, node: NodeId) -> ParserResult<Option<Declaration>> {
        let tokens = self.tokens(node);
        let Some(kind) = node_kind(tokens) else {
            return Ok(None);
        };
        if has_flag(tokens, "implicit") {
            return Ok(None);
        }

        let declaration = match kind {
            "import_decl" => Declaration::Import(self.import(node)?),
            "struct_decl" => Declaration::Struct(self.type_decl(node, kind)?),
            "class_decl" => Declaration::Class(self.type_decl(node, kind)?),
            "enum_decl" => Declaration::Enum(self.type_decl(node, kind)?),
            "extension_decl" => Declaration::Extension(self.type_decl(node, kind)?),
            "func_decl" => Declaration::Function(self.function(node)?),
            other => {
                tracing::trace!(kind = other, "skipping declaration");
                return Ok(None);
            }
        };
        Ok(Some(declaration))
    }

    fn import(&mut self, node: NodeId) -> ParserResult<ImportDecl> {
        let tokens = self.tokens(node);
        let attributes = Attributes::collect(tokens);
        Ok(ImportDecl {
            access: access(&attributes),
            name: name(tokens, "import_decl")?.to_string(),
            kind: attributes.get("kind").map(str::to_string),
            range: range(&attributes)?,
        })
    }

    fn type_decl(&mut self, node: NodeId, kind: &str) -> ParserResult<TypeDecl> {
        let tokens = self.tokens(node);
        let attributes = Attributes::collect(tokens);
        let members = self.declarations(self.children(node))?;
        Ok(TypeDecl {
            access: access(&attributes),
            name: name(tokens, kind)?.to_string(),
            generic_parameters: generic_parameters(tokens),
            inherits: inherits(tokens),
            members,
            range: range(&attributes)?,
        })
    }

    fn function(&mut self, node: NodeId) -> ParserResult<FunctionDecl> {
        let tokens = self.tokens(node);
        let attributes = Attributes::collect(tokens);

        let parameters = match self.child_of_kind(node, "parameter_list") {
            Some(list) => self
                .children(list)
                .iter()
                .filter(|p| node_kind(self.tokens(**p)) == Some("parameter"))
                .map(|p| parameter(self.tokens(*p)))
                .collect::<ParserResult<Vec<_>>>()?,
            None => Vec::new(),
        };
        let result = self
            .child_of_kind(node, "result")
            .and_then(|result| self.first_attribute(result, "id"));

        let body = match self.child_of_kind(node, "brace_stmt") {
            Some(brace) => self.expressions(self.children(brace))?,
            None => Vec::new(),
        };

        Ok(FunctionDecl {
            access: access(&attributes),
            name: name(tokens, "func_decl")?.to_string(),
            parameters,
            result,
            body,
            range: range(&attributes)?,
        })
    }

    /// The first value of `key` in the subtree, in pre-order.
    fn first_attribute(&self, node: NodeId, key: &str) -> Option<String> {
        if let Some(value) = Attributes::collect(self.tokens(node)).get(key) {
            return Some(value.to_string());
        }
        self.children(node)
            .iter()
            .find_map(|child| self.first_attribute(*child, key))
    }
}

fn parameter(tokens: &[DumpToken]) -> ParserResult<Parameter> {
    let attributes = Attributes::collect(tokens);
    Ok(Parameter {
        name: name(tokens, "parameter")?.to_string(),
        api_name: attributes.get("apiName").map(str::to_string),
        ty: attributes
            .get("type")
            .or_else(|| attributes.get("interface type"))
            .map(str::to_string),
    })
}

fn access(attributes: &Attributes) -> AccessLevel {
    attributes
        .get("access")
        .and_then(AccessLevel::parse)
        .unwrap_or_default()
}

fn range(attributes: &Attributes) -> ParserResult<Option<SourceRange>> {
    match attributes.get("range") {
        Some(value) => parse_range(value),
        None => Ok(None),
    }
}

/// The first quoted token after the kind that is not the value of an attribute.
fn name<'a>(tokens: &'a [DumpToken], kind: &str) -> ParserResult<&'a str> {
    tokens
        .iter()
        .enumerate()
        .skip(2)
        .find(|(i, token)| token.as_quoted().is_some() && !tokens[i - 1].is("="))
        .and_then(|(_, token)| token.as_quoted())
        .ok_or_else(|| DumpError::MissingName {
            kind: kind.to_string(),
        })
}

/// `<T>` or `<Key, Value : Hashable>`, printed right after the name.
fn generic_parameters(tokens: &[DumpToken]) -> Option<String> {
    let start = tokens
        .iter()
        .position(|t| t.as_token().is_some_and(|w| w.starts_with('<')))?;
    let mut parts = Vec::new();
    for token in &tokens[start..] {
        let word = token.as_token()?;
        parts.push(word);
        if word.ends_with('>') {
            return Some(parts.join(" "));
        }
    }
    None
}

/// The comma-separated list after `inherits:`.
fn inherits(tokens: &[DumpToken]) -> Vec<String> {
    let Some(start) = tokens
        .windows(2)
        .position(|pair| pair[0].is("inherits") && pair[1].is(":"))
    else {
        return Vec::new();
    };

    let rest = &tokens[start + 2..];
    let mut words = Vec::new();
    for (i, token) in rest.iter().enumerate() {
        let Some(word) = token.as_token() else { break };
        let starts_attribute = rest.get(i + 1).is_some_and(|next| next.is("="));
        if word == ")" || word == "=" || starts_attribute {
            break;
        }
        words.push(word);
    }
    words
        .join(" ")
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
