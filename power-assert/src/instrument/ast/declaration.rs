//! Declarations
//!
//! Only the declaration kinds that can contain (or lead to) test code are modeled: imports,
//! nominal types, extensions and functions. Everything else in a declaration body is dropped by
//! the parser.

use super::expression::Expression;
use super::range::{SourceLocation, SourceRange};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    Private,
    FilePrivate,
    #[default]
    Internal,
    Public,
    Open,
}

impl AccessLevel {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "private" => Some(AccessLevel::Private),
            "fileprivate" => Some(AccessLevel::FilePrivate),
            "internal" => Some(AccessLevel::Internal),
            "public" => Some(AccessLevel::Public),
            "open" => Some(AccessLevel::Open),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportDecl {
    pub access: AccessLevel,
    /// Module path, e.g. `Foundation.Date` for a qualified import.
    pub name: String,
    /// `struct`, `class`, `func`... for qualified imports.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub range: Option<SourceRange>,
}

impl ImportDecl {
    pub fn is_qualified(&self) -> bool {
        self.kind.is_some() || self.name.contains('.')
    }
}

/// Structs, classes, enums and extensions share one shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeDecl {
    pub access: AccessLevel,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generic_parameters: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub inherits: Vec<String>,
    pub members: Vec<Declaration>,
    pub range: Option<SourceRange>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ty: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDecl {
    pub access: AccessLevel,
    /// Name with argument labels, as the dump prints it: `testEquality()`.
    pub name: String,
    pub parameters: Vec<Parameter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    pub body: Vec<Expression>,
    pub range: Option<SourceRange>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "decl", rename_all = "snake_case")]
pub enum Declaration {
    Import(ImportDecl),
    Struct(TypeDecl),
    Class(TypeDecl),
    Enum(TypeDecl),
    Extension(TypeDecl),
    Function(FunctionDecl),
}

impl Declaration {
    pub fn name(&self) -> &str {
        match self {
            Declaration::Import(import) => &import.name,
            Declaration::Struct(ty)
            | Declaration::Class(ty)
            | Declaration::Enum(ty)
            | Declaration::Extension(ty) => &ty.name,
            Declaration::Function(function) => &function.name,
        }
    }

    pub fn access(&self) -> AccessLevel {
        match self {
            Declaration::Import(import) => import.access,
            Declaration::Struct(ty)
            | Declaration::Class(ty)
            | Declaration::Enum(ty)
            | Declaration::Extension(ty) => ty.access,
            Declaration::Function(function) => function.access,
        }
    }

    pub fn inherits(&self) -> &[String] {
        match self {
            Declaration::Struct(ty)
            | Declaration::Class(ty)
            | Declaration::Enum(ty)
            | Declaration::Extension(ty) => &ty.inherits,
            _ => &[],
        }
    }

    pub fn members(&self) -> &[Declaration] {
        match self {
            Declaration::Struct(ty)
            | Declaration::Class(ty)
            | Declaration::Enum(ty)
            | Declaration::Extension(ty) => &ty.members,
            _ => &[],
        }
    }

    /// The dump keyword this declaration was parsed from.
    pub fn keyword(&self) -> &'static str {
        match self {
            Declaration::Import(_) => "import_decl",
            Declaration::Struct(_) => "struct_decl",
            Declaration::Class(_) => "class_decl",
            Declaration::Enum(_) => "enum_decl",
            Declaration::Extension(_) => "extension_decl",
            Declaration::Function(_) => "func_decl",
        }
    }

    /// Apply `f` to every location in this declaration and its members and bodies.
    pub fn map_locations(self, f: &impl Fn(SourceLocation) -> SourceLocation) -> Self {
        let map_range = |range: Option<SourceRange>| range.map(|r| r.map(f));
        let map_type = |ty: TypeDecl| TypeDecl {
            range: map_range(ty.range),
            members: ty.members.into_iter().map(|m| m.map_locations(f)).collect(),
            ..ty
        };
        match self {
            Declaration::Import(import) => Declaration::Import(ImportDecl {
                range: map_range(import.range),
                ..import
            }),
            Declaration::Struct(ty) => Declaration::Struct(map_type(ty)),
            Declaration::Class(ty) => Declaration::Class(map_type(ty)),
            Declaration::Enum(ty) => Declaration::Enum(map_type(ty)),
            Declaration::Extension(ty) => Declaration::Extension(map_type(ty)),
            Declaration::Function(function) => Declaration::Function(FunctionDecl {
                range: map_range(function.range),
                body: function
                    .body
                    .into_iter()
                    .map(|e| e.map_locations(f))
                    .collect(),
                ..function
            }),
        }
    }
}

/// The typed AST of one source file.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Ast {
    pub declarations: Vec<Declaration>,
}

impl Ast {
    /// Every function, at any nesting depth, in declaration order.
    pub fn functions(&self) -> Vec<&FunctionDecl> {
        fn collect<'a>(declarations: &'a [Declaration], out: &mut Vec<&'a FunctionDecl>) {
            for declaration in declarations {
                match declaration {
                    Declaration::Function(function) => out.push(function),
                    other => collect(other.members(), out),
                }
            }
        }
        let mut out = Vec::new();
        collect(&self.declarations, &mut out);
        out
    }

    pub fn map_locations(self, f: &impl Fn(SourceLocation) -> SourceLocation) -> Self {
        Self {
            declarations: self
                .declarations
                .into_iter()
                .map(|d| d.map_locations(f))
                .collect(),
        }
    }
}
