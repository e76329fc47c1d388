//! Declaration round trip over a full dump
//!
//! declarations.swift: a plain and two qualified imports, an extension with three functions,
//! a private extension of a nested type, a private generic struct, a public class with two
//! functions, a free function and an enum.

use power_assert::instrument::ast::{AccessLevel, Declaration};
use power_assert::instrument::pipeline::InstrumentOptions;
use power_assert::instrument::testing::Fixture;

fn declarations() -> Vec<Declaration> {
    Fixture::load("declarations")
        .parse(&InstrumentOptions::default())
        .unwrap()
        .declarations
}

#[test]
fn test_top_level_names_and_kinds() {
    let declarations = declarations();
    let summary: Vec<(&str, &str)> = declarations
        .iter()
        .map(|d| (d.keyword(), d.name()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("import_decl", "XCTest"),
            ("import_decl", "Foundation.Date"),
            ("import_decl", "Foundation.NSObject"),
            ("extension_decl", "String"),
            ("extension_decl", "String.Index"),
            ("struct_decl", "Box"),
            ("class_decl", "Counter"),
            ("func_decl", "helper()"),
            ("enum_decl", "Direction"),
        ]
    );
}

#[test]
fn test_qualified_imports() {
    let declarations = declarations();
    let imports: Vec<(Option<&str>, bool)> = declarations[..3]
        .iter()
        .map(|d| match d {
            Declaration::Import(import) => (import.kind.as_deref(), import.is_qualified()),
            other => panic!("expected an import, got {:?}", other),
        })
        .collect();
    assert_eq!(
        imports,
        vec![(None, false), (Some("struct"), true), (Some("class"), true)]
    );
}

#[test]
fn test_extension_members() {
    let declarations = declarations();
    let names: Vec<&str> = declarations[3].members().iter().map(|m| m.name()).collect();
    assert_eq!(names, vec!["shout()", "whisper()", "twice()"]);

    let Declaration::Function(shout) = &declarations[3].members()[0] else {
        panic!("expected a function");
    };
    assert_eq!(shout.result.as_deref(), Some("String"));
    assert_eq!(shout.body.len(), 1);
}

#[test]
fn test_access_levels() {
    let declarations = declarations();
    let private_extension = &declarations[4];
    assert_eq!(private_extension.name(), "String.Index");
    assert_eq!(private_extension.members().len(), 1);
    assert_eq!(private_extension.members()[0].access(), AccessLevel::FilePrivate);

    assert_eq!(declarations[5].access(), AccessLevel::FilePrivate);
    assert_eq!(declarations[6].access(), AccessLevel::Public);
    assert_eq!(declarations[7].access(), AccessLevel::Internal);
}

#[test]
fn test_generic_struct_drops_stored_properties() {
    let declarations = declarations();
    let Declaration::Struct(boxed) = &declarations[5] else {
        panic!("expected a struct, got {:?}", declarations[5]);
    };
    assert_eq!(boxed.generic_parameters.as_deref(), Some("<T>"));
    assert!(boxed.members.is_empty());
}

#[test]
fn test_class_skips_implicit_members() {
    let declarations = declarations();
    let counter = &declarations[6];
    assert_eq!(counter.inherits(), ["NSObject".to_string()]);
    let members: Vec<(&str, AccessLevel)> = counter
        .members()
        .iter()
        .map(|m| (m.name(), m.access()))
        .collect();
    assert_eq!(
        members,
        vec![
            ("increment()", AccessLevel::Public),
            ("reset()", AccessLevel::Internal)
        ]
    );
}

#[test]
fn test_enum_conformance_noise_is_filtered() {
    let declarations = declarations();
    assert!(declarations[8].members().is_empty());
}

#[test]
fn test_functions_at_every_depth() {
    let ast = Fixture::load("declarations")
        .parse(&InstrumentOptions::default())
        .unwrap();
    let names: Vec<&str> = ast.functions().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "shout()",
            "whisper()",
            "twice()",
            "doubled()",
            "increment()",
            "reset()",
            "helper()"
        ]
    );
}
