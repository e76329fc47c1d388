//! Swift support source
//!
//!     The instrumented sources call into a recorder type that has to be compiled into the same
//!     test target. This module emits it from `support/Recorder.swift`, named after the
//!     configured recorder: `PowerAssert.Recorder` becomes a `Recorder` class nested in a
//!     `PowerAssert` enum, a bare `Recorder` a top-level class.
//!
//! Contract
//!
//!     Every call the generator emits, with its labels:
//!
//!         init(_ text: String, line: UInt)            assertion text on one line, 1-based line
//!         assertBoolean(_:op:message:)                .isTrue, .isFalse
//!         assertEquality(_:_:op:message:)             .equal, .notEqual
//!         assertComparable(_:_:op:message:)           .greaterThan, .greaterThanOrEqual,
//!                                                     .lessThan, .lessThanOrEqual
//!         assertNil(_:op:message:)                    .isNil, .isNotNil
//!         record(expression:column:)                  column is the display column of the
//!                                                     value's anchor in the assertion text
//!         render()                                    reports the diagram if the assertion failed
//!
//!     `message:` is omitted when the assertion has none. Every method but `render` returns
//!     the recorder so the calls chain.

use std::fmt;

const TEMPLATE: &str = include_str!("../../../support/Recorder.swift");
const PLACEHOLDER: &str = "__RECORDER__";

/// Recorder methods the generated code calls, with their argument labels.
pub const CONTRACT: &[&str] = &[
    "init(_:line:)",
    "assertBoolean(_:op:message:)",
    "assertEquality(_:_:op:message:)",
    "assertComparable(_:_:op:message:)",
    "assertNil(_:op:message:)",
    "record(expression:column:)",
    "render()",
];

/// Default file name of the support source.
pub const SUPPORT_FILE_NAME: &str = "PowerAssertSupport.swift";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupportError {
    /// The recorder is not `Type` or `Namespace.Type`.
    InvalidRecorderName(String),
}

impl fmt::Display for SupportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SupportError::InvalidRecorderName(name) => write!(
                f,
                "recorder '{}' must be a type name, optionally qualified by one namespace",
                name
            ),
        }
    }
}

impl std::error::Error for SupportError {}

/// The Swift source declaring `recorder`.
pub fn support_source(recorder: &str) -> Result<String, SupportError> {
    let invalid = || SupportError::InvalidRecorderName(recorder.to_string());
    let parts: Vec<&str> = recorder.split('.').collect();
    if parts.len() > 2 || !parts.iter().all(|part| is_identifier(part)) {
        return Err(invalid());
    }

    let mut out = String::from("// Generated by power-assert. Compile into the test target.\n\nimport XCTest\n\n");
    match parts.as_slice() {
        [name] => out.push_str(&TEMPLATE.replace(PLACEHOLDER, name)),
        [namespace, name] => {
            out.push_str(&format!("public enum {} {{\n", namespace));
            for line in TEMPLATE.replace(PLACEHOLDER, name).lines() {
                if !line.is_empty() {
                    out.push_str("    ");
                    out.push_str(line);
                }
                out.push('\n');
            }
            out.push_str("}\n");
        }
        _ => return Err(invalid()),
    }
    Ok(out)
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}
