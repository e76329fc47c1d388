//! Per-file transform
//!
//!     Source text and its dump in, instrumented source out:
//!
//!         dump ──lex_dump──> Tree ──parse──> Ast ──normalize columns──> Ast ──locate──> Assertions
//!         source ──tokenize──> SourceTokens
//!
//!         for every assertion:
//!             AssertionContext ──capture──> CapturedExpressions ──generate──> Replacement
//!
//!         source + replacements ──apply──> instrumented source
//!
//!     A malformed dump fails the whole file; an assertion whose parentheses or operands
//!     cannot be found in the source is left untouched. Nothing is shared between files, so
//!     callers may run files in parallel.
//!
//!     The stage functions ([`dump_tokens`], [`parse_normalized`], [`locate_assertions`],
//!     [`capture_assertions`]) expose the intermediate results for inspection.

use crate::instrument::ast::Ast;
use crate::instrument::capture::{capture, AssertionContext, CapturedExpression};
use crate::instrument::dump::{filter_noise, tokenize as tokenize_dump, DumpToken};
use crate::instrument::dump::DEFAULT_NOISE_MARKERS;
use crate::instrument::generating::{apply, generate, GeneratorOptions, Replacement, ReplacementError};
use crate::instrument::locating::{locate, AssertKind, Assertion, ComparisonOperator};
use crate::instrument::parsing::{parse_dump, DumpError};
use crate::instrument::source::{tokenize, ColumnUnit, SourceError, SourceFile, SourceToken};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstrumentOptions {
    /// Dump lines starting with one of these are dropped with their nested lines.
    pub noise_markers: Vec<String>,
    /// Unit of the dump's columns.
    pub column_unit: ColumnUnit,
    /// Modules whose assertion functions are instrumented.
    pub assertion_modules: Vec<String>,
    pub generator: GeneratorOptions,
}

impl Default for InstrumentOptions {
    fn default() -> Self {
        Self {
            noise_markers: DEFAULT_NOISE_MARKERS.iter().map(|m| m.to_string()).collect(),
            column_unit: ColumnUnit::default(),
            assertion_modules: vec!["XCTest".to_string()],
            generator: GeneratorOptions::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TransformError {
    Dump(DumpError),
    Source(SourceError),
    Replacement(ReplacementError),
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformError::Dump(err) => write!(f, "{}", err),
            TransformError::Source(err) => write!(f, "{}", err),
            TransformError::Replacement(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for TransformError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransformError::Dump(err) => Some(err),
            TransformError::Source(err) => Some(err),
            TransformError::Replacement(err) => Some(err),
        }
    }
}

impl From<DumpError> for TransformError {
    fn from(err: DumpError) -> Self {
        TransformError::Dump(err)
    }
}

impl From<SourceError> for TransformError {
    fn from(err: SourceError) -> Self {
        TransformError::Source(err)
    }
}

impl From<ReplacementError> for TransformError {
    fn from(err: ReplacementError) -> Self {
        TransformError::Replacement(err)
    }
}

/// One rewritten assertion.
#[derive(Debug, Clone, Serialize)]
pub struct InstrumentedAssertion {
    /// One-based line of the assertion.
    pub line: usize,
    pub kind: AssertKind,
    pub op: ComparisonOperator,
    /// The assertion as written.
    pub original: String,
    pub captures: Vec<CapturedExpression>,
    pub replacement: Replacement,
}

#[derive(Debug, Clone, Serialize)]
pub struct Instrumented {
    pub source: String,
    pub assertions: Vec<InstrumentedAssertion>,
}

/// The captures of one assertion, as `inspect` shows them.
#[derive(Debug, Clone, Serialize)]
pub struct AssertionCaptures {
    pub line: usize,
    /// The assertion on one line.
    pub text: String,
    pub captures: Vec<CapturedExpression>,
}

/// Instrument every assertion of one file.
pub fn instrument(
    source_text: &str,
    dump_text: &str,
    options: &InstrumentOptions,
) -> Result<Instrumented, TransformError> {
    let _span = tracing::info_span!("instrument").entered();
    let source = SourceFile::new(source_text);
    let ast = parse_normalized(&source, dump_text, options)?;
    let tokens = tokenize(source_text);

    let mut assertions = Vec::new();
    for assertion in locate(&ast, &options.assertion_modules) {
        let Some(context) = context_of(&assertion, &tokens) else {
            continue;
        };
        let captures = capture(&assertion, &context);
        let Some(replacement) = generate(&assertion, &context, &captures, &options.generator)
        else {
            continue;
        };
        assertions.push(InstrumentedAssertion {
            line: assertion.line_number,
            kind: assertion.kind,
            op: assertion.op,
            original: source.slice(context.range())?,
            captures,
            replacement,
        });
    }

    let replacements: Vec<Replacement> =
        assertions.iter().map(|a| a.replacement.clone()).collect();
    let output = apply(&source, &replacements)?;
    tracing::debug!(assertions = assertions.len(), "instrumented");
    Ok(Instrumented {
        source: output,
        assertions,
    })
}

/// The flat dump token stream, after noise filtering.
pub fn dump_tokens(dump_text: &str, options: &InstrumentOptions) -> Vec<DumpToken> {
    tokenize_dump(&filter_noise(dump_text, &options.noise_markers))
}

/// The typed AST with every column converted to characters of `source`.
pub fn parse_normalized(
    source: &SourceFile,
    dump_text: &str,
    options: &InstrumentOptions,
) -> Result<Ast, TransformError> {
    let ast = parse_dump(dump_text, &options.noise_markers)?;
    let unit = options.column_unit;
    Ok(ast.map_locations(&|location| source.normalize(location, unit)))
}

pub fn locate_assertions(
    source: &SourceFile,
    dump_text: &str,
    options: &InstrumentOptions,
) -> Result<Vec<Assertion>, TransformError> {
    let ast = parse_normalized(source, dump_text, options)?;
    Ok(locate(&ast, &options.assertion_modules))
}

pub fn capture_assertions(
    source: &SourceFile,
    dump_text: &str,
    options: &InstrumentOptions,
) -> Result<Vec<AssertionCaptures>, TransformError> {
    let tokens = tokenize(source.text());
    let captures = locate_assertions(source, dump_text, options)?
        .iter()
        .filter_map(|assertion| {
            let context = context_of(assertion, &tokens)?;
            Some(AssertionCaptures {
                line: assertion.line_number,
                text: context.text().to_string(),
                captures: capture(assertion, &context),
            })
        })
        .collect();
    Ok(captures)
}

fn context_of(assertion: &Assertion, tokens: &[SourceToken]) -> Option<AssertionContext> {
    let context = AssertionContext::new(assertion, tokens);
    if context.is_none() {
        tracing::warn!(
            line = assertion.line_number,
            "assertion call not found in the source, left as is"
        );
    }
    context
}
