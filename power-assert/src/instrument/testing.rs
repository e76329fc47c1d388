//! Fixture based testing
//!
//!     Dumps are hard to write by hand: every node carries ranges that must agree with the
//!     source byte for byte, and a dump that is slightly off tests the pipeline against input
//!     the frontend never produces. Tests that need a real dump use a fixture pair from
//!     `power-assert/fixtures/`:
//!
//!         member_access.swift        the source
//!         member_access.swift.ast    its `-dump-ast` output
//!
//!     and load it with [`Fixture::load`]:
//!
//!     ```rust,ignore
//!     let fixture = Fixture::load("member_access");
//!     let instrumented = fixture.instrument(&InstrumentOptions::default()).unwrap();
//!     ```
//!
//!     Short inline dumps are fine for parser unit tests that look at one node shape.

use crate::instrument::ast::Ast;
use crate::instrument::pipeline::{instrument, parse_normalized, InstrumentOptions};
use crate::instrument::pipeline::{Instrumented, TransformError};
use crate::instrument::source::SourceFile;
use std::fs;
use std::path::PathBuf;

/// A source file and its dump.
#[derive(Debug, Clone)]
pub struct Fixture {
    pub name: String,
    pub source: String,
    pub dump: String,
}

impl Fixture {
    pub fn directory() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    /// Load `fixtures/<name>.swift` and `fixtures/<name>.swift.ast`. Panics when missing.
    pub fn load(name: &str) -> Self {
        let source_path = Self::directory().join(format!("{}.swift", name));
        let dump_path = Self::directory().join(format!("{}.swift.ast", name));
        let read = |path: &PathBuf| {
            fs::read_to_string(path)
                .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
        };
        Self {
            name: name.to_string(),
            source: read(&source_path),
            dump: read(&dump_path),
        }
    }

    pub fn source_file(&self) -> SourceFile {
        SourceFile::new(&self.source)
    }

    pub fn parse(&self, options: &InstrumentOptions) -> Result<Ast, TransformError> {
        parse_normalized(&self.source_file(), &self.dump, options)
    }

    pub fn instrument(&self, options: &InstrumentOptions) -> Result<Instrumented, TransformError> {
        instrument(&self.source, &self.dump, options)
    }

    /// The zero-based line of the source.
    pub fn line(&self, line: usize) -> &str {
        self.source.lines().nth(line).unwrap_or("")
    }
}
