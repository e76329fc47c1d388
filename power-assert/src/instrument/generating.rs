//! Code generation
//!
//!     - [generator](generator): the replacement code for one assertion.
//!     - [replacement](replacement): splicing replacements into the source, line count intact.
//!
//!     The generated code only needs the runtime contract:
//!
//!         Recorder(text, line:)
//!             .assertBoolean | .assertEquality | .assertComparable | .assertNil (..., op:, message:)
//!             .record(expression:column:) ...
//!             .render()
//!
//!     See [runtime](crate::instrument::runtime) for a Rust rendition of that contract.

pub mod generator;
pub mod replacement;

pub use generator::{argument_pieces, generate, GeneratorOptions};
pub use replacement::{apply, Replacement, ReplacementError};
