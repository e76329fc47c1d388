//! # power-assert
//!
//! Rewrites XCTest assertions in Swift sources so that a failing assertion prints
//! a diagram of every sub-expression's value under its position in the source.
//!
//! File Layout
//!
//! The library is a single pipeline, laid out leaves first under [instrument]:
//!
//! src/instrument
//!   ├── dump         Tokenizer and tree lexer for the compiler's textual AST dump
//!   ├── parsing      Typed AST construction from the dump tree
//!   ├── ast          Declarations, expressions, locations and traversal helpers
//!   ├── locating     Finding the assertion calls worth instrumenting
//!   ├── source       Source model, source tokenizer, single-line formatter, display width
//!   ├── capture      Span completion and per-argument captures with print columns
//!   ├── generating   Replacement code for each assertion and the text substitution
//!   ├── runtime      The recorder/renderer the generated code talks to
//!   └── pipeline     The per-file transform tying it all together
//!
//! For fixture based testing helpers, see the [testing module](instrument::testing).

pub mod instrument;
