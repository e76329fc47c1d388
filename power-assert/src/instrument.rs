//! Assertion instrumentation
//!
//!     The stages, leaves first:
//!
//!     - [dump](dump): lexes the frontend's textual AST dump into a tree of token lists.
//!     - [parsing](parsing): turns that tree into the typed [ast](ast).
//!     - [locating](locating): finds the assertion calls in function bodies.
//!     - [source](source): tokenizes and flattens the original source text.
//!     - [capture](capture): maps every sub-expression of an assertion to its source text and
//!       the column its value is printed under.
//!     - [generating](generating): builds the replacement code for each assertion.
//!     - [runtime](runtime): the recorder the generated code talks to, and the diagram renderer.
//!
//!     [pipeline](pipeline) ties them together for one file.

pub mod ast;
pub mod capture;
pub mod dump;
pub mod generating;
pub mod locating;
pub mod parsing;
pub mod pipeline;
pub mod runtime;
pub mod source;
pub mod testing;
