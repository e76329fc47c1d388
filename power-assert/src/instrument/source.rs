//! Swift source
//!
//!     Everything that reads the original source text rather than the dump:
//!
//!     - [model](model): the indexed [`SourceFile`] with line offsets and column normalization.
//!     - [tokenizer](tokenizer): a lossless tokenizer classifying source characters into
//!       tokens, strings, whitespace, line breaks and indentation.
//!     - [formatter](formatter): collapses wrapped source into one displayable line.
//!     - [width](width): terminal display widths.
//!
//!     The dump says where an expression is; only the source says how it was written. The
//!     capture engine combines both.

pub mod formatter;
pub mod model;
pub mod token;
pub mod tokenizer;
pub mod width;

pub use formatter::{escape, escaped, format, format_with_hint, layout, Formatted};
pub use model::{ColumnUnit, SourceError, SourceFile, SourceLine};
pub use token::{SourceToken, SourceTokenKind};
pub use tokenizer::tokenize;
pub use width::{display_width, EastAsianWidth, WidthTable};
