//! Runtime
//!
//!     What the generated code calls into when the instrumented tests run:
//!
//!     - [recorder](recorder): collects the outcome and the values, keyed by column.
//!     - [renderer](renderer): lays the values out into the diagram.
//!     - [support](support): the Swift source of the same recorder, for the test target.

pub mod recorder;
pub mod renderer;
pub mod support;

pub use recorder::Recorder;
pub use renderer::render_diagram;
pub use support::{support_source, SupportError, CONTRACT, SUPPORT_FILE_NAME};
