//! Recorder
//!
//!     The object generated code builds for every assertion, in Rust form:
//!
//!         Recorder::new("XCTAssertEqual(a.count, 3)", 12)
//!             .assert_equality(a.len(), 3, ComparisonOperator::Equal)
//!             .record(15, || a.clone())
//!             .render()
//!
//!     Values are closures. They run at most once, and only when the assertion failed and the
//!     diagram is rendered. A second value at an already recorded column is ignored.

use super::renderer::render_diagram;
use crate::instrument::locating::ComparisonOperator;
use std::collections::BTreeMap;
use std::fmt;

type Value<'a> = Box<dyn FnOnce() -> String + 'a>;

pub struct Recorder<'a> {
    text: String,
    line: usize,
    passed: bool,
    message: Option<String>,
    values: BTreeMap<usize, Value<'a>>,
}

impl<'a> Recorder<'a> {
    pub fn new(text: &str, line: usize) -> Self {
        Self {
            text: text.to_string(),
            line,
            passed: true,
            message: None,
            values: BTreeMap::new(),
        }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn passed(&self) -> bool {
        self.passed
    }

    /// `.isTrue` and `.isFalse`.
    pub fn assert_boolean(mut self, value: bool, op: ComparisonOperator) -> Self {
        self.passed = match op {
            ComparisonOperator::IsFalse => !value,
            _ => value,
        };
        self
    }

    /// `.equal` and `.notEqual`.
    pub fn assert_equality<T: PartialEq>(mut self, lhs: T, rhs: T, op: ComparisonOperator) -> Self {
        self.passed = match op {
            ComparisonOperator::NotEqual => lhs != rhs,
            _ => lhs == rhs,
        };
        self
    }

    /// The ordering operators. Unordered operands fail.
    pub fn assert_comparable<T: PartialOrd>(
        mut self,
        lhs: T,
        rhs: T,
        op: ComparisonOperator,
    ) -> Self {
        self.passed = lhs
            .partial_cmp(&rhs)
            .and_then(|ordering| op.accepts(ordering))
            .unwrap_or(false);
        self
    }

    /// `.isNil` and `.isNotNil`.
    pub fn assert_nil<T>(mut self, value: Option<T>, op: ComparisonOperator) -> Self {
        self.passed = match op {
            ComparisonOperator::IsNotNil => value.is_some(),
            _ => value.is_none(),
        };
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn record<V, F>(mut self, column: usize, value: F) -> Self
    where
        V: fmt::Display,
        F: FnOnce() -> V + 'a,
    {
        self.values
            .entry(column)
            .or_insert_with(|| Box::new(move || value().to_string()));
        self
    }

    /// `None` when the assertion passed; the diagram, followed by the message if any,
    /// when it failed.
    pub fn render(self) -> Option<String> {
        if self.passed {
            return None;
        }
        let values: Vec<(usize, String)> = self
            .values
            .into_iter()
            .map(|(column, value)| (column, value()))
            .collect();
        let diagram = render_diagram(&self.text, &values);
        Some(match self.message {
            Some(message) if !message.is_empty() => format!("{}\n\n{}", diagram, message),
            _ => diagram,
        })
    }
}

impl fmt::Debug for Recorder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recorder")
            .field("text", &self.text)
            .field("line", &self.line)
            .field("passed", &self.passed)
            .field("columns", &self.values.keys().collect::<Vec<_>>())
            .finish()
    }
}
