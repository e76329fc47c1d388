//! Diagram renderer
//!
//!     Lays recorded values out under the assertion text:
//!
//!         XCTAssert(bar.val == bar.foo.val)
//!                   |   |   |  |   |   |
//!                   |   3   |  |   |   2
//!                   |       |  |   Foo(val: 2)
//!                   |       |  Bar(foo: Foo(val: 2), val: 3)
//!                   |       false
//!                   Bar(foo: Foo(val: 2), val: 3)
//!
//!     The first row is the text, the second a `|` under every column. Each following row
//!     walks the values still waiting, left to right: a value is printed when it is the
//!     rightmost one or when it ends before the next value's column, and leaves the queue;
//!     otherwise a `|` holds its column. The rightmost value always goes, so every row
//!     shortens the queue.

use crate::instrument::source::display_width;

/// Render the diagram. Values are `(display column, text)`; a repeated column keeps its
/// first value.
pub fn render_diagram(text: &str, values: &[(usize, String)]) -> String {
    let mut queue: Vec<(usize, String)> = Vec::with_capacity(values.len());
    for (column, value) in values {
        if !queue.iter().any(|(c, _)| c == column) {
            queue.push((*column, escape_newlines(value)));
        }
    }
    queue.sort_by_key(|(column, _)| *column);

    let mut rows = vec![text.to_string()];
    if queue.is_empty() {
        return rows.join("\n");
    }

    let mut guide = String::new();
    for (column, _) in &queue {
        pad(&mut guide, *column);
        guide.push('|');
    }
    rows.push(guide);

    while !queue.is_empty() {
        let mut row = String::new();
        let mut waiting = Vec::new();
        for (index, (column, value)) in queue.iter().enumerate() {
            pad(&mut row, *column);
            let fits = queue
                .get(index + 1)
                .map_or(true, |(next, _)| column + display_width(value) < *next);
            if fits {
                row.push_str(value);
            } else {
                row.push('|');
                waiting.push((*column, value.clone()));
            }
        }
        rows.push(row.trim_end().to_string());
        queue = waiting;
    }
    rows.join("\n")
}

fn pad(row: &mut String, column: usize) {
    let width = display_width(row);
    if width < column {
        row.push_str(&" ".repeat(column - width));
    }
}

fn escape_newlines(value: &str) -> String {
    value.replace('\r', "\\r").replace('\n', "\\n")
}
