//! Column conflicts
//!
//!     Two captures can land on the same column: `f(x)` and `f` both anchor at `f`, a chain
//!     anchors each link at its own member name but an implicit conversion may repeat one.
//!     Within such a group, a capture whose text is also printed at some other column is
//!     redundant and goes. When that would empty the group, the first capture visited (the
//!     outermost one) stays.

use super::captor::CapturedExpression;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Resolve collisions; the result is sorted by column with exact duplicates removed.
pub fn resolve(captures: Vec<CapturedExpression>) -> Vec<CapturedExpression> {
    let mut columns_of_text: HashMap<String, HashSet<usize>> = HashMap::new();
    for capture in &captures {
        columns_of_text
            .entry(capture.text.clone())
            .or_default()
            .insert(capture.column);
    }

    let mut groups: BTreeMap<usize, Vec<CapturedExpression>> = BTreeMap::new();
    for capture in captures {
        groups.entry(capture.column).or_default().push(capture);
    }

    let mut resolved = Vec::new();
    for (column, group) in groups {
        if group.len() == 1 {
            resolved.extend(group);
            continue;
        }
        let printed_elsewhere = |capture: &CapturedExpression| {
            columns_of_text
                .get(&capture.text)
                .is_some_and(|columns| columns.iter().any(|c| *c != column))
        };
        let (kept, dropped): (Vec<_>, Vec<_>) =
            group.into_iter().partition(|c| !printed_elsewhere(c));
        if kept.is_empty() {
            resolved.extend(dropped.into_iter().take(1));
        } else {
            resolved.extend(kept);
        }
    }

    let mut seen = HashSet::new();
    resolved.retain(|c| seen.insert((c.text.clone(), c.column)));
    resolved
}
