//! Choosing which labels to draw for a view range.
//!
//! Records are assumed sorted by start. The plot keeps them that way after
//! every edit and sorts once on load when an external writer did not.

use crate::event::ComplexEvent;
use crate::view::Range;

/// Indices of `records` to render for the X range `view` (display units).
///
/// The window starts at the first record whose stop lies right of the view
/// and ends at the last record (scanning back to index 1) whose start lies
/// left of the view's end. Windows wider than `max_plotted` are subsampled
/// with a ceiling stride so exactly `max_plotted` indices come back.
pub fn plotted_indices(
    records: &[ComplexEvent],
    scaling_factor: f64,
    view: Range,
    max_plotted: usize,
) -> Vec<usize> {
    if records.is_empty() {
        return Vec::new();
    }
    let first_idx = records
        .iter()
        .position(|record| record.stop / scaling_factor > view.min)
        .unwrap_or(0);
    let last_idx = (1..records.len())
        .rev()
        .find(|&index| records[index].start / scaling_factor < view.max)
        .unwrap_or(first_idx);
    if last_idx < first_idx {
        return Vec::new();
    }

    let n = last_idx - first_idx;
    if n > max_plotted {
        tracing::debug!(
            "Subsampling {} labels down to {}",
            n + 1,
            max_plotted
        );
        (0..max_plotted)
            .map(|i| first_idx + (i * n).div_ceil(max_plotted))
            .collect()
    } else {
        (first_idx..=last_idx).collect()
    }
}

/// Check whether records are in non-decreasing start order.
pub fn is_sorted_by_start(records: &[ComplexEvent]) -> bool {
    records
        .windows(2)
        .all(|pair| pair[0].start.total_cmp(&pair[1].start).is_le())
}

/// Stable ordering of records by ascending start.
///
/// Position `i` of the result is the index of the record that belongs there.
pub fn sort_order(records: &[ComplexEvent]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..records.len()).collect();
    order.sort_by(|&a, &b| records[a].start.total_cmp(&records[b].start));
    order
}

/// How the two boundary lines of a rendered label are colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryColors {
    /// Theme default on both lines.
    Default,
    /// Selected: both lines red.
    Selected,
    /// Starts where a selected label stopped: shared line yellow, far line red.
    AfterSelected,
}

/// Left-to-right coloring pass over the rendered labels.
///
/// A label that starts exactly where a selected predecessor stopped would
/// paint its default-colored start line over the predecessor's red stop line.
#[derive(Debug, Default)]
pub(crate) struct AdjacencyColoring {
    prev_was_selected: bool,
    prev_stop: Option<f64>,
}

impl AdjacencyColoring {
    /// Colors for the next rendered label (raw times).
    pub(crate) fn next(&mut self, record: &ComplexEvent, selected: bool) -> BoundaryColors {
        let colors = if selected {
            self.prev_was_selected = true;
            BoundaryColors::Selected
        } else if self.prev_was_selected && self.prev_stop == Some(record.start) {
            self.prev_was_selected = false;
            BoundaryColors::AfterSelected
        } else {
            self.prev_was_selected = false;
            BoundaryColors::Default
        };
        self.prev_stop = Some(record.stop);
        colors
    }
}
