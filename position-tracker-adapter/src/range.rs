use core::ops::Range;

use position_tracker::{PositionTracker, ScrollPosition};

/// A half-open range of item indexes, `[start_index, end_index)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemRange {
    pub start_index: usize,
    pub end_index: usize,
}

impl ItemRange {
    pub fn new(start_index: usize, end_index: usize) -> Self {
        Self {
            start_index,
            end_index: end_index.max(start_index),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start_index >= self.end_index
    }

    pub fn len(&self) -> usize {
        self.end_index.saturating_sub(self.start_index)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.start_index <= index && index < self.end_index
    }

    pub fn indices(&self) -> Range<usize> {
        self.start_index..self.end_index
    }

    /// Widens the range by `overscan` items on each side, clamped to `[0, item_count)`.
    pub fn with_overscan(&self, overscan: usize, item_count: usize) -> Self {
        if self.is_empty() || item_count == 0 {
            return Self::default();
        }
        let end_index = self.end_index.saturating_add(overscan).min(item_count);
        Self::new(self.start_index.saturating_sub(overscan).min(end_index), end_index)
    }
}

/// Computes the items covering a view of `view_size` placed at `position`.
///
/// The walk starts from the item containing the position and moves outwards
/// by each item's *low size*, so unmeasured items are assumed as small as they
/// can be and the range errs on covering too much. An item that starts exactly
/// at the view's trailing edge is included. When the walk reaches either end
/// of the sequence before the view is filled, the other side keeps growing.
pub fn visible_range(
    tracker: &PositionTracker,
    position: &ScrollPosition,
    view_size: f64,
) -> ItemRange {
    let item_count = tracker.item_count();
    if item_count == 0 {
        return ItemRange::default();
    }
    let last_index = item_count - 1;
    let view_start = position.view_start_offset(tracker, view_size).max(0.0);
    let view_end = (view_start + view_size).min(tracker.total_size());

    let total_offset = position.total_offset(tracker, view_size);
    let mut root = position.index().min(last_index);
    let mut root_stats = tracker.item_stats(root);
    if total_offset < root_stats.start || total_offset > root_stats.end {
        root = position.with_containing_index(tracker, view_size).index();
        root_stats = tracker.item_stats(root);
    }

    // Inclusive bounds while walking.
    let (mut first, mut last) = (root, root);
    let mut leading = root_stats.start;
    while leading > view_start && first > 0 {
        first -= 1;
        leading -= tracker.item_low_size(first);
    }
    let mut trailing = root_stats.end;
    while trailing <= view_end && last < last_index {
        last += 1;
        trailing += tracker.item_low_size(last);
    }

    if trailing - leading < view_size {
        if last == last_index {
            while trailing - leading < view_size && first > 0 {
                first -= 1;
                leading -= tracker.item_low_size(first);
            }
        }
        if first == 0 {
            while trailing - leading < view_size && last < last_index {
                last += 1;
                trailing += tracker.item_low_size(last);
            }
        }
    }

    ItemRange::new(first, last + 1)
}
