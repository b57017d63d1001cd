use crate::{Alignment, PositionTracker};

/// A target view location expressed relative to an item.
///
/// The position is `offset` pixels past the `alignment` point of item
/// `index`. It never holds a tracker; every conversion takes the tracker and
/// view size it should be resolved against, so the same value can be
/// re-resolved after items are measured or the view is resized.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollPosition {
    index: usize,
    alignment: Alignment,
    offset: f64,
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

impl ScrollPosition {
    pub fn new(index: usize, alignment: Alignment, offset: f64) -> Self {
        Self {
            index,
            alignment,
            offset: finite_or_zero(offset),
        }
    }

    /// The end of `tracker`'s last item, or the zero position when it is empty.
    pub fn end_of(tracker: &PositionTracker) -> Self {
        match tracker.item_count() {
            0 => Self::default(),
            count => Self::new(count - 1, Alignment::End, 0.0),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Replaces every field in place.
    pub fn update(&mut self, index: usize, alignment: Alignment, offset: f64) {
        *self = Self::new(index, alignment, offset);
    }

    pub fn update_from(&mut self, other: &ScrollPosition) {
        *self = *other;
    }

    /// Absolute offset of this position, clamped to `[0, total_size]`.
    pub fn total_offset(&self, tracker: &PositionTracker, view_size: f64) -> f64 {
        let stats = tracker.item_stats(self.index);
        let anchor = match self.alignment {
            Alignment::Start => 0.0,
            Alignment::Center => stats.size.min(view_size) / 2.0,
            Alignment::End => stats.size,
        };
        let total = stats.start + anchor + self.offset;
        total.min(tracker.total_size()).max(0.0)
    }

    /// Offset that should become the leading edge of the view, clamped to `[0, total_size]`.
    pub fn view_start_offset(&self, tracker: &PositionTracker, view_size: f64) -> f64 {
        let total = self.total_offset(tracker, view_size);
        let shift = match self.alignment {
            Alignment::Start => 0.0,
            Alignment::Center => (-view_size / 2.0).min(0.0),
            Alignment::End => -view_size,
        };
        (total + shift).min(tracker.total_size()).max(0.0)
    }

    /// Same item, different alignment, with the offset adjusted so the view
    /// lands in the same place.
    ///
    /// Alignments also move the view's reference edge: going from `Start` to
    /// `End` moves it down by a full `view_size`, neighbouring alignments by half.
    pub fn change_alignment(
        &self,
        alignment: Alignment,
        tracker: &PositionTracker,
        view_size: f64,
    ) -> Self {
        let total = self.total_offset(tracker, view_size);
        let mut realigned = Self::new(self.index, alignment, self.offset);
        let realigned_total = realigned.total_offset(tracker, view_size);
        let view_delta = (edge_fraction(alignment) - edge_fraction(self.alignment)) * view_size;
        realigned.offset += total + view_delta - realigned_total;
        realigned
    }

    /// Same anchor, offset moved by `delta`. A non-finite delta is ignored.
    pub fn increment_offset(&self, delta: f64) -> Self {
        Self::new(self.index, self.alignment, self.offset + finite_or_zero(delta))
    }

    /// Re-anchors to the item that actually contains the resolved offset.
    ///
    /// Offsets at either end of the sequence resolve to `{0, Start, 0}` and
    /// `{last, End, 0}`. On a boundary between items `k` and `k + 1`, an `End`
    /// position is attributed to item `k` with a zero offset; a `Center`
    /// position goes to item `k` only when its own offset was positive.
    pub fn with_containing_index(&self, tracker: &PositionTracker, view_size: f64) -> Self {
        if tracker.item_count() == 0 {
            return Self::default();
        }
        let total = self.total_offset(tracker, view_size);
        if total <= 0.0 {
            return Self::default();
        }
        if total >= tracker.total_size() {
            return Self::end_of(tracker);
        }

        let index = tracker.containing_index(total);
        let start = Self::new(index, Alignment::Start, 0.0).total_offset(tracker, view_size);
        let mut anchored = Self::new(index, self.alignment, 0.0);
        if total == start && index > 0 {
            match self.alignment {
                Alignment::End => anchored.index -= 1,
                Alignment::Center if self.offset > 0.0 => anchored.index -= 1,
                _ => {}
            }
        }
        anchored.offset = total - anchored.total_offset(tracker, view_size);
        anchored
    }

    /// One scroll step of `delta` pixels.
    ///
    /// The position is realigned to the edge that leads in the scroll
    /// direction (`End` when scrolling back, `Start` otherwise), moved, and
    /// re-anchored to the containing item.
    pub fn scrolled_by(&self, delta: f64, tracker: &PositionTracker, view_size: f64) -> Self {
        let alignment = if delta < 0.0 {
            Alignment::End
        } else {
            Alignment::Start
        };
        self.change_alignment(alignment, tracker, view_size)
            .increment_offset(delta)
            .with_containing_index(tracker, view_size)
    }

    /// Pins the position to the end of the sequence if its view would start
    /// past the last full view.
    pub fn clamped_to_view(&self, tracker: &PositionTracker, view_size: f64) -> Self {
        if tracker.item_count() == 0 {
            return Self::default();
        }
        let max_view_start = (tracker.total_size() - view_size).max(0.0);
        if self.view_start_offset(tracker, view_size) > max_view_start {
            Self::end_of(tracker)
        } else {
            *self
        }
    }
}

/// Fraction of the view between its leading edge and an alignment's reference edge.
fn edge_fraction(alignment: Alignment) -> f64 {
    match alignment {
        Alignment::Start => 0.0,
        Alignment::Center => 0.5,
        Alignment::End => 1.0,
    }
}
