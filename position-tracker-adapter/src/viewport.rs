use position_tracker::{Alignment, PositionTracker, ScrollPosition};

use crate::{ItemRange, visible_range};

/// Items rendered beyond each side of the visible range by default.
pub const DEFAULT_OVERSCAN: usize = 1;

/// A framework-neutral view over a [`PositionTracker`].
///
/// Holds the tracker, the current [`ScrollPosition`] and the view size, and
/// implements the workflows a renderer runs around them. It holds no UI
/// objects. Adapters drive it by calling:
/// - `set_view_size` / `set_item_count` when the container or data changes
/// - `scroll_by` / `scroll_to_index` on user input
/// - `settle` after painting, with a callback that reports rendered sizes
#[derive(Clone, Debug)]
pub struct Viewport {
    tracker: PositionTracker,
    position: ScrollPosition,
    view_size: f64,
    overscan: usize,
}

impl Viewport {
    pub fn new(tracker: PositionTracker, view_size: f64) -> Self {
        let mut viewport = Self {
            tracker,
            position: ScrollPosition::default(),
            view_size: 0.0,
            overscan: DEFAULT_OVERSCAN,
        };
        viewport.set_view_size(view_size);
        viewport
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn tracker(&self) -> &PositionTracker {
        &self.tracker
    }

    /// Direct access for changes the viewport does not need to react to.
    ///
    /// Prefer [`set_item_count`](Self::set_item_count) for count changes, which
    /// also keeps the scroll position in range.
    pub fn tracker_mut(&mut self) -> &mut PositionTracker {
        &mut self.tracker
    }

    pub fn into_tracker(self) -> PositionTracker {
        self.tracker
    }

    pub fn position(&self) -> ScrollPosition {
        self.position
    }

    pub fn view_size(&self) -> f64 {
        self.view_size
    }

    pub fn overscan(&self) -> usize {
        self.overscan
    }

    pub fn set_overscan(&mut self, overscan: usize) {
        self.overscan = overscan;
    }

    /// Ignores sizes that are negative or not finite.
    pub fn set_view_size(&mut self, view_size: f64) {
        if !view_size.is_finite() || view_size < 0.0 {
            vwarn!(view_size, "set_view_size: invalid size");
            return;
        }
        self.view_size = view_size;
    }

    /// Changes the item count, moving the position to the last item's end if
    /// it pointed past the new end.
    pub fn set_item_count(&mut self, item_count: usize) {
        self.tracker.set_item_count(item_count);
        let item_count = self.tracker.item_count();
        if item_count == 0 {
            self.position = ScrollPosition::default();
        } else if self.position.index() >= item_count {
            vdebug!(
                index = self.position.index(),
                item_count,
                "position past the end, moved to last item"
            );
            self.position = ScrollPosition::end_of(&self.tracker);
        }
    }

    /// Records a measured size; returns the previous one.
    pub fn measure(&mut self, index: usize, size: f64) -> Option<f64> {
        self.tracker.set_item_size(index, Some(size))
    }

    pub fn clear_measurement(&mut self, index: usize) -> Option<f64> {
        self.tracker.clear_item_size(index)
    }

    pub fn scroll_to(&mut self, position: ScrollPosition) {
        self.position = position;
    }

    /// Places `index` at `alignment`. Indexes past the end target the last item.
    pub fn scroll_to_index(&mut self, index: usize, alignment: Alignment) {
        self.position = match self.tracker.item_count() {
            0 => ScrollPosition::default(),
            count => ScrollPosition::new(index.min(count - 1), alignment, 0.0),
        };
    }

    /// Scrolls by `delta` pixels (negative towards the start) and returns the
    /// new view start offset.
    pub fn scroll_by(&mut self, delta: f64) -> f64 {
        self.position = self
            .position
            .scrolled_by(delta, &self.tracker, self.view_size)
            .clamped_to_view(&self.tracker, self.view_size);
        self.view_start_offset()
    }

    fn effective_position(&self) -> ScrollPosition {
        self.position.clamped_to_view(&self.tracker, self.view_size)
    }

    /// Offset of the view's leading edge, never past the last full view.
    pub fn view_start_offset(&self) -> f64 {
        self.effective_position()
            .view_start_offset(&self.tracker, self.view_size)
    }

    pub fn visible_range(&self) -> ItemRange {
        visible_range(&self.tracker, &self.effective_position(), self.view_size)
    }

    /// The visible range widened by the overscan on each side.
    pub fn rendered_range(&self) -> ItemRange {
        self.visible_range()
            .with_overscan(self.overscan, self.tracker.item_count())
    }

    /// Runs the measure-then-adjust loop until the geometry stops changing.
    ///
    /// Each pass asks `measure` for the size of every rendered item (returning
    /// `None` leaves an item as it is), records the sizes that changed, and
    /// pins the position to the last full view if it ran past it. Returns the
    /// number of passes run; a result equal to `max_passes` means the loop
    /// may not have converged.
    pub fn settle(&mut self, max_passes: usize, mut measure: impl FnMut(usize) -> Option<f64>) -> usize {
        for pass in 1..=max_passes {
            let mut changed = false;
            for index in self.rendered_range().indices() {
                let Some(size) = measure(index) else {
                    continue;
                };
                let before = self.tracker.item_measured_size(index);
                if before != Some(size) {
                    self.tracker.set_item_size(index, Some(size));
                    changed |= self.tracker.item_measured_size(index) != before;
                }
            }
            let position = self.effective_position();
            if position != self.position {
                self.position = position;
                changed = true;
            }
            if !changed {
                vdebug!(pass, "settled");
                return pass;
            }
        }
        vdebug!(max_passes, "settle: pass limit reached");
        max_passes
    }
}
