use core::cell::RefCell;
use core::mem;

use crate::node::{Node, Shape};
use crate::options::{LowSize, MAX_ITEM_COUNT, TrackerOptions, is_valid_size, validate_unmeasured_size};
use crate::ItemStats;

/// Cumulative-size index over a sequence of items whose sizes are learned
/// incrementally.
///
/// Items start out unmeasured and count as `unmeasured_size` until a size is
/// reported with [`set_item_size`](Self::set_item_size). Offsets, totals and
/// offset → index lookups are answered from a tree of per-node aggregates in
/// `O(log n)`. Prefix sums inside each node are built lazily, so queries that
/// move forward from the previous one (as during scrolling) are close to `O(1)`.
///
/// Invalid arguments never panic: they are ignored or answered with a neutral
/// value. The prefix cache is updated through `&self` reads, so the tracker is
/// `Send` but not `Sync`.
#[derive(Clone, Debug)]
pub struct PositionTracker {
    item_count: usize,
    unmeasured_size: f64,
    low_size: LowSize,
    shape: Shape,
    root_level: usize,
    root: RefCell<Node>,
}

impl Default for PositionTracker {
    fn default() -> Self {
        Self::new(TrackerOptions::default())
    }
}

impl PositionTracker {
    pub fn new(options: TrackerOptions) -> Self {
        let options = options.validated();
        vdebug!(
            item_count = options.item_count,
            unmeasured_size = options.unmeasured_size,
            max_branches = options.max_branches,
            max_leaf_items = options.max_leaf_items,
            "PositionTracker::new"
        );
        let mut shape = Shape::new(options.max_branches, options.max_leaf_items);
        let root_level = shape.level_for(options.item_count);
        let root = Node::new(shape.fan_out(root_level), options.item_count);
        Self {
            item_count: options.item_count,
            unmeasured_size: options.unmeasured_size,
            low_size: options.low_size,
            shape,
            root_level,
            root: RefCell::new(root),
        }
    }

    /// Shorthand for a tracker with default sizing.
    pub fn with_item_count(item_count: usize) -> Self {
        Self::new(TrackerOptions::new(item_count))
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    pub fn unmeasured_size(&self) -> f64 {
        self.unmeasured_size
    }

    pub fn low_size(&self) -> &LowSize {
        &self.low_size
    }

    pub fn max_branches(&self) -> usize {
        self.shape.max_branches()
    }

    pub fn max_leaf_items(&self) -> usize {
        self.shape.max_leaf_items()
    }

    /// Changes the size assumed for unmeasured items. Invalid values are ignored.
    ///
    /// This is `O(1)`: the tree only stores counts of unmeasured items.
    pub fn set_unmeasured_size(&mut self, unmeasured_size: f64) {
        let Some(unmeasured_size) = validate_unmeasured_size(unmeasured_size) else {
            return;
        };
        self.unmeasured_size = unmeasured_size;
        self.low_size = mem::take(&mut self.low_size).validated(unmeasured_size);
    }

    pub fn set_low_size(&mut self, low_size: impl Into<LowSize>) {
        self.low_size = low_size.into().validated(self.unmeasured_size);
    }

    /// Forgets every measurement while keeping the item count.
    pub fn clear_all_item_sizes(&mut self) {
        self.reset_tree();
    }

    fn reset_tree(&mut self) {
        self.root_level = self.shape.level_for(self.item_count);
        let root = Node::new(self.shape.fan_out(self.root_level), self.item_count);
        *self.root.get_mut() = root;
    }

    /// Grows or shrinks the sequence at its tail.
    ///
    /// New items are unmeasured. Only the nodes along the boundary path are
    /// touched; levels are added or released as the capacity requires.
    pub fn set_item_count(&mut self, item_count: usize) {
        if item_count > MAX_ITEM_COUNT {
            vwarn!(item_count, "set_item_count: count exceeds maximum");
            return;
        }
        let old_count = self.item_count;
        if item_count == old_count {
            return;
        }
        vdebug!(old_count, item_count, "set_item_count");
        self.item_count = item_count;
        if item_count == 0 || old_count == 0 {
            self.reset_tree();
            return;
        }

        let new_root_level = self.shape.level_for(item_count);
        let shape = &self.shape;
        let root = self.root.get_mut();
        let mut level = self.root_level;
        if item_count < old_count {
            root.truncate(shape, level, old_count, item_count);
            while level > new_root_level {
                let old_root = mem::replace(root, Node::new(0, 0));
                *root = old_root.into_first_branch(shape.fan_out(level - 1), item_count);
                level -= 1;
                vdebug!(level, "released root level");
            }
        } else {
            let filled = item_count.min(shape.capacity(level));
            if filled > old_count {
                root.extend(shape, level, old_count, filled);
            }
            while level < new_root_level {
                let child_capacity = shape.capacity(level);
                level += 1;
                let len = item_count.min(shape.capacity(level));
                let old_root = mem::replace(root, Node::new(0, 0));
                *root = Node::wrap(old_root, child_capacity, shape.fan_out(level), len);
                vdebug!(level, "added root level");
            }
        }
        self.root_level = level;
    }

    /// Records the size of an item (`Some`) or resets it to unmeasured (`None`).
    ///
    /// Returns the previous measured size. Out-of-range indexes and sizes that
    /// are not finite values in `0..=MAX_SIZE` leave the tracker untouched and
    /// return `None`.
    pub fn set_item_size(&mut self, index: usize, size: Option<f64>) -> Option<f64> {
        if index >= self.item_count {
            vwarn!(index, item_count = self.item_count, "set_item_size: index out of range");
            return None;
        }
        if let Some(size) = size {
            if !is_valid_size(size) {
                vwarn!(index, size, "set_item_size: invalid size");
                return None;
            }
        }
        vtrace!(index, ?size, "set_item_size");
        let (old, _delta) = self.root.get_mut().set_item_size(
            &self.shape,
            self.root_level,
            index,
            self.item_count,
            size,
        );
        old
    }

    /// Resets an item to unmeasured, returning its previous measured size.
    pub fn clear_item_size(&mut self, index: usize) -> Option<f64> {
        self.set_item_size(index, None)
    }

    /// Applies a batch of measurements; returns how many were accepted.
    pub fn set_item_sizes(&mut self, sizes: impl IntoIterator<Item = (usize, f64)>) -> usize {
        let mut applied = 0usize;
        for (index, size) in sizes {
            if index < self.item_count && is_valid_size(size) {
                self.set_item_size(index, Some(size));
                applied += 1;
            }
        }
        applied
    }

    /// Returns the measured size, or `None` if the item is unmeasured or out of range.
    pub fn item_measured_size(&self, index: usize) -> Option<f64> {
        if index >= self.item_count {
            return None;
        }
        self.root
            .borrow()
            .item_measured_size(&self.shape, self.root_level, index)
    }

    pub fn is_measured(&self, index: usize) -> bool {
        self.item_measured_size(index).is_some()
    }

    /// Returns the measured size, or the unmeasured size as an estimate.
    pub fn item_size(&self, index: usize) -> f64 {
        self.item_measured_size(index)
            .unwrap_or(self.unmeasured_size)
    }

    /// Returns the measured size, or the low size as a lower bound.
    pub fn item_low_size(&self, index: usize) -> f64 {
        match self.item_measured_size(index) {
            Some(size) => size,
            None => self.low_size.resolve(index, self.unmeasured_size),
        }
    }

    /// Returns the position and size of an item.
    ///
    /// Indexes at or past `item_count` yield a zero-sized sentinel at the total size.
    pub fn item_stats(&self, index: usize) -> ItemStats {
        if index >= self.item_count {
            return ItemStats::sentinel(self.total_size());
        }
        let (start, size, is_measured) = self.root.borrow_mut().item_stats(
            &self.shape,
            self.root_level,
            index,
            self.item_count,
            self.unmeasured_size,
        );
        ItemStats {
            start,
            size,
            end: start + size,
            is_measured,
        }
    }

    /// Sum of measured sizes plus `unmeasured_size` for every unmeasured item.
    pub fn total_size(&self) -> f64 {
        self.root.borrow().total_size(self.unmeasured_size)
    }

    /// Returns the index of the item whose `[start, end)` contains `offset`.
    ///
    /// Offsets below zero (or not finite) resolve to `0`; offsets at or past
    /// the total size resolve to the last item. Zero-sized items never
    /// contain an offset, so a leading run of them is skipped even at `0`.
    pub fn containing_index(&self, offset: f64) -> usize {
        if self.item_count == 0 || !offset.is_finite() || offset < 0.0 {
            return 0;
        }
        let last = self.item_count - 1;
        if offset >= self.total_size() {
            return last;
        }
        let index = self.root.borrow_mut().containing_index(
            &self.shape,
            self.root_level,
            offset,
            self.item_count,
            self.unmeasured_size,
        );
        index.min(last)
    }
}
