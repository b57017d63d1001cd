use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;
use core::mem;

/// Fan-out and per-level capacities of a tracker's tree.
///
/// Level 0 nodes are leaves holding raw item slots. A node at level `l` holds
/// `capacities[l]` items; its children each hold `capacities[l - 1]`.
#[derive(Clone, Debug)]
pub(crate) struct Shape {
    max_branches: usize,
    max_leaf_items: usize,
    capacities: Vec<usize>,
}

impl Shape {
    pub(crate) fn new(max_branches: usize, max_leaf_items: usize) -> Self {
        Self {
            max_branches,
            max_leaf_items,
            capacities: vec![max_leaf_items],
        }
    }

    pub(crate) fn max_branches(&self) -> usize {
        self.max_branches
    }

    pub(crate) fn max_leaf_items(&self) -> usize {
        self.max_leaf_items
    }

    /// Returns the lowest level whose node capacity covers `item_count`.
    pub(crate) fn level_for(&mut self, item_count: usize) -> usize {
        let mut level = 0;
        loop {
            if level == self.capacities.len() {
                let next = self.capacities[level - 1].saturating_mul(self.max_branches);
                self.capacities.push(next);
            }
            if self.capacities[level] >= item_count {
                return level;
            }
            level += 1;
        }
    }

    pub(crate) fn capacity(&self, level: usize) -> usize {
        self.capacities[level]
    }

    pub(crate) fn fan_out(&self, level: usize) -> usize {
        if level == 0 {
            self.max_leaf_items
        } else {
            self.max_branches
        }
    }

    pub(crate) fn child_capacity(&self, level: usize) -> usize {
        if level == 0 {
            1
        } else {
            self.capacities[level - 1]
        }
    }
}

/// Number of live items in `branch` of a node holding `len` items.
fn live_count(branch: usize, child_capacity: usize, len: usize) -> usize {
    len.saturating_sub(branch.saturating_mul(child_capacity))
        .min(child_capacity)
}

/// Change of a subtree's aggregates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Delta {
    pub(crate) measured_size: f64,
    pub(crate) unmeasured_count: i64,
}

impl Delta {
    fn between(old: Option<f64>, new: Option<f64>) -> Self {
        Self {
            measured_size: new.unwrap_or(0.0) - old.unwrap_or(0.0),
            unmeasured_count: i64::from(new.is_none()) - i64::from(old.is_none()),
        }
    }

    fn is_zero(&self) -> bool {
        self.measured_size == 0.0 && self.unmeasured_count == 0
    }

    fn remove(&mut self, measured_size: f64, unmeasured_count: usize) {
        self.measured_size -= measured_size;
        self.unmeasured_count -= unmeasured_count as i64;
    }
}

impl core::ops::AddAssign for Delta {
    fn add_assign(&mut self, rhs: Self) {
        self.measured_size += rhs.measured_size;
        self.unmeasured_count += rhs.unmeasured_count;
    }
}

#[derive(Clone, Debug)]
pub(crate) enum Slot {
    /// No measurement below this slot. For a branch slot every live item is unmeasured.
    Unmeasured,
    /// A measured leaf item.
    Measured(f64),
    Subtree(Box<Node>),
}

/// A tree node with lazily accumulated prefix sums over its branches.
///
/// `prefix_measured[b]` and `prefix_unmeasured[b]` hold the totals of branches
/// `0..b`. Only entries `0..=high_water` are valid; later entries are stale and
/// are rebuilt on demand.
#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub(crate) measured_size: f64,
    pub(crate) unmeasured_count: usize,
    high_water: usize,
    prefix_measured: Vec<f64>,
    prefix_unmeasured: Vec<usize>,
    slots: Vec<Slot>,
}

impl Node {
    pub(crate) fn new(fan_out: usize, unmeasured_count: usize) -> Self {
        let mut slots = Vec::with_capacity(fan_out);
        slots.resize_with(fan_out, || Slot::Unmeasured);
        Self {
            measured_size: 0.0,
            unmeasured_count,
            high_water: 0,
            prefix_measured: vec![0.0; fan_out + 1],
            prefix_unmeasured: vec![0; fan_out + 1],
            slots,
        }
    }

    /// Builds a parent whose first branch is `child`, a full node of `child_capacity` items.
    pub(crate) fn wrap(child: Node, child_capacity: usize, fan_out: usize, len: usize) -> Self {
        debug_assert!(child.unmeasured_count <= child_capacity);
        let measured_count = child_capacity - child.unmeasured_count;
        let mut parent = Self::new(fan_out, len - measured_count);
        if measured_count > 0 {
            parent.measured_size = child.measured_size;
            parent.slots[0] = Slot::Subtree(Box::new(child));
        }
        parent
    }

    /// Detaches the first branch, which must hold every live item of this node.
    pub(crate) fn into_first_branch(mut self, child_fan_out: usize, len: usize) -> Self {
        match mem::replace(&mut self.slots[0], Slot::Unmeasured) {
            Slot::Subtree(child) => *child,
            _ => Self::new(child_fan_out, len),
        }
    }

    pub(crate) fn total_size(&self, unmeasured_size: f64) -> f64 {
        self.measured_size + self.unmeasured_count as f64 * unmeasured_size
    }

    fn apply(&mut self, delta: Delta) {
        self.measured_size += delta.measured_size;
        let count = self.unmeasured_count as i64 + delta.unmeasured_count;
        debug_assert!(count >= 0, "unmeasured count underflow ({count})");
        self.unmeasured_count = count.max(0) as usize;
    }

    /// Marks prefix entries past `branch` as stale.
    fn rewind(&mut self, branch: usize) {
        if self.high_water > branch {
            self.high_water = branch;
        }
    }

    fn branch_stats(&self, branch: usize, child_capacity: usize, len: usize) -> (f64, usize) {
        match &self.slots[branch] {
            Slot::Unmeasured => (0.0, live_count(branch, child_capacity, len)),
            Slot::Measured(size) => (*size, 0),
            Slot::Subtree(child) => (child.measured_size, child.unmeasured_count),
        }
    }

    /// Extends the valid prefix range so that the start of `branch` is known.
    fn accumulate_to(&mut self, branch: usize, child_capacity: usize, len: usize) {
        while self.high_water < branch {
            let b = self.high_water;
            let (measured, unmeasured) = self.branch_stats(b, child_capacity, len);
            self.prefix_measured[b + 1] = self.prefix_measured[b] + measured;
            self.prefix_unmeasured[b + 1] = self.prefix_unmeasured[b] + unmeasured;
            self.high_water = b + 1;
        }
    }

    fn branch_start(&self, branch: usize, unmeasured_size: f64) -> f64 {
        self.prefix_measured[branch] + self.prefix_unmeasured[branch] as f64 * unmeasured_size
    }

    pub(crate) fn item_measured_size(&self, shape: &Shape, level: usize, index: usize) -> Option<f64> {
        let child_capacity = shape.child_capacity(level);
        match &self.slots[index / child_capacity] {
            Slot::Measured(size) => Some(*size),
            Slot::Unmeasured => None,
            Slot::Subtree(child) => {
                child.item_measured_size(shape, level - 1, index % child_capacity)
            }
        }
    }

    /// Sets (`Some`) or clears (`None`) the size of `index`, returning the
    /// previous measurement and the change applied to this node.
    pub(crate) fn set_item_size(
        &mut self,
        shape: &Shape,
        level: usize,
        index: usize,
        len: usize,
        size: Option<f64>,
    ) -> (Option<f64>, Delta) {
        let child_capacity = shape.child_capacity(level);
        let branch = index / child_capacity;
        let (old, delta) = if level == 0 {
            let old = match self.slots[branch] {
                Slot::Measured(size) => Some(size),
                _ => None,
            };
            self.slots[branch] = match size {
                Some(size) => Slot::Measured(size),
                None => Slot::Unmeasured,
            };
            (old, Delta::between(old, size))
        } else {
            let live = live_count(branch, child_capacity, len);
            if !matches!(self.slots[branch], Slot::Subtree(_)) {
                if size.is_none() {
                    return (None, Delta::default());
                }
                let child = Node::new(shape.fan_out(level - 1), live);
                self.slots[branch] = Slot::Subtree(Box::new(child));
            }
            let Slot::Subtree(child) = &mut self.slots[branch] else {
                return (None, Delta::default());
            };
            let (old, mut delta) =
                child.set_item_size(shape, level - 1, index % child_capacity, live, size);
            if child.unmeasured_count == live {
                // Release the subtree along with any rounding residue it still carries.
                delta.measured_size -= child.measured_size;
                self.slots[branch] = Slot::Unmeasured;
            }
            (old, delta)
        };
        if !delta.is_zero() {
            self.rewind(branch);
            self.apply(delta);
        }
        (old, delta)
    }

    /// Returns `(start, size, is_measured)` for `index`, relative to this node.
    pub(crate) fn item_stats(
        &mut self,
        shape: &Shape,
        level: usize,
        index: usize,
        len: usize,
        unmeasured_size: f64,
    ) -> (f64, f64, bool) {
        let child_capacity = shape.child_capacity(level);
        let branch = index / child_capacity;
        let live = live_count(branch, child_capacity, len);
        self.accumulate_to(branch, child_capacity, len);
        let start = self.branch_start(branch, unmeasured_size);
        match &mut self.slots[branch] {
            Slot::Measured(size) => (start, *size, true),
            Slot::Unmeasured => {
                let within = (index % child_capacity) as f64 * unmeasured_size;
                (start + within, unmeasured_size, false)
            }
            Slot::Subtree(child) => {
                let (child_start, size, is_measured) =
                    child.item_stats(shape, level - 1, index % child_capacity, live, unmeasured_size);
                (start + child_start, size, is_measured)
            }
        }
    }

    /// Finds the item whose interval contains `offset`, relative to this node.
    ///
    /// Inside the cached prefix range this is a binary search; past it the
    /// prefix sums are extended branch by branch, so scans that move forward
    /// from the previous query only touch a few new branches.
    pub(crate) fn containing_index(
        &mut self,
        shape: &Shape,
        level: usize,
        offset: f64,
        len: usize,
        unmeasured_size: f64,
    ) -> usize {
        debug_assert!(len > 0);
        let child_capacity = shape.child_capacity(level);
        let last_branch = (len - 1) / child_capacity;
        let high_water = self.high_water.min(last_branch);

        let branch = if offset < self.branch_start(high_water, unmeasured_size) {
            // start(lo) <= offset < start(hi)
            let (mut lo, mut hi) = (0, high_water);
            while lo + 1 < hi {
                let mid = (lo + hi) / 2;
                if offset < self.branch_start(mid, unmeasured_size) {
                    hi = mid;
                } else {
                    lo = mid;
                }
            }
            lo
        } else {
            let mut branch = high_water;
            while branch < last_branch {
                self.accumulate_to(branch + 1, child_capacity, len);
                if offset < self.branch_start(branch + 1, unmeasured_size) {
                    break;
                }
                branch += 1;
            }
            branch
        };

        let within = offset - self.branch_start(branch, unmeasured_size);
        let live = live_count(branch, child_capacity, len);
        let base = branch * child_capacity;
        match &mut self.slots[branch] {
            Slot::Measured(_) => base,
            Slot::Unmeasured => {
                let step = if within > 0.0 {
                    (within / unmeasured_size) as usize
                } else {
                    0
                };
                base + step.min(live - 1)
            }
            Slot::Subtree(child) => {
                base + child.containing_index(shape, level - 1, within, live, unmeasured_size)
            }
        }
    }

    /// Appends unmeasured items so this node goes from `old_len` to `new_len` items.
    ///
    /// Requires `0 < old_len < new_len <= shape.capacity(level)`.
    pub(crate) fn extend(&mut self, shape: &Shape, level: usize, old_len: usize, new_len: usize) {
        let child_capacity = shape.child_capacity(level);
        let old_last = (old_len - 1) / child_capacity;
        if let Slot::Subtree(child) = &mut self.slots[old_last] {
            let old_live = live_count(old_last, child_capacity, old_len);
            let new_live = live_count(old_last, child_capacity, new_len);
            if new_live > old_live {
                child.extend(shape, level - 1, old_live, new_live);
            }
        }
        self.rewind(old_last);
        self.unmeasured_count += new_len - old_len;
    }

    /// Drops the items `new_len..old_len`, returning the change applied to this node.
    ///
    /// Requires `0 < new_len < old_len <= shape.capacity(level)`.
    pub(crate) fn truncate(
        &mut self,
        shape: &Shape,
        level: usize,
        old_len: usize,
        new_len: usize,
    ) -> Delta {
        let child_capacity = shape.child_capacity(level);
        let old_last = (old_len - 1) / child_capacity;
        let new_last = (new_len - 1) / child_capacity;
        let mut delta = Delta::default();
        for branch in new_last + 1..=old_last {
            let (measured, unmeasured) = self.branch_stats(branch, child_capacity, old_len);
            delta.remove(measured, unmeasured);
            self.slots[branch] = Slot::Unmeasured;
        }

        let old_live = live_count(new_last, child_capacity, old_len);
        let new_live = live_count(new_last, child_capacity, new_len);
        if new_live < old_live {
            match &mut self.slots[new_last] {
                Slot::Subtree(child) => {
                    delta += child.truncate(shape, level - 1, old_live, new_live);
                    if child.unmeasured_count == new_live {
                        delta.measured_size -= child.measured_size;
                        self.slots[new_last] = Slot::Unmeasured;
                    }
                }
                Slot::Unmeasured => delta.remove(0.0, old_live - new_live),
                // A leaf slot holds exactly one item, which is kept.
                Slot::Measured(_) => {}
            }
        }

        self.rewind(new_last);
        self.apply(delta);
        delta
    }
}
