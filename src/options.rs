use alloc::sync::Arc;

/// Largest supported item count (`2^27 - 1`).
pub const MAX_ITEM_COUNT: usize = 134_217_727;
/// Largest accepted item size (`2^24 - 1`).
pub const MAX_SIZE: f64 = 16_777_215.0;

pub const DEFAULT_UNMEASURED_SIZE: f64 = 18.0;
pub const DEFAULT_LOW_SIZE: f64 = 12.0;
pub const DEFAULT_MAX_BRANCHES: usize = 32;
pub const DEFAULT_MAX_LEAF_ITEMS: usize = 32;

pub const MIN_UNMEASURED_SIZE: f64 = 5.0;
pub const MIN_LOW_SIZE: f64 = 5.0;
pub const MIN_FAN_OUT: usize = 2;
pub const MAX_FAN_OUT: usize = 1024;

/// A per-index lower bound for unmeasured item sizes.
pub type LowSizeFn = Arc<dyn Fn(usize) -> f64 + Send + Sync>;

/// Size assumed for an unmeasured item when a tight lower bound is needed
/// (for example when sizing overscan margins).
#[derive(Clone)]
pub enum LowSize {
    /// The same lower bound for every item.
    Fixed(f64),
    /// A lower bound computed from the item index.
    PerIndex(LowSizeFn),
}

impl LowSize {
    /// Validates against the tracker's unmeasured size, falling back to the default.
    pub(crate) fn validated(self, unmeasured_size: f64) -> Self {
        match self {
            Self::Fixed(size)
                if size.is_finite() && size >= MIN_LOW_SIZE && size <= unmeasured_size =>
            {
                Self::Fixed(size)
            }
            Self::Fixed(_size) => {
                vwarn!(size = _size, unmeasured_size, "invalid low size, using default");
                Self::Fixed(default_low_size(unmeasured_size))
            }
            Self::PerIndex(f) => Self::PerIndex(f),
        }
    }

    pub(crate) fn resolve(&self, index: usize, unmeasured_size: f64) -> f64 {
        match self {
            Self::Fixed(size) => *size,
            Self::PerIndex(f) => {
                let size = f(index);
                if size.is_finite() && size >= 0.0 {
                    size
                } else {
                    default_low_size(unmeasured_size)
                }
            }
        }
    }
}

impl Default for LowSize {
    fn default() -> Self {
        Self::Fixed(DEFAULT_LOW_SIZE)
    }
}

impl core::fmt::Debug for LowSize {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Fixed(v) => f.debug_tuple("Fixed").field(v).finish(),
            Self::PerIndex(_) => f.write_str("PerIndex(..)"),
        }
    }
}

impl From<f64> for LowSize {
    fn from(size: f64) -> Self {
        Self::Fixed(size)
    }
}

fn default_low_size(unmeasured_size: f64) -> f64 {
    DEFAULT_LOW_SIZE.min(unmeasured_size)
}

/// Configuration for [`crate::PositionTracker`].
///
/// Every field is checked once by `PositionTracker::new`. An invalid value is
/// replaced by its default on its own; the other fields are kept.
#[derive(Clone, Debug)]
pub struct TrackerOptions {
    pub item_count: usize,
    /// Size assumed for items that have not been measured yet.
    pub unmeasured_size: f64,
    /// Lower bound for unmeasured items; must not exceed `unmeasured_size`.
    pub low_size: LowSize,
    /// Children per branch node.
    pub max_branches: usize,
    /// Item slots per leaf node.
    pub max_leaf_items: usize,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self::new(0)
    }
}

impl TrackerOptions {
    pub fn new(item_count: usize) -> Self {
        Self {
            item_count,
            unmeasured_size: DEFAULT_UNMEASURED_SIZE,
            low_size: LowSize::default(),
            max_branches: DEFAULT_MAX_BRANCHES,
            max_leaf_items: DEFAULT_MAX_LEAF_ITEMS,
        }
    }

    pub fn with_item_count(mut self, item_count: usize) -> Self {
        self.item_count = item_count;
        self
    }

    pub fn with_unmeasured_size(mut self, unmeasured_size: f64) -> Self {
        self.unmeasured_size = unmeasured_size;
        self
    }

    pub fn with_low_size(mut self, low_size: f64) -> Self {
        self.low_size = LowSize::Fixed(low_size);
        self
    }

    pub fn with_low_size_fn(mut self, f: impl Fn(usize) -> f64 + Send + Sync + 'static) -> Self {
        self.low_size = LowSize::PerIndex(Arc::new(f));
        self
    }

    pub fn with_max_branches(mut self, max_branches: usize) -> Self {
        self.max_branches = max_branches;
        self
    }

    pub fn with_max_leaf_items(mut self, max_leaf_items: usize) -> Self {
        self.max_leaf_items = max_leaf_items;
        self
    }

    pub(crate) fn validated(self) -> Self {
        let item_count = if self.item_count <= MAX_ITEM_COUNT {
            self.item_count
        } else {
            vwarn!(item_count = self.item_count, "item count too large, using 0");
            0
        };
        let unmeasured_size = validate_unmeasured_size(self.unmeasured_size)
            .unwrap_or(DEFAULT_UNMEASURED_SIZE);
        let low_size = self.low_size.validated(unmeasured_size);
        Self {
            item_count,
            unmeasured_size,
            low_size,
            max_branches: validate_fan_out(self.max_branches, DEFAULT_MAX_BRANCHES),
            max_leaf_items: validate_fan_out(self.max_leaf_items, DEFAULT_MAX_LEAF_ITEMS),
        }
    }
}

pub(crate) fn validate_unmeasured_size(size: f64) -> Option<f64> {
    if size.is_finite() && (MIN_UNMEASURED_SIZE..=MAX_SIZE).contains(&size) {
        Some(size)
    } else {
        vwarn!(size, "invalid unmeasured size");
        None
    }
}

pub(crate) fn is_valid_size(size: f64) -> bool {
    size.is_finite() && (0.0..=MAX_SIZE).contains(&size)
}

fn validate_fan_out(value: usize, default: usize) -> usize {
    if (MIN_FAN_OUT..=MAX_FAN_OUT).contains(&value) {
        value
    } else {
        vwarn!(value, default, "fan-out out of range, using default");
        default
    }
}
