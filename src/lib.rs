//! Incremental geometry for virtualized views over items whose sizes are only
//! known once they have been rendered.
//!
//! For viewport helpers (visible ranges, scroll settling), see the
//! `position-tracker-adapter` crate.
//!
//! Two pieces make up the core:
//! - [`PositionTracker`]: a cumulative-size index over `n` items. Items count as
//!   an estimated size until measured; offsets, totals and offset → index
//!   lookups stay `O(log n)` as sizes arrive and the sequence grows or shrinks
//!   at its tail.
//! - [`ScrollPosition`]: a small value type (`index`, [`Alignment`], `offset`)
//!   describing where a view should sit, convertible to absolute offsets
//!   against any tracker and re-anchorable after geometry changes.
//!
//! It is UI-agnostic. A rendering layer is expected to:
//! - set the item count when its data changes
//! - report measured sizes after each paint
//! - resolve its scroll intents through [`ScrollPosition`]
//!
//! ```
//! use position_tracker::{Alignment, PositionTracker, ScrollPosition, TrackerOptions};
//!
//! let mut tracker = PositionTracker::new(TrackerOptions::new(100).with_unmeasured_size(20.0));
//! tracker.set_item_size(3, Some(50.0));
//! assert_eq!(tracker.total_size(), 2030.0);
//! assert_eq!(tracker.containing_index(75.0), 3);
//!
//! let position = ScrollPosition::new(8, Alignment::Start, 0.0);
//! assert_eq!(position.view_start_offset(&tracker, 400.0), 190.0);
//! ```
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod node;
mod options;
mod scroll_position;
mod tracker;
mod types;


pub use options::{
    DEFAULT_LOW_SIZE, DEFAULT_MAX_BRANCHES, DEFAULT_MAX_LEAF_ITEMS, DEFAULT_UNMEASURED_SIZE,
    LowSize, LowSizeFn, MAX_FAN_OUT, MAX_ITEM_COUNT, MAX_SIZE, MIN_FAN_OUT, MIN_LOW_SIZE,
    MIN_UNMEASURED_SIZE, TrackerOptions,
};
pub use scroll_position::ScrollPosition;
pub use tracker::PositionTracker;
pub use types::{Alignment, ItemStats};
