//! Viewport helpers for the `position-tracker` crate.
//!
//! `position-tracker` answers geometry questions (offsets, totals, containing
//! indexes). This crate adds the small, framework-neutral pieces a rendering
//! layer builds on top of it:
//!
//! - [`visible_range`]: which items cover a view, using low sizes so that a
//!   range computed before measurement never under-covers the view
//! - [`ItemRange`]: half-open index ranges with overscan
//! - [`Viewport`]: tracker, scroll position and view size kept together, with
//!   the measure-then-adjust loop a renderer runs after each paint
//!
//! No UI bindings are provided.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod range;
mod viewport;

#[cfg(test)]
mod tests;

pub use range::{ItemRange, visible_range};
pub use viewport::{DEFAULT_OVERSCAN, Viewport};
