//! Elevation modifier stacks.
//!
//! A [`ModifierStack`] folds an ordered list of [`Modifier`]s over a
//! per-sample [`SampleContext`] to produce a height in [-1, 1].

mod modifier;
mod stack;

pub use modifier::{Modifier, Octave, OctaveSeries, SampleContext};
pub use stack::{clamp_height, ModifierStack};
