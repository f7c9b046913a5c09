//! Policy-driven merging of two configuration trees.
//!
//! This module handles:
//! - Per-value and per-section conflict policies
//! - The copy-then-mutate merge that never touches its inputs

pub mod engine;
pub mod policy;

pub use engine::merge;
pub use policy::{MergePolicy, SectionConflict, ValueConflict};
