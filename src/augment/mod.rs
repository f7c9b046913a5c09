//! Snippet augmentation: merging a directory of overrides into a base.
//!
//! This module handles:
//! - Directory discovery with filename patterns and permission gating
//! - Deterministic, name-sorted merge order
//! - Fail-closed section allow-lists and per-snippet rollback

pub mod access;
pub mod pipeline;

pub use access::{AccessCheck, ModeCheck};
pub use pipeline::{AugmentOptions, AugmentOutcome, augment};
