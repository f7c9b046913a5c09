//! The configuration tree and its wire format.
//!
//! This module handles:
//! - Ordered sections with duplicate-permitting, case-insensitive entries
//! - Line-oriented parsing with a strictness level
//! - Comment- and layout-preserving serialization

pub mod parser;
pub mod section;
pub mod serializer;

pub use parser::{ParseOutcome, Strictness, parse_file, parse_str};
pub use section::{ConfigTree, Entry, Section};
