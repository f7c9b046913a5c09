//! Inifold - comment-preserving INI engine with layered snippet merging.
//!
//! This library provides the core functionality for inifold, including:
//! - Parsing and lossless re-serialization of INI-style configuration
//! - Values with a canonical string and column-bounded folded wire lines
//! - Typed value coercion (integers, floats, booleans, binary, arrays)
//! - Policy-driven merging of two configuration trees
//! - Augmenting a base configuration from a directory of snippets
//!
//! # Example
//!
//! ```no_run
//! use inifold::augment::{AugmentOptions, augment};
//! use inifold::tree::{Strictness, parse_file};
//! use std::path::Path;
//!
//! let base = parse_file(Path::new("/etc/daemon.conf"), Strictness::Lenient)
//!     .unwrap()
//!     .tree;
//!
//! let options = AugmentOptions {
//!     name_patterns: vec![r"\.conf$".to_string()],
//!     ..Default::default()
//! };
//! let outcome = augment(&base, Path::new("/etc/daemon.conf.d"), &options).unwrap();
//!
//! for diagnostic in &outcome.diagnostics {
//!     eprintln!("warning: {diagnostic}");
//! }
//! print!("{}", outcome.tree.to_text());
//! ```

pub mod augment;
pub mod error;
pub mod merge;
pub mod tree;
pub mod value;

pub use error::{IniError, Result};
