//! The value model: comments, canonical strings, folding, and typed access.
//!
//! This module handles:
//! - Ordered comment blocks with a parse/edit lifecycle
//! - Values as canonical string + column-bounded folded wire lines
//! - Typed coercion (integers, floats, booleans, binary, arrays)

pub mod coerce;
pub mod comment;
pub mod fold;
pub mod object;

pub use coerce::{
	parse_binary, parse_bool, parse_f64, parse_i64, parse_u64, split_f64_array, split_i64_array,
	split_string_array,
};
pub use comment::{Comment, CommentState};
pub use fold::{DEFAULT_WRAP_BOUNDARY, fold, unfold};
pub use object::{Origin, Value};
