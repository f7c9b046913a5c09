use crate::value::comment::Comment;
use crate::value::fold::{fold, unfold};
use std::fmt;

/// Where a value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
	/// Parsed out of an existing file.
	File,
	/// Created programmatically.
	Created,
}

/// One key's value: the canonical logical string plus its column-bounded
/// wire representation, an attached comment, and positional metadata.
///
/// `folded` holds the physical output lines whose concatenation reproduces
/// `canonical`. Values parsed from a file keep the file's own line layout
/// verbatim until a mutation re-folds them; mutating operations (`update`,
/// `set_key_length`, `set_wrap_boundary`) re-run folding eagerly so the
/// wire representation is never stale at serialization time.
#[derive(Debug, PartialEq, Eq)]
pub struct Value {
	canonical: String,
	folded: Vec<String>,
	origin: Origin,
	source_line: usize,
	key_length: usize,
	wrap_boundary: usize,
	comment: Option<Comment>,
}

impl Value {
	/// Build a value from a logical string, deriving the folded lines.
	pub fn new(
		text: &str,
		origin: Origin,
		key_length: usize,
		wrap_boundary: usize,
		comment: Option<Comment>,
	) -> Self {
		let wrap_boundary = wrap_boundary.max(1);
		Value {
			canonical: text.to_string(),
			folded: fold(text, key_length, wrap_boundary),
			origin,
			source_line: 0,
			key_length,
			wrap_boundary,
			comment,
		}
	}

	/// Build a value from raw continuation lines as read from a file.
	///
	/// The canonical string is their verbatim concatenation; the lines
	/// themselves are kept as the folded representation so re-serializing an
	/// untouched value reproduces the original layout byte for byte.
	pub fn from_lines<S: AsRef<str>>(
		lines: &[S],
		source_line: usize,
		origin: Origin,
		key_length: usize,
		wrap_boundary: usize,
		comment: Option<Comment>,
	) -> Self {
		Value {
			canonical: unfold(lines),
			folded: lines.iter().map(|s| s.as_ref().to_string()).collect(),
			origin,
			source_line,
			key_length,
			wrap_boundary: wrap_boundary.max(1),
			comment,
		}
	}

	/// Replace the logical string and re-fold in place.
	pub fn update(&mut self, text: &str, origin: Origin, wrap_boundary: usize) {
		self.canonical = text.to_string();
		self.origin = origin;
		self.wrap_boundary = wrap_boundary.max(1);
		self.refold();
	}

	/// Adjust the attached key's length and re-fold in place.
	pub fn set_key_length(&mut self, key_length: usize) {
		if self.key_length != key_length {
			self.key_length = key_length;
			self.refold();
		}
	}

	/// Adjust the wrap boundary and re-fold in place.
	pub fn set_wrap_boundary(&mut self, wrap_boundary: usize) {
		let wrap_boundary = wrap_boundary.max(1);
		if self.wrap_boundary != wrap_boundary {
			self.wrap_boundary = wrap_boundary;
			self.refold();
		}
	}

	/// The canonical, unfolded string.
	pub fn canonical(&self) -> &str {
		&self.canonical
	}

	/// The physical output lines.
	pub fn folded_lines(&self) -> &[String] {
		&self.folded
	}

	pub fn origin(&self) -> Origin {
		self.origin
	}

	/// Line number in the originating file, 0 for created values.
	pub fn source_line(&self) -> usize {
		self.source_line
	}

	pub fn key_length(&self) -> usize {
		self.key_length
	}

	pub fn wrap_boundary(&self) -> usize {
		self.wrap_boundary
	}

	/// Borrow the attached comment, if any.
	pub fn comment(&self) -> Option<&Comment> {
		self.comment.as_ref()
	}

	pub fn comment_mut(&mut self) -> Option<&mut Comment> {
		self.comment.as_mut()
	}

	/// Take ownership of the comment out of the value, leaving none behind.
	pub fn take_comment(&mut self) -> Option<Comment> {
		self.comment.take()
	}

	/// Attach a comment, destroying any previously held one.
	pub fn put_comment(&mut self, comment: Comment) {
		self.comment = Some(comment);
	}

	/// True when the value carries a comment with at least one line.
	pub fn has_comment(&self) -> bool {
		self.comment.as_ref().is_some_and(|c| !c.is_empty())
	}

	/// Append the wire representation of this value under `key`.
	///
	/// Writes the comment first, then `key = ` and every folded line, each
	/// terminated by a line break. A value with zero folded lines still gets
	/// its single terminating line break.
	pub fn write_to(&self, key: &str, out: &mut String) {
		if let Some(ref comment) = self.comment {
			comment.write_to(out);
		}
		out.push_str(key);
		out.push_str(" = ");
		if self.folded.is_empty() {
			out.push('\n');
			return;
		}
		for line in &self.folded {
			out.push_str(line);
			out.push('\n');
		}
	}

	fn refold(&mut self) {
		self.folded = fold(&self.canonical, self.key_length, self.wrap_boundary);
	}
}

/// Displays the canonical string, so `to_string()` yields an owned copy.
impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.canonical)
	}
}

impl Clone for Value {
	/// Deep copy: the comment is cloned and the folded representation is
	/// re-derived from the canonical string rather than byte-copied.
	fn clone(&self) -> Self {
		Value {
			canonical: self.canonical.clone(),
			folded: fold(&self.canonical, self.key_length, self.wrap_boundary),
			origin: self.origin,
			source_line: self.source_line,
			key_length: self.key_length,
			wrap_boundary: self.wrap_boundary,
			comment: self.comment.clone(),
		}
	}
}
