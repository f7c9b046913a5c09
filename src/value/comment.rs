use crate::error::{IniError, Result};

/// Lifecycle state of a comment.
///
/// `Read` marks a comment populated by the parser and not yet touched;
/// any public edit operation moves the comment to `Changed`. Serialization
/// does not care about the state, but callers deciding whether a tree was
/// mutated since parse do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentState {
	/// Never populated.
	Empty,
	/// Populated by parsing a file, unmodified since.
	Read,
	/// Mutated via the public edit operations.
	Changed,
}

/// An ordered block of raw comment lines attached to a key, a section
/// header, or the trailing tail of a file.
///
/// Lines are stored exactly as they appeared in the file, including the
/// `#`/`;` prefix; blank lines between comments are kept as empty strings so
/// a round-trip preserves the author's spacing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
	lines: Vec<String>,
	state: CommentState,
}

impl Default for Comment {
	fn default() -> Self {
		Self::new()
	}
}

impl Comment {
	/// Create an empty comment.
	pub fn new() -> Self {
		Comment {
			lines: Vec::new(),
			state: CommentState::Empty,
		}
	}

	/// Build a comment from already-parsed raw lines, entering the `Read`
	/// state (or `Empty` when there are none).
	pub fn from_parsed<S: AsRef<str>>(lines: &[S]) -> Self {
		Comment {
			lines: lines.iter().map(|s| s.as_ref().to_string()).collect(),
			state: if lines.is_empty() {
				CommentState::Empty
			} else {
				CommentState::Read
			},
		}
	}

	/// Append a line during parsing.
	///
	/// Only valid while the comment is `Empty` or `Read`; once edited, the
	/// parser may no longer build onto it.
	pub fn build(&mut self, line: &str) -> Result<()> {
		match self.state {
			CommentState::Empty | CommentState::Read => {
				self.lines.push(line.to_string());
				self.state = CommentState::Read;
				Ok(())
			}
			CommentState::Changed => Err(IniError::LineOutOfRange {
				index: self.lines.len(),
				len: self.lines.len(),
			}),
		}
	}

	/// Append a line at the end.
	pub fn append(&mut self, line: &str) {
		self.lines.push(line.to_string());
		self.state = CommentState::Changed;
	}

	/// Insert a line at `index`.
	///
	/// Inserting beyond the current length back-fills empty lines so the new
	/// line lands at exactly the requested index.
	pub fn insert_at(&mut self, index: usize, line: &str) {
		while self.lines.len() < index {
			self.lines.push(String::new());
		}
		self.lines.insert(index, line.to_string());
		self.state = CommentState::Changed;
	}

	/// Replace the line at `index`.
	pub fn replace_at(&mut self, index: usize, line: &str) -> Result<()> {
		self.check_index(index)?;
		self.lines[index] = line.to_string();
		self.state = CommentState::Changed;
		Ok(())
	}

	/// Remove the line at `index`, shifting later lines up.
	pub fn remove_at(&mut self, index: usize) -> Result<()> {
		self.check_index(index)?;
		self.lines.remove(index);
		self.state = CommentState::Changed;
		Ok(())
	}

	/// Blank out the line at `index`, preserving its position.
	pub fn clear_at(&mut self, index: usize) -> Result<()> {
		self.check_index(index)?;
		self.lines[index].clear();
		self.state = CommentState::Changed;
		Ok(())
	}

	/// Swap the lines at `i` and `j`.
	pub fn swap(&mut self, i: usize, j: usize) -> Result<()> {
		self.check_index(i)?;
		self.check_index(j)?;
		self.lines.swap(i, j);
		self.state = CommentState::Changed;
		Ok(())
	}

	/// Remove all lines.
	pub fn reset(&mut self) {
		self.lines.clear();
		self.state = CommentState::Changed;
	}

	/// Append a copy of every line of `other` onto this comment.
	///
	/// Used when merging two values' comments.
	pub fn extend_from(&mut self, other: &Comment) {
		self.lines.extend(other.lines.iter().cloned());
		self.state = CommentState::Changed;
	}

	/// Borrow the line at `index`.
	pub fn line(&self, index: usize) -> Result<&str> {
		self.check_index(index)?;
		Ok(&self.lines[index])
	}

	/// All lines in order.
	pub fn lines(&self) -> &[String] {
		&self.lines
	}

	/// Number of lines.
	pub fn len(&self) -> usize {
		self.lines.len()
	}

	/// True when there are no lines.
	pub fn is_empty(&self) -> bool {
		self.lines.is_empty()
	}

	/// Current lifecycle state.
	pub fn state(&self) -> CommentState {
		self.state
	}

	/// Emit every line followed by a line terminator.
	pub fn write_to(&self, out: &mut String) {
		for line in &self.lines {
			out.push_str(line);
			out.push('\n');
		}
	}

	fn check_index(&self, index: usize) -> Result<()> {
		if index < self.lines.len() {
			Ok(())
		} else {
			Err(IniError::LineOutOfRange {
				index,
				len: self.lines.len(),
			})
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_new_is_empty() {
		let comment = Comment::new();
		assert!(comment.is_empty());
		assert_eq!(comment.state(), CommentState::Empty);
	}

	#[test]
	fn test_build_keeps_read_state() {
		let mut comment = Comment::new();
		comment.build("# first").unwrap();
		comment.build("; second").unwrap();
		assert_eq!(comment.state(), CommentState::Read);
		assert_eq!(comment.lines(), &["# first", "; second"]);
	}

	#[test]
	fn test_build_rejected_after_edit() {
		let mut comment = Comment::new();
		comment.build("# first").unwrap();
		comment.append("# edited");
		assert_eq!(comment.state(), CommentState::Changed);
		assert!(comment.build("# late").is_err());
	}

	#[test]
	fn test_insert_backfills_empty_lines() {
		let mut comment = Comment::new();
		comment.append("# zero");
		comment.insert_at(3, "# three");
		assert_eq!(comment.len(), 4);
		assert_eq!(comment.line(0).unwrap(), "# zero");
		assert_eq!(comment.line(1).unwrap(), "");
		assert_eq!(comment.line(2).unwrap(), "");
		assert_eq!(comment.line(3).unwrap(), "# three");
	}

	#[test]
	fn test_insert_into_empty_comment_backfills() {
		let mut comment = Comment::new();
		comment.insert_at(2, "# two");
		// Exactly idx - len empty lines, then the inserted line
		assert_eq!(comment.len(), 3);
		assert_eq!(comment.line(0).unwrap(), "");
		assert_eq!(comment.line(1).unwrap(), "");
		assert_eq!(comment.line(2).unwrap(), "# two");
	}

	#[test]
	fn test_replace_remove_clear_swap() {
		let mut comment = Comment::new();
		comment.append("# a");
		comment.append("# b");
		comment.append("# c");

		comment.replace_at(1, "# B").unwrap();
		assert_eq!(comment.line(1).unwrap(), "# B");

		comment.swap(0, 2).unwrap();
		assert_eq!(comment.line(0).unwrap(), "# c");
		assert_eq!(comment.line(2).unwrap(), "# a");

		comment.clear_at(1).unwrap();
		assert_eq!(comment.line(1).unwrap(), "");
		assert_eq!(comment.len(), 3);

		comment.remove_at(0).unwrap();
		assert_eq!(comment.len(), 2);
	}

	#[test]
	fn test_index_out_of_range() {
		let mut comment = Comment::new();
		comment.append("# only");
		assert!(comment.replace_at(1, "# x").is_err());
		assert!(comment.remove_at(5).is_err());
		assert!(comment.swap(0, 1).is_err());
		match comment.line(9).unwrap_err() {
			IniError::LineOutOfRange { index, len } => {
				assert_eq!(index, 9);
				assert_eq!(len, 1);
			}
			other => panic!("Expected LineOutOfRange, got {other:?}"),
		}
	}

	#[test]
	fn test_reset_then_get_line_fails() {
		let mut comment = Comment::new();
		comment.append("# a");
		comment.append("# b");
		comment.reset();
		assert_eq!(comment.len(), 0);
		assert!(comment.line(0).is_err());
		assert_eq!(comment.state(), CommentState::Changed);
	}

	#[test]
	fn test_extend_from_copies_lines() {
		let mut dest = Comment::new();
		dest.append("# dest");
		let mut src = Comment::new();
		src.append("# src 1");
		src.append("# src 2");

		dest.extend_from(&src);
		assert_eq!(dest.lines(), &["# dest", "# src 1", "# src 2"]);
		// Source untouched
		assert_eq!(src.len(), 2);
	}

	#[test]
	fn test_write_to_terminates_every_line() {
		let mut comment = Comment::new();
		comment.append("# a");
		comment.append("; b");
		let mut out = String::new();
		comment.write_to(&mut out);
		assert_eq!(out, "# a\n; b\n");
	}
}
