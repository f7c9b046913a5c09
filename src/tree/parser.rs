use crate::error::{IniError, Result};
use crate::tree::section::{ConfigTree, Section};
use crate::value::comment::Comment;
use crate::value::fold::DEFAULT_WRAP_BOUNDARY;
use crate::value::object::{Origin, Value};
use std::path::Path;

/// How aggressively parsing stops versus tolerates malformed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
	/// Record malformed lines as recoverable errors and keep parsing; the
	/// partial tree stays usable.
	#[default]
	Lenient,
	/// Fail on the first malformed line.
	Strict,
}

/// A parsed tree plus the recoverable errors encountered along the way.
///
/// Under `Strictness::Lenient` the errors list may be non-empty while the
/// tree still holds everything that parsed cleanly; callers merging snippet
/// files surface these as diagnostics.
#[derive(Debug)]
pub struct ParseOutcome {
	pub tree: ConfigTree,
	pub errors: Vec<String>,
}

/// Parse a configuration file from the given path.
pub fn parse_file(path: &Path, strictness: Strictness) -> Result<ParseOutcome> {
	let content = std::fs::read_to_string(path).map_err(|source| IniError::FileRead {
		path: path.to_path_buf(),
		source,
	})?;
	parse_str(&content, path, strictness)
}

/// Parse a configuration from a string.
///
/// `path` is only used in error messages. The wire format: `[section]`
/// headers, `key = value` pairs whose value continues on lines beginning
/// with whitespace, `#`/`;` comment lines and blank lines attaching to the
/// next key or section header, and a trailing comment block becoming the
/// tree's tail comment.
pub fn parse_str(content: &str, path: &Path, strictness: Strictness) -> Result<ParseOutcome> {
	let mut state = ParserState::new(path, strictness);

	for (index, raw) in content.lines().enumerate() {
		let line_no = index + 1;
		let line = raw.strip_suffix('\r').unwrap_or(raw);
		state.feed(line, line_no)?;
	}
	state.finish()
}

/// A key line whose continuation lines are still being collected.
struct PendingValue {
	key: String,
	segments: Vec<String>,
	line_no: usize,
	comment: Vec<String>,
}

struct ParserState<'a> {
	path: &'a Path,
	strictness: Strictness,
	tree: ConfigTree,
	errors: Vec<String>,
	/// Comment and blank lines awaiting the next key or section.
	pending_comment: Vec<String>,
	pending_value: Option<PendingValue>,
}

impl<'a> ParserState<'a> {
	fn new(path: &'a Path, strictness: Strictness) -> Self {
		ParserState {
			path,
			strictness,
			tree: ConfigTree::new(),
			errors: Vec::new(),
			pending_comment: Vec::new(),
			pending_value: None,
		}
	}

	fn feed(&mut self, line: &str, line_no: usize) -> Result<()> {
		// Continuation: whitespace-led, non-blank, directly after a value
		if self.pending_value.is_some()
			&& !line.trim().is_empty()
			&& line.as_bytes()[0].is_ascii_whitespace()
		{
			if let Some(ref mut pending) = self.pending_value {
				pending.segments.push(line.to_string());
			}
			return Ok(());
		}

		if line.trim().is_empty() {
			self.flush_value();
			self.pending_comment.push(line.to_string());
			return Ok(());
		}

		let first = line.trim_start().as_bytes()[0];
		if first == b'#' || first == b';' {
			self.flush_value();
			self.pending_comment.push(line.to_string());
			return Ok(());
		}

		if line.trim_start().starts_with('[') {
			self.flush_value();
			return self.feed_section_header(line, line_no);
		}

		if let Some(eq) = line.find('=') {
			self.flush_value();
			return self.feed_key_line(line, eq, line_no);
		}

		self.flush_value();
		self.record_error(line_no, "expected `key = value`, `[section]`, or a comment")
	}

	fn feed_section_header(&mut self, line: &str, line_no: usize) -> Result<()> {
		let trimmed = line.trim();
		let Some(inner) = trimmed
			.strip_prefix('[')
			.and_then(|rest| rest.strip_suffix(']'))
		else {
			return self.record_error(line_no, "section header missing closing `]`");
		};
		let name = inner.trim();
		if name.is_empty() {
			return self.record_error(line_no, "empty section name");
		}
		let section = Section::new(name, self.take_pending_comment());
		self.tree.push_section(section);
		Ok(())
	}

	fn feed_key_line(&mut self, line: &str, eq: usize, line_no: usize) -> Result<()> {
		let key = line[..eq].trim();
		if key.is_empty() {
			return self.record_error(line_no, "empty key before `=`");
		}
		if self.tree.sections().is_empty() {
			return self.record_error(line_no, "key outside of any section");
		}
		// The serializer writes `key = value`; strip exactly the one space
		// it adds so the first segment round-trips.
		let rest = &line[eq + 1..];
		let segment = rest.strip_prefix(' ').unwrap_or(rest);
		let comment = std::mem::take(&mut self.pending_comment);
		self.pending_value = Some(PendingValue {
			key: key.to_string(),
			segments: vec![segment.to_string()],
			line_no,
			comment,
		});
		Ok(())
	}

	fn flush_value(&mut self) {
		let Some(pending) = self.pending_value.take() else {
			return;
		};
		let comment = if pending.comment.is_empty() {
			None
		} else {
			Some(Comment::from_parsed(&pending.comment))
		};
		let value = Value::from_lines(
			&pending.segments,
			pending.line_no,
			Origin::File,
			pending.key.len(),
			DEFAULT_WRAP_BOUNDARY,
			comment,
		);
		// feed_key_line guarantees a current section exists
		if let Some(section) = self.last_section_mut() {
			section.push(&pending.key, value);
		}
	}

	fn finish(mut self) -> Result<ParseOutcome> {
		self.flush_value();
		if let Some(tail) = self.take_pending_comment() {
			self.tree.put_tail_comment(tail);
		}
		Ok(ParseOutcome {
			tree: self.tree,
			errors: self.errors,
		})
	}

	fn take_pending_comment(&mut self) -> Option<Comment> {
		if self.pending_comment.is_empty() {
			None
		} else {
			let lines = std::mem::take(&mut self.pending_comment);
			Some(Comment::from_parsed(&lines))
		}
	}

	fn last_section_mut(&mut self) -> Option<&mut Section> {
		let index = self.tree.sections().len().checked_sub(1)?;
		self.tree.section_at_mut(index)
	}

	fn record_error(&mut self, line: usize, reason: &str) -> Result<()> {
		match self.strictness {
			Strictness::Strict => Err(IniError::ParseFailed {
				path: self.path.to_path_buf(),
				line,
				reason: reason.to_string(),
			}),
			Strictness::Lenient => {
				self.errors.push(format!("line {line}: {reason}"));
				Ok(())
			}
		}
	}
}
