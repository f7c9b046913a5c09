//! Tree-to-text serialization, the inverse of the parser.
//!
//! Emission order per section: the section comment, `[name]`, then every
//! entry (its comment, then `key = ` and the folded value lines). The tail
//! comment comes last. Comments already contain the blank lines the author
//! wrote, so an untouched parse serializes back byte for byte.

use crate::tree::section::{ConfigTree, Section};
use std::fmt;

impl Section {
	/// Append this section's wire representation.
	pub fn write_to(&self, out: &mut String) {
		if let Some(comment) = self.header().comment() {
			comment.write_to(out);
		}
		out.push('[');
		out.push_str(self.name());
		out.push_str("]\n");
		for entry in self.entries() {
			entry.value.write_to(&entry.key, out);
		}
	}
}

impl ConfigTree {
	/// Serialize the whole tree into an owned text buffer.
	///
	/// Callers write the bytes to storage themselves; locking and atomic
	/// replacement are their responsibility.
	pub fn to_text(&self) -> String {
		let mut out = String::new();
		for section in self.sections() {
			section.write_to(&mut out);
		}
		if let Some(tail) = self.tail_comment() {
			tail.write_to(&mut out);
		}
		out
	}
}

impl fmt::Display for ConfigTree {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_text())
	}
}
