use crate::error::{IniError, Result};
use crate::value::comment::Comment;
use crate::value::fold::DEFAULT_WRAP_BOUNDARY;
use crate::value::object::{Origin, Value};

/// One key/value entry of a section, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
	pub key: String,
	pub value: Value,
}

/// A named section: its header value (carrying the section-level comment)
/// plus ordered key/value entries.
///
/// Duplicate keys are permitted and distinguished only by position; named
/// lookup returns the first match. Names compare ASCII case-insensitively.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
	name: String,
	header: Value,
	entries: Vec<Entry>,
}

/// Case-insensitive name comparison used for sections and keys.
pub(crate) fn name_eq(a: &str, b: &str) -> bool {
	a.eq_ignore_ascii_case(b)
}

impl Section {
	/// Create a section, optionally with a section-level comment.
	pub fn new(name: &str, comment: Option<Comment>) -> Self {
		Section {
			name: name.to_string(),
			header: Value::new("", Origin::Created, name.len(), DEFAULT_WRAP_BOUNDARY, comment),
			entries: Vec::new(),
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// The section header's own value, which owns the section comment.
	pub fn header(&self) -> &Value {
		&self.header
	}

	pub fn header_mut(&mut self) -> &mut Value {
		&mut self.header
	}

	/// All entries in file order.
	pub fn entries(&self) -> &[Entry] {
		&self.entries
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// First value stored under `key`, if any.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.entries
			.iter()
			.find(|e| name_eq(&e.key, key))
			.map(|e| &e.value)
	}

	pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
		self.entries
			.iter_mut()
			.find(|e| name_eq(&e.key, key))
			.map(|e| &mut e.value)
	}

	/// Every value stored under `key`, in positional order.
	pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Value> {
		self.entries
			.iter()
			.filter(move |e| name_eq(&e.key, key))
			.map(|e| &e.value)
	}

	/// Positional lookup.
	pub fn entry_at(&self, index: usize) -> Option<&Entry> {
		self.entries.get(index)
	}

	/// Mutable positional access to an entry's value.
	pub fn value_at_mut(&mut self, index: usize) -> Option<&mut Value> {
		self.entries.get_mut(index).map(|e| &mut e.value)
	}

	/// Index of the first entry stored under `key`.
	pub fn index_of(&self, key: &str) -> Option<usize> {
		self.entries.iter().position(|e| name_eq(&e.key, key))
	}

	/// Append an entry, keeping the value's key length in sync so its folded
	/// representation accounts for the `key = ` prefix.
	pub fn push(&mut self, key: &str, mut value: Value) {
		value.set_key_length(key.len());
		self.entries.push(Entry {
			key: key.to_string(),
			value,
		});
	}

	/// Replace the value at `index`, keeping the entry's key.
	pub fn replace_value_at(&mut self, index: usize, mut value: Value) -> Result<()> {
		let len = self.entries.len();
		let entry = self
			.entries
			.get_mut(index)
			.ok_or(IniError::LineOutOfRange { index, len })?;
		value.set_key_length(entry.key.len());
		entry.value = value;
		Ok(())
	}

	/// Remove the first entry stored under `key`.
	pub fn remove(&mut self, key: &str) -> Result<Value> {
		match self.index_of(key) {
			Some(index) => Ok(self.entries.remove(index).value),
			None => Err(IniError::KeyNotFound {
				key: key.to_string(),
			}),
		}
	}

	/// Create and append a value from a logical string.
	pub fn set(&mut self, key: &str, text: &str) {
		let value = Value::new(
			text,
			Origin::Created,
			key.len(),
			DEFAULT_WRAP_BOUNDARY,
			None,
		);
		self.push(key, value);
	}
}

/// An ordered collection of sections plus the file's tail comment.
///
/// Sections appear in file order; duplicate section names are permitted
/// (the merge engine's allow-duplicate policy creates them) and named
/// lookup returns the first match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigTree {
	sections: Vec<Section>,
	tail: Option<Comment>,
}

impl ConfigTree {
	pub fn new() -> Self {
		Self::default()
	}

	/// All sections in file order.
	pub fn sections(&self) -> &[Section] {
		&self.sections
	}

	/// First section named `name`, if any.
	pub fn get_section(&self, name: &str) -> Option<&Section> {
		self.sections.iter().find(|s| name_eq(s.name(), name))
	}

	pub fn get_section_mut(&mut self, name: &str) -> Option<&mut Section> {
		self.sections.iter_mut().find(|s| name_eq(s.name(), name))
	}

	/// Index of the first section named `name`.
	pub fn index_of(&self, name: &str) -> Option<usize> {
		self.sections.iter().position(|s| name_eq(s.name(), name))
	}

	pub fn section_at(&self, index: usize) -> Option<&Section> {
		self.sections.get(index)
	}

	pub fn section_at_mut(&mut self, index: usize) -> Option<&mut Section> {
		self.sections.get_mut(index)
	}

	/// Append a section.
	pub fn push_section(&mut self, section: Section) {
		self.sections.push(section);
	}

	/// Replace the section at `index`.
	pub fn replace_section_at(&mut self, index: usize, section: Section) -> Result<()> {
		match self.sections.get_mut(index) {
			Some(slot) => {
				*slot = section;
				Ok(())
			}
			None => Err(IniError::SectionNotFound {
				name: format!("#{index}"),
			}),
		}
	}

	/// Remove the first section named `name`.
	pub fn remove_section(&mut self, name: &str) -> Result<Section> {
		match self.index_of(name) {
			Some(index) => Ok(self.sections.remove(index)),
			None => Err(IniError::SectionNotFound {
				name: name.to_string(),
			}),
		}
	}

	/// First value under `key` in the first section named `section`.
	pub fn get_value(&self, section: &str, key: &str) -> Result<&Value> {
		let section = self
			.get_section(section)
			.ok_or_else(|| IniError::SectionNotFound {
				name: section.to_string(),
			})?;
		section.get(key).ok_or_else(|| IniError::KeyNotFound {
			key: key.to_string(),
		})
	}

	/// The trailing comment block not attached to any key or section.
	pub fn tail_comment(&self) -> Option<&Comment> {
		self.tail.as_ref()
	}

	/// Attach a tail comment, destroying any previously held one.
	pub fn put_tail_comment(&mut self, comment: Comment) {
		self.tail = Some(comment);
	}

	/// Take ownership of the tail comment out of the tree.
	pub fn take_tail_comment(&mut self) -> Option<Comment> {
		self.tail.take()
	}

	pub fn is_empty(&self) -> bool {
		self.sections.is_empty() && self.tail.is_none()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_case_insensitive_section_lookup() {
		let mut tree = ConfigTree::new();
		tree.push_section(Section::new("Main", None));
		assert!(tree.get_section("main").is_some());
		assert!(tree.get_section("MAIN").is_some());
		assert!(tree.get_section("other").is_none());
	}

	#[test]
	fn test_case_insensitive_key_lookup() {
		let mut section = Section::new("main", None);
		section.set("Key", "v");
		assert_eq!(section.get("key").unwrap().canonical(), "v");
		assert_eq!(section.get("KEY").unwrap().canonical(), "v");
		assert!(section.get("other").is_none());
	}

	#[test]
	fn test_duplicate_keys_by_position() {
		let mut section = Section::new("main", None);
		section.set("key", "first");
		section.set("key", "second");
		assert_eq!(section.len(), 2);
		// Named lookup returns the first match
		assert_eq!(section.get("key").unwrap().canonical(), "first");
		let all: Vec<&str> = section.get_all("key").map(|v| v.canonical()).collect();
		assert_eq!(all, vec!["first", "second"]);
		assert_eq!(section.entry_at(1).unwrap().value.canonical(), "second");
	}

	#[test]
	fn test_push_syncs_key_length() {
		let mut section = Section::new("main", None);
		let value = Value::new("aaa bbb", Origin::Created, 0, 10, None);
		section.push("key", value);
		assert_eq!(section.get("key").unwrap().key_length(), 3);
		// Folded under the entry's real key width
		assert_eq!(section.get("key").unwrap().folded_lines(), &["aaa", " bbb"]);
	}

	#[test]
	fn test_remove_first_duplicate_only() {
		let mut section = Section::new("main", None);
		section.set("key", "first");
		section.set("key", "second");
		let removed = section.remove("key").unwrap();
		assert_eq!(removed.canonical(), "first");
		assert_eq!(section.get("key").unwrap().canonical(), "second");
		section.remove("key").unwrap();
		assert!(matches!(
			section.remove("key").unwrap_err(),
			IniError::KeyNotFound { .. }
		));
	}

	#[test]
	fn test_get_value_error_kinds() {
		let mut tree = ConfigTree::new();
		let mut section = Section::new("main", None);
		section.set("key", "v");
		tree.push_section(section);

		assert!(tree.get_value("main", "key").is_ok());
		assert!(matches!(
			tree.get_value("missing", "key").unwrap_err(),
			IniError::SectionNotFound { .. }
		));
		assert!(matches!(
			tree.get_value("main", "missing").unwrap_err(),
			IniError::KeyNotFound { .. }
		));
	}

	#[test]
	fn test_tail_comment_ownership() {
		let mut tree = ConfigTree::new();
		let mut comment = Comment::new();
		comment.append("# tail");
		tree.put_tail_comment(comment);
		assert!(tree.tail_comment().is_some());
		let taken = tree.take_tail_comment().unwrap();
		assert_eq!(taken.line(0).unwrap(), "# tail");
		assert!(tree.tail_comment().is_none());
	}

	#[test]
	fn test_clone_is_deep() {
		let mut tree = ConfigTree::new();
		let mut section = Section::new("main", None);
		section.set("key", "original");
		tree.push_section(section);

		let copy = tree.clone();
		tree.get_section_mut("main")
			.unwrap()
			.get_mut("key")
			.unwrap()
			.update("mutated", Origin::Created, 80);

		assert_eq!(copy.get_value("main", "key").unwrap().canonical(), "original");
	}
}
