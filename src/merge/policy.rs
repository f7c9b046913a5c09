/// How a key present in both sections is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueConflict {
	/// Replace the destination's value and comment with the source's.
	#[default]
	Overwrite,
	/// Fail with a duplicate-key error.
	Error,
	/// Keep the destination's value; adopt the source's comment if the
	/// destination had none.
	Preserve,
	/// Append the source's value as an additional same-named entry.
	AllowDuplicate,
	/// Equal canonical strings behave as Preserve; different ones fail.
	DetectAllowEqual,
}

/// How a section present in both trees is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SectionConflict {
	/// Walk the source section key by key under the value policy.
	#[default]
	MergeInto,
	/// Fail with a duplicate-section error.
	Error,
	/// Replace the destination section wholesale.
	Overwrite,
	/// Keep the destination section; adopt the source's header comment if
	/// the destination had none.
	Preserve,
	/// Append the source section as a second section of the same name.
	AllowDuplicate,
	/// Merge key by key, but any colliding key whose canonical strings
	/// differ fails with a duplicate-key error.
	DetectMergeEqual,
}

/// Declared conflict resolution for a whole merge: the section policy plus
/// the value policy applied to keys colliding inside merged sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergePolicy {
	pub section: SectionConflict,
	pub value: ValueConflict,
}

impl MergePolicy {
	pub fn new(section: SectionConflict, value: ValueConflict) -> Self {
		MergePolicy { section, value }
	}
}
