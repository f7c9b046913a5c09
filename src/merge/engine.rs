use crate::error::{IniError, Result};
use crate::merge::policy::{MergePolicy, SectionConflict, ValueConflict};
use crate::tree::section::{ConfigTree, Section};
use crate::value::object::Value;

/// Combine two configuration trees under the given policy.
///
/// Starts from a deep copy of `dest` and folds `src` in section by section;
/// neither input is ever mutated, so on a conflict error the caller's trees
/// are exactly as they were before the call.
pub fn merge(dest: &ConfigTree, src: &ConfigTree, policy: MergePolicy) -> Result<ConfigTree> {
	let mut result = dest.clone();

	for src_section in src.sections() {
		// A section present only in the source is always appended
		let Some(index) = result.index_of(src_section.name()) else {
			result.push_section(src_section.clone());
			continue;
		};
		match policy.section {
			SectionConflict::Error => {
				return Err(IniError::DuplicateSection {
					name: src_section.name().to_string(),
				});
			}
			SectionConflict::Overwrite => {
				result.replace_section_at(index, src_section.clone())?;
			}
			SectionConflict::AllowDuplicate => result.push_section(src_section.clone()),
			section_local => {
				let Some(dest_section) = result.section_at_mut(index) else {
					continue;
				};
				match section_local {
					SectionConflict::Preserve => adopt_header_comment(dest_section, src_section),
					SectionConflict::DetectMergeEqual => {
						// Detect is MergeInto with the nested policy pinned to
						// compare-then-decide, regardless of `policy.value`.
						merge_section(dest_section, src_section, ValueConflict::DetectAllowEqual)?;
					}
					_ => merge_section(dest_section, src_section, policy.value)?,
				}
			}
		}
	}

	if result.tail_comment().is_none()
		&& let Some(tail) = src.tail_comment()
	{
		result.put_tail_comment(tail.clone());
	}

	Ok(result)
}

/// Walk every key of the source section, applying the nested value policy
/// to collisions and appending everything else.
fn merge_section(dest: &mut Section, src: &Section, policy: ValueConflict) -> Result<()> {
	adopt_header_comment(dest, src);
	for entry in src.entries() {
		match dest.index_of(&entry.key) {
			None => dest.push(&entry.key, entry.value.clone()),
			Some(index) => {
				resolve_value(dest, index, &entry.key, &entry.value, policy)?;
			}
		}
	}
	Ok(())
}

fn resolve_value(
	dest: &mut Section,
	index: usize,
	key: &str,
	src_value: &Value,
	policy: ValueConflict,
) -> Result<()> {
	match policy {
		ValueConflict::Overwrite => dest.replace_value_at(index, src_value.clone()),
		ValueConflict::Error => Err(IniError::DuplicateKey {
			section: dest.name().to_string(),
			key: key.to_string(),
		}),
		ValueConflict::AllowDuplicate => {
			dest.push(key, src_value.clone());
			Ok(())
		}
		ValueConflict::Preserve => {
			preserve_value_comment(dest, index, src_value);
			Ok(())
		}
		ValueConflict::DetectAllowEqual => {
			let equal = dest
				.entry_at(index)
				.is_some_and(|e| e.value.canonical() == src_value.canonical());
			if equal {
				preserve_value_comment(dest, index, src_value);
				Ok(())
			} else {
				Err(IniError::DuplicateKey {
					section: dest.name().to_string(),
					key: key.to_string(),
				})
			}
		}
	}
}

/// Preserve keeps the destination's value but adopts the source's comment
/// when the destination had none.
fn preserve_value_comment(dest: &mut Section, index: usize, src_value: &Value) {
	if let Some(entry) = dest.entry_at(index)
		&& !entry.value.has_comment()
		&& let Some(comment) = src_value.comment()
	{
		let comment = comment.clone();
		if let Some(value) = dest.value_at_mut(index) {
			value.put_comment(comment);
		}
	}
}

fn adopt_header_comment(dest: &mut Section, src: &Section) {
	if !dest.header().has_comment()
		&& let Some(comment) = src.header().comment()
	{
		dest.header_mut().put_comment(comment.clone());
	}
}
