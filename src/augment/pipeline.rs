use crate::augment::access::AccessCheck;
use crate::error::{IniError, Result};
use crate::merge::engine::merge;
use crate::merge::policy::MergePolicy;
use crate::tree::parser::{Strictness, parse_file};
use crate::tree::section::ConfigTree;
use regex::Regex;
use std::path::{Path, PathBuf};

/// Options controlling snippet discovery, validation, and merging.
#[derive(Debug, Clone, Default)]
pub struct AugmentOptions {
	/// Filename patterns (regex). A name matches when any pattern matches;
	/// an empty list matches every name.
	pub name_patterns: Vec<String>,

	/// Allowed section-name patterns (regex). When non-empty, every section
	/// of a snippet must match one, or the whole snippet is skipped.
	pub section_patterns: Vec<String>,

	/// Ownership/permission constraint snippet files must satisfy.
	pub access: Option<AccessCheck>,

	/// Parse strictness applied to each snippet.
	pub strictness: Strictness,

	/// Conflict policy for merging each snippet into the running result.
	pub policy: MergePolicy,
}

/// The result of augmenting a base configuration from a snippet directory.
///
/// `diagnostics` collects every recoverable problem: directory errors,
/// skipped files, parse errors, disallowed sections, merge conflicts. A
/// "successful" call can still carry diagnostics, so callers are expected
/// to inspect the list.
#[derive(Debug)]
pub struct AugmentOutcome {
	/// The merged configuration (a copy of the base when nothing merged).
	pub tree: ConfigTree,

	/// Recoverable problems, in the order encountered.
	pub diagnostics: Vec<String>,

	/// Paths of snippets that merged successfully, in merge order.
	pub merged: Vec<PathBuf>,
}

/// Discover, filter, validate, and merge a directory of configuration
/// snippets into `base`.
///
/// Best-effort across many independent files: each problem skips only the
/// file concerned and lands in the diagnostics list. The only fatal errors
/// are invalid patterns. Everything else degrades to a diagnostic, down to
/// an unresolvable directory, which returns an unmodified copy of the base.
pub fn augment(base: &ConfigTree, dir: &Path, options: &AugmentOptions) -> Result<AugmentOutcome> {
	let name_patterns = compile_patterns(&options.name_patterns)?;
	let section_patterns = compile_patterns(&options.section_patterns)?;

	let mut outcome = AugmentOutcome {
		tree: base.clone(),
		diagnostics: Vec::new(),
		merged: Vec::new(),
	};

	let dir = match dir.canonicalize() {
		Ok(resolved) => resolved,
		Err(err) => {
			outcome
				.diagnostics
				.push(format!("cannot resolve directory {}: {err}", dir.display()));
			return Ok(outcome);
		}
	};

	let paths = collect_snippet_paths(&dir, &name_patterns, options, &mut outcome.diagnostics);

	for path in paths {
		let snippet = match parse_file(&path, options.strictness) {
			Ok(parsed) => {
				for error in &parsed.errors {
					outcome
						.diagnostics
						.push(format!("{}: {error}", path.display()));
				}
				parsed.tree
			}
			Err(err) => {
				outcome.diagnostics.push(format!("{err}"));
				continue;
			}
		};

		if !section_patterns.is_empty()
			&& !validate_sections(&snippet, &section_patterns, &path, &mut outcome.diagnostics)
		{
			continue;
		}

		match merge(&outcome.tree, &snippet, options.policy) {
			Ok(merged) => {
				outcome.tree = merged;
				outcome.merged.push(path);
			}
			Err(err) => {
				// The running result is left as it was before this snippet
				outcome
					.diagnostics
					.push(format!("{}: {err}", path.display()));
			}
		}
	}

	Ok(outcome)
}

/// List the directory, apply name/type/access filters, and return the
/// surviving paths sorted by file name for deterministic merge order.
fn collect_snippet_paths(
	dir: &Path,
	name_patterns: &[Regex],
	options: &AugmentOptions,
	diagnostics: &mut Vec<String>,
) -> Vec<PathBuf> {
	let entries = match std::fs::read_dir(dir) {
		Ok(entries) => entries,
		Err(err) => {
			diagnostics.push(format!("cannot list directory {}: {err}", dir.display()));
			return Vec::new();
		}
	};

	let mut named: Vec<(String, PathBuf)> = Vec::new();
	for entry in entries {
		let entry = match entry {
			Ok(entry) => entry,
			Err(err) => {
				diagnostics.push(format!("cannot read entry in {}: {err}", dir.display()));
				continue;
			}
		};
		let name = entry.file_name().to_string_lossy().into_owned();

		if !matches_any(&name, name_patterns) {
			continue;
		}

		let meta = match entry.metadata() {
			Ok(meta) => meta,
			Err(err) => {
				diagnostics.push(format!("cannot stat {}: {err}", entry.path().display()));
				continue;
			}
		};
		if !meta.is_file() {
			diagnostics.push(format!(
				"skipping {}: not a regular file",
				entry.path().display()
			));
			continue;
		}
		if let Some(ref access) = options.access
			&& let Err(reason) = access.check(&meta)
		{
			diagnostics.push(format!("skipping {}: {reason}", entry.path().display()));
			continue;
		}

		named.push((name, entry.path()));
	}

	named.sort_by(|a, b| a.0.cmp(&b.0));
	named.into_iter().map(|(_, path)| path).collect()
}

/// Fail-closed section validation: a snippet with no sections, or with any
/// section outside the allow-list, is dropped entirely.
fn validate_sections(
	snippet: &ConfigTree,
	patterns: &[Regex],
	path: &Path,
	diagnostics: &mut Vec<String>,
) -> bool {
	if snippet.sections().is_empty() {
		diagnostics.push(format!(
			"skipping {}: snippet has no sections",
			path.display()
		));
		return false;
	}
	for section in snippet.sections() {
		if !matches_any(section.name(), patterns) {
			diagnostics.push(format!(
				"skipping {}: section [{}] not in allow-list",
				path.display(),
				section.name()
			));
			return false;
		}
	}
	true
}

/// Compile a pattern list, failing on the first invalid pattern.
fn compile_patterns(patterns: &[String]) -> Result<Vec<Regex>> {
	patterns
		.iter()
		.map(|pattern| {
			Regex::new(pattern).map_err(|source| IniError::InvalidPattern {
				pattern: pattern.clone(),
				source,
			})
		})
		.collect()
}

/// A name with zero supplied patterns always matches.
fn matches_any(name: &str, patterns: &[Regex]) -> bool {
	patterns.is_empty() || patterns.iter().any(|p| p.is_match(name))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::merge::policy::{SectionConflict, ValueConflict};
	use crate::tree::parser::parse_str;
	use std::fs;
	use std::path::Path;

	fn base() -> ConfigTree {
		parse_str(
			"[main]\nkey = base\n",
			Path::new("base.conf"),
			Strictness::Strict,
		)
		.unwrap()
		.tree
	}

	fn write(dir: &Path, name: &str, content: &str) {
		fs::write(dir.join(name), content).unwrap();
	}

	#[test]
	fn test_missing_directory_returns_base_with_diagnostic() {
		let base = base();
		let outcome = augment(
			&base,
			Path::new("/nonexistent/snippets.d"),
			&AugmentOptions::default(),
		)
		.unwrap();
		assert_eq!(outcome.tree, base);
		assert!(outcome.merged.is_empty());
		assert_eq!(outcome.diagnostics.len(), 1);
		assert!(outcome.diagnostics[0].contains("cannot resolve directory"));
	}

	#[test]
	fn test_name_filter_and_sorted_order() {
		let dir = tempfile::tempdir().unwrap();
		write(dir.path(), "b.conf", "[b]\nk = 2\n");
		write(dir.path(), "a.conf", "[a]\nk = 1\n");
		write(dir.path(), "a.txt", "[txt]\nk = 3\n");

		let options = AugmentOptions {
			name_patterns: vec![r"\.conf$".to_string()],
			..Default::default()
		};
		let outcome = augment(&base(), dir.path(), &options).unwrap();

		let names: Vec<String> = outcome
			.merged
			.iter()
			.map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
			.collect();
		assert_eq!(names, vec!["a.conf", "b.conf"]);
		assert!(outcome.tree.get_section("a").is_some());
		assert!(outcome.tree.get_section("b").is_some());
		assert!(outcome.tree.get_section("txt").is_none());
	}

	#[test]
	fn test_invalid_pattern_is_fatal() {
		let dir = tempfile::tempdir().unwrap();
		let options = AugmentOptions {
			name_patterns: vec!["[invalid".to_string()],
			..Default::default()
		};
		let result = augment(&base(), dir.path(), &options);
		assert!(matches!(
			result.unwrap_err(),
			IniError::InvalidPattern { .. }
		));
	}

	#[test]
	fn test_section_allow_list_skips_whole_snippet() {
		let dir = tempfile::tempdir().unwrap();
		write(dir.path(), "good.conf", "[allowed]\nk = 1\n");
		write(dir.path(), "bad.conf", "[allowed]\nk = 2\n[forbidden]\nx = y\n");

		let options = AugmentOptions {
			section_patterns: vec!["^allowed$".to_string(), "^main$".to_string()],
			..Default::default()
		};
		let outcome = augment(&base(), dir.path(), &options).unwrap();

		assert_eq!(outcome.merged.len(), 1);
		assert!(outcome.merged[0].ends_with("good.conf"));
		assert!(outcome.tree.get_section("forbidden").is_none());
		// bad.conf's allowed section was dropped along with the snippet
		assert_eq!(
			outcome.tree.get_value("allowed", "k").unwrap().canonical(),
			"1"
		);
		assert!(
			outcome
				.diagnostics
				.iter()
				.any(|d| d.contains("not in allow-list"))
		);
	}

	#[test]
	fn test_empty_snippet_skipped_under_allow_list() {
		let dir = tempfile::tempdir().unwrap();
		write(dir.path(), "empty.conf", "# nothing here\n");

		let options = AugmentOptions {
			section_patterns: vec![".*".to_string()],
			..Default::default()
		};
		let outcome = augment(&base(), dir.path(), &options).unwrap();
		assert!(outcome.merged.is_empty());
		assert!(
			outcome
				.diagnostics
				.iter()
				.any(|d| d.contains("no sections"))
		);
	}

	#[test]
	fn test_merge_conflict_discards_snippet_keeps_running_result() {
		let dir = tempfile::tempdir().unwrap();
		write(dir.path(), "01-ok.conf", "[extra]\nk = 1\n");
		write(dir.path(), "02-conflict.conf", "[main]\nkey = clash\n");
		write(dir.path(), "03-also-ok.conf", "[more]\nk = 3\n");

		let options = AugmentOptions {
			policy: MergePolicy::new(SectionConflict::MergeInto, ValueConflict::Error),
			..Default::default()
		};
		let outcome = augment(&base(), dir.path(), &options).unwrap();

		assert_eq!(outcome.merged.len(), 2);
		assert!(outcome.merged[0].ends_with("01-ok.conf"));
		assert!(outcome.merged[1].ends_with("03-also-ok.conf"));
		// The conflicting snippet changed nothing
		assert_eq!(outcome.tree.get_value("main", "key").unwrap().canonical(), "base");
		assert!(outcome.tree.get_section("extra").is_some());
		assert!(outcome.tree.get_section("more").is_some());
		assert!(
			outcome
				.diagnostics
				.iter()
				.any(|d| d.contains("Duplicate key"))
		);
	}

	#[test]
	fn test_lenient_parse_errors_become_diagnostics_but_merge() {
		let dir = tempfile::tempdir().unwrap();
		write(dir.path(), "messy.conf", "garbage line\n[ok]\nk = 1\n");

		let outcome = augment(&base(), dir.path(), &AugmentOptions::default()).unwrap();
		assert_eq!(outcome.merged.len(), 1);
		assert!(outcome.tree.get_section("ok").is_some());
		assert!(outcome.diagnostics.iter().any(|d| d.contains("line 1")));
	}

	#[test]
	fn test_strict_parse_failure_skips_file() {
		let dir = tempfile::tempdir().unwrap();
		write(dir.path(), "broken.conf", "garbage line\n[ok]\nk = 1\n");
		write(dir.path(), "fine.conf", "[fine]\nk = 2\n");

		let options = AugmentOptions {
			strictness: Strictness::Strict,
			..Default::default()
		};
		let outcome = augment(&base(), dir.path(), &options).unwrap();
		assert_eq!(outcome.merged.len(), 1);
		assert!(outcome.merged[0].ends_with("fine.conf"));
		assert!(outcome.tree.get_section("ok").is_none());
		assert!(outcome.diagnostics.iter().any(|d| d.contains("Parse failed")));
	}

	#[test]
	fn test_subdirectories_are_skipped() {
		let dir = tempfile::tempdir().unwrap();
		fs::create_dir(dir.path().join("sub.conf")).unwrap();
		write(dir.path(), "real.conf", "[real]\nk = 1\n");

		let outcome = augment(&base(), dir.path(), &AugmentOptions::default()).unwrap();
		assert_eq!(outcome.merged.len(), 1);
		assert!(
			outcome
				.diagnostics
				.iter()
				.any(|d| d.contains("not a regular file"))
		);
	}

	#[test]
	fn test_overlapping_snippets_respect_value_policy() {
		let dir = tempfile::tempdir().unwrap();
		write(dir.path(), "10-first.conf", "[main]\nkey = first\n");
		write(dir.path(), "20-second.conf", "[main]\nkey = second\n");

		let overwrite = AugmentOptions {
			policy: MergePolicy::new(SectionConflict::MergeInto, ValueConflict::Overwrite),
			..Default::default()
		};
		let outcome = augment(&base(), dir.path(), &overwrite).unwrap();
		assert_eq!(outcome.merged.len(), 2);
		assert_eq!(
			outcome.tree.get_value("main", "key").unwrap().canonical(),
			"second"
		);

		let preserve = AugmentOptions {
			policy: MergePolicy::new(SectionConflict::MergeInto, ValueConflict::Preserve),
			..Default::default()
		};
		let outcome = augment(&base(), dir.path(), &preserve).unwrap();
		assert_eq!(
			outcome.tree.get_value("main", "key").unwrap().canonical(),
			"base"
		);
	}
}
