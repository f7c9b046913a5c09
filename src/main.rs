use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use inifold::augment::{AugmentOptions, augment};
use inifold::merge::{MergePolicy, SectionConflict, ValueConflict, merge};
use inifold::tree::{ConfigTree, Strictness, parse_file};

#[derive(Parser)]
#[command(name = "inifold")]
#[command(
	author,
	version,
	about = "Comment-preserving INI engine with layered snippet merging"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Parse a configuration file and print its serialized form
	Show {
		/// Configuration file to read
		file: PathBuf,

		/// Fail on the first malformed line instead of tolerating it
		#[arg(long)]
		strict: bool,
	},

	/// Check a configuration file for errors without printing it
	Validate {
		/// Configuration file to check
		file: PathBuf,

		/// Fail on the first malformed line instead of tolerating it
		#[arg(long)]
		strict: bool,
	},

	/// Merge a second configuration into a base and print the result
	Merge {
		/// Base configuration file
		base: PathBuf,

		/// Configuration file merged into the base
		other: PathBuf,

		/// Policy for keys colliding inside merged sections
		#[arg(long, value_enum, default_value_t = ValuePolicyArg::Overwrite)]
		on_value: ValuePolicyArg,

		/// Policy for sections present in both files
		#[arg(long, value_enum, default_value_t = SectionPolicyArg::MergeInto)]
		on_section: SectionPolicyArg,
	},

	/// Merge a directory of snippets into a base and print the result
	Augment {
		/// Base configuration file
		base: PathBuf,

		/// Directory of snippet files
		dir: PathBuf,

		/// Filename pattern (regex); repeatable, empty means all files
		#[arg(long = "match", value_name = "REGEX")]
		name_patterns: Vec<String>,

		/// Allowed section name (regex); repeatable, empty means all sections
		#[arg(long = "allow-section", value_name = "REGEX")]
		section_patterns: Vec<String>,

		/// Fail snippets on the first malformed line
		#[arg(long)]
		strict: bool,

		/// Policy for keys colliding inside merged sections
		#[arg(long, value_enum, default_value_t = ValuePolicyArg::Overwrite)]
		on_value: ValuePolicyArg,

		/// Policy for sections present in both files
		#[arg(long, value_enum, default_value_t = SectionPolicyArg::MergeInto)]
		on_section: SectionPolicyArg,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ValuePolicyArg {
	Overwrite,
	Error,
	Preserve,
	AllowDuplicate,
	DetectAllowEqual,
}

impl From<ValuePolicyArg> for ValueConflict {
	fn from(arg: ValuePolicyArg) -> Self {
		match arg {
			ValuePolicyArg::Overwrite => ValueConflict::Overwrite,
			ValuePolicyArg::Error => ValueConflict::Error,
			ValuePolicyArg::Preserve => ValueConflict::Preserve,
			ValuePolicyArg::AllowDuplicate => ValueConflict::AllowDuplicate,
			ValuePolicyArg::DetectAllowEqual => ValueConflict::DetectAllowEqual,
		}
	}
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SectionPolicyArg {
	MergeInto,
	Error,
	Overwrite,
	Preserve,
	AllowDuplicate,
	DetectMergeEqual,
}

impl From<SectionPolicyArg> for SectionConflict {
	fn from(arg: SectionPolicyArg) -> Self {
		match arg {
			SectionPolicyArg::MergeInto => SectionConflict::MergeInto,
			SectionPolicyArg::Error => SectionConflict::Error,
			SectionPolicyArg::Overwrite => SectionConflict::Overwrite,
			SectionPolicyArg::Preserve => SectionConflict::Preserve,
			SectionPolicyArg::AllowDuplicate => SectionConflict::AllowDuplicate,
			SectionPolicyArg::DetectMergeEqual => SectionConflict::DetectMergeEqual,
		}
	}
}

fn main() -> ExitCode {
	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Show { file, strict } => handle_show(&file, strictness(strict)),
		Commands::Validate { file, strict } => handle_validate(&file, strictness(strict)),
		Commands::Merge {
			base,
			other,
			on_value,
			on_section,
		} => handle_merge(&base, &other, policy(on_section, on_value)),
		Commands::Augment {
			base,
			dir,
			name_patterns,
			section_patterns,
			strict,
			on_value,
			on_section,
		} => {
			let options = AugmentOptions {
				name_patterns,
				section_patterns,
				access: None,
				strictness: strictness(strict),
				policy: policy(on_section, on_value),
			};
			handle_augment(&base, &dir, &options)
		}
	}
}

fn strictness(strict: bool) -> Strictness {
	if strict {
		Strictness::Strict
	} else {
		Strictness::Lenient
	}
}

fn policy(section: SectionPolicyArg, value: ValuePolicyArg) -> MergePolicy {
	MergePolicy::new(section.into(), value.into())
}

fn load_tree(path: &Path, strictness: Strictness) -> Result<ConfigTree> {
	let outcome = parse_file(path, strictness)
		.with_context(|| format!("Failed to parse {}", path.display()))?;
	for error in &outcome.errors {
		eprintln!("warning: {}: {error}", path.display());
	}
	Ok(outcome.tree)
}

fn handle_show(file: &Path, strictness: Strictness) -> Result<ExitCode> {
	let tree = load_tree(file, strictness)?;
	print!("{tree}");
	Ok(ExitCode::SUCCESS)
}

fn handle_validate(file: &Path, strictness: Strictness) -> Result<ExitCode> {
	match parse_file(file, strictness) {
		Ok(outcome) if outcome.errors.is_empty() => {
			println!(
				"{}: valid ({} sections)",
				file.display(),
				outcome.tree.sections().len()
			);
			Ok(ExitCode::SUCCESS)
		}
		Ok(outcome) => {
			for error in &outcome.errors {
				eprintln!("{}: {error}", file.display());
			}
			Ok(ExitCode::FAILURE)
		}
		Err(e) => {
			eprintln!("{e}");
			Ok(ExitCode::FAILURE)
		}
	}
}

fn handle_merge(base: &Path, other: &Path, policy: MergePolicy) -> Result<ExitCode> {
	let base_tree = load_tree(base, Strictness::Lenient)?;
	let other_tree = load_tree(other, Strictness::Lenient)?;
	let merged = merge(&base_tree, &other_tree, policy)
		.with_context(|| format!("Failed to merge {} into {}", other.display(), base.display()))?;
	print!("{merged}");
	Ok(ExitCode::SUCCESS)
}

fn handle_augment(base: &Path, dir: &Path, options: &AugmentOptions) -> Result<ExitCode> {
	let base_tree = load_tree(base, options.strictness)?;
	let outcome = augment(&base_tree, dir, options)
		.with_context(|| format!("Failed to augment from {}", dir.display()))?;

	for diagnostic in &outcome.diagnostics {
		eprintln!("warning: {diagnostic}");
	}
	for path in &outcome.merged {
		eprintln!("merged: {}", path.display());
	}
	print!("{}", outcome.tree);
	Ok(ExitCode::SUCCESS)
}
