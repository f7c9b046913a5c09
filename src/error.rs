use std::path::PathBuf;

/// Library-level structured errors for inifold.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
///
/// The variants fall into a few families callers treat differently:
/// - invalid arguments (`LineOutOfRange`, `OddHexLength`, `InvalidPattern`,
///   `TooManySeparators`) are caller bugs and never retried;
/// - `SectionNotFound`/`KeyNotFound` double as the normal "no value" signal;
/// - `DuplicateKey`/`DuplicateSection` come from the Error/Detect merge
///   policies and abort one merge without poisoning sibling operations;
/// - `MalformedValue` is a coercion failure, scoped to a single value;
/// - the I/O variants are recoverable during augmentation and become
///   diagnostics rather than hard failures.
#[derive(Debug, thiserror::Error)]
pub enum IniError {
	#[error("Comment line index {index} out of range (length {len})")]
	LineOutOfRange { index: usize, len: usize },

	#[error("Section not found: {name}")]
	SectionNotFound { name: String },

	#[error("Key not found: {key}")]
	KeyNotFound { key: String },

	#[error("Duplicate key during merge: [{section}] {key}")]
	DuplicateKey { section: String, key: String },

	#[error("Duplicate section during merge: [{name}]")]
	DuplicateSection { name: String },

	#[error("Malformed value {value:?}: expected {expected}")]
	MalformedValue { value: String, expected: String },

	#[error("Binary value has odd hex digit count: {value:?}")]
	OddHexLength { value: String },

	#[error("At most three separator characters are supported, got {count}")]
	TooManySeparators { count: usize },

	#[error("Invalid pattern: {pattern}")]
	InvalidPattern {
		pattern: String,
		#[source]
		source: regex::Error,
	},

	#[error("Failed to read file: {path}")]
	FileRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to read directory: {path}")]
	DirectoryRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Parse failed at {path}:{line}: {reason}")]
	ParseFailed {
		path: PathBuf,
		line: usize,
		reason: String,
	},
}

/// Result type alias using IniError.
pub type Result<T> = std::result::Result<T, IniError>;
