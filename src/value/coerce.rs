//! Typed readers and writers over a value's canonical string.
//!
//! Numeric getters parse the longest numeric prefix after skipping leading
//! ASCII whitespace; the `strict` flag decides whether unconsumed trailing
//! characters are an error or ignored. Array getters split on up to three
//! caller-chosen separator characters and trim each token. Floating-point
//! array parsing takes the decimal separator as an explicit parameter so the
//! layer carries no ambient locale state.

use crate::error::{IniError, Result};
use crate::value::object::{Origin, Value};

/// Maximum number of separator characters an array getter accepts.
const MAX_SEPARATORS: usize = 3;

fn malformed(value: &str, expected: &str) -> IniError {
	IniError::MalformedValue {
		value: value.to_string(),
		expected: expected.to_string(),
	}
}

/// Parse a signed 64-bit integer from the front of `text`.
pub fn parse_i64(text: &str, strict: bool) -> Result<i64> {
	let trimmed = text.trim_start_matches(|c: char| c.is_ascii_whitespace());
	let end = int_prefix_len(trimmed.as_bytes(), true);
	if end == 0 {
		return Err(malformed(text, "integer"));
	}
	if strict && end != trimmed.len() {
		return Err(malformed(text, "integer with no trailing characters"));
	}
	trimmed[..end]
		.parse::<i64>()
		.map_err(|_| malformed(text, "integer in 64-bit signed range"))
}

/// Parse an unsigned 64-bit integer from the front of `text`.
pub fn parse_u64(text: &str, strict: bool) -> Result<u64> {
	let trimmed = text.trim_start_matches(|c: char| c.is_ascii_whitespace());
	let end = int_prefix_len(trimmed.as_bytes(), false);
	if end == 0 {
		return Err(malformed(text, "unsigned integer"));
	}
	if strict && end != trimmed.len() {
		return Err(malformed(text, "unsigned integer with no trailing characters"));
	}
	let digits = trimmed[..end].trim_start_matches('+');
	digits
		.parse::<u64>()
		.map_err(|_| malformed(text, "integer in 64-bit unsigned range"))
}

/// Parse a double-precision float from the front of `text`.
///
/// `decimal_sep` is the character accepted between integral and fractional
/// digits; it is substituted with `.` before the final conversion.
pub fn parse_f64(text: &str, strict: bool, decimal_sep: char) -> Result<f64> {
	let trimmed = text.trim_start_matches(|c: char| c.is_ascii_whitespace());
	let end = float_prefix_len(trimmed, decimal_sep);
	if end == 0 {
		return Err(malformed(text, "floating-point number"));
	}
	if strict && end != trimmed.len() {
		return Err(malformed(text, "floating-point number with no trailing characters"));
	}
	let normalized: String = trimmed[..end]
		.chars()
		.map(|c| if c == decimal_sep { '.' } else { c })
		.collect();
	normalized
		.parse::<f64>()
		.map_err(|_| malformed(text, "floating-point number"))
}

/// Parse a boolean: `true`/`yes` and `false`/`no`, case-insensitive.
pub fn parse_bool(text: &str) -> Result<bool> {
	let trimmed = text.trim();
	if trimmed.eq_ignore_ascii_case("true") || trimmed.eq_ignore_ascii_case("yes") {
		Ok(true)
	} else if trimmed.eq_ignore_ascii_case("false") || trimmed.eq_ignore_ascii_case("no") {
		Ok(false)
	} else {
		Err(malformed(text, "true/yes or false/no"))
	}
}

/// Parse a single-quoted, even-length hexadecimal payload into bytes.
pub fn parse_binary(text: &str) -> Result<Vec<u8>> {
	let trimmed = text.trim();
	let inner = trimmed
		.strip_prefix('\'')
		.and_then(|rest| rest.strip_suffix('\''))
		.ok_or_else(|| malformed(text, "single-quoted hex payload"))?;
	if inner.len() % 2 != 0 {
		return Err(IniError::OddHexLength {
			value: text.to_string(),
		});
	}
	hex::decode(inner).map_err(|_| malformed(text, "hexadecimal digits"))
}

/// Split `text` on any of up to three separator characters, trimming ASCII
/// whitespace from each token.
///
/// With `keep_empty`, tokens that trim to nothing are kept as empty strings;
/// otherwise they are dropped. Separators at the start or end and adjacent
/// separators behave identically to a single trim-then-split pass.
pub fn split_string_array(text: &str, separators: &str, keep_empty: bool) -> Result<Vec<String>> {
	let seps = separator_set(separators)?;
	let mut tokens = Vec::new();
	for raw in text.split(|c: char| seps.contains(&c)) {
		let token = raw.trim_matches(|c: char| c.is_ascii_whitespace());
		if keep_empty || !token.is_empty() {
			tokens.push(token.to_string());
		}
	}
	Ok(tokens)
}

/// Split `text` and parse every numeric token, skipping non-numeric filler.
pub fn split_i64_array(text: &str, separators: &str) -> Result<Vec<i64>> {
	let seps = separator_set(separators)?;
	let mut numbers = Vec::new();
	for raw in text.split(|c: char| seps.contains(&c)) {
		let token = raw.trim_matches(|c: char| c.is_ascii_whitespace());
		if let Ok(n) = parse_i64(token, false) {
			numbers.push(n);
		}
	}
	Ok(numbers)
}

/// Split `text` and parse every float token, skipping non-numeric filler.
pub fn split_f64_array(text: &str, separators: &str, decimal_sep: char) -> Result<Vec<f64>> {
	let seps = separator_set(separators)?;
	let mut numbers = Vec::new();
	for raw in text.split(|c: char| seps.contains(&c)) {
		let token = raw.trim_matches(|c: char| c.is_ascii_whitespace());
		if let Ok(n) = parse_f64(token, false, decimal_sep) {
			numbers.push(n);
		}
	}
	Ok(numbers)
}

fn separator_set(separators: &str) -> Result<Vec<char>> {
	let seps: Vec<char> = separators.chars().collect();
	if seps.len() > MAX_SEPARATORS {
		return Err(IniError::TooManySeparators { count: seps.len() });
	}
	Ok(seps)
}

/// Length of the leading integer prefix: optional sign, then digits.
fn int_prefix_len(bytes: &[u8], allow_negative: bool) -> usize {
	let mut i = 0;
	if i < bytes.len() && (bytes[i] == b'+' || (allow_negative && bytes[i] == b'-')) {
		i += 1;
	}
	let digits_start = i;
	while i < bytes.len() && bytes[i].is_ascii_digit() {
		i += 1;
	}
	if i == digits_start { 0 } else { i }
}

/// Length of the leading float prefix: sign, digits, optional decimal
/// separator plus digits, optional exponent.
fn float_prefix_len(text: &str, decimal_sep: char) -> usize {
	let bytes = text.as_bytes();
	let sep_len = decimal_sep.len_utf8();
	let mut i = 0;
	if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
		i += 1;
	}
	let mut digits = 0;
	while i < bytes.len() && bytes[i].is_ascii_digit() {
		i += 1;
		digits += 1;
	}
	if text[i..].starts_with(decimal_sep) {
		let mut j = i + sep_len;
		let mut frac_digits = 0;
		while j < bytes.len() && bytes[j].is_ascii_digit() {
			j += 1;
			frac_digits += 1;
		}
		if digits + frac_digits > 0 {
			i = j;
			digits += frac_digits;
		}
	}
	if digits == 0 {
		return 0;
	}
	// Exponent is only consumed when complete
	if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
		let mut j = i + 1;
		if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
			j += 1;
		}
		let exp_start = j;
		while j < bytes.len() && bytes[j].is_ascii_digit() {
			j += 1;
		}
		if j > exp_start {
			i = j;
		}
	}
	i
}

macro_rules! narrowing_getter {
	($name:ident, $ty:ty, $wide:ident, $expected:literal) => {
		/// Parse the canonical string, range-checked to the target width.
		pub fn $name(&self, strict: bool) -> Result<$ty> {
			let wide = self.$wide(strict)?;
			<$ty>::try_from(wide).map_err(|_| malformed(self.canonical(), $expected))
		}
	};
}

impl Value {
	/// Borrowed canonical string.
	pub fn as_str(&self) -> &str {
		self.canonical()
	}

	pub fn as_i64(&self, strict: bool) -> Result<i64> {
		parse_i64(self.canonical(), strict)
	}

	pub fn as_u64(&self, strict: bool) -> Result<u64> {
		parse_u64(self.canonical(), strict)
	}

	narrowing_getter!(as_i32, i32, as_i64, "integer in 32-bit signed range");
	narrowing_getter!(as_i16, i16, as_i64, "integer in 16-bit signed range");
	narrowing_getter!(as_i8, i8, as_i64, "integer in 8-bit signed range");
	narrowing_getter!(as_u32, u32, as_u64, "integer in 32-bit unsigned range");
	narrowing_getter!(as_u16, u16, as_u64, "integer in 16-bit unsigned range");
	narrowing_getter!(as_u8, u8, as_u64, "integer in 8-bit unsigned range");

	pub fn as_f64(&self, strict: bool) -> Result<f64> {
		parse_f64(self.canonical(), strict, '.')
	}

	pub fn as_bool(&self) -> Result<bool> {
		parse_bool(self.canonical())
	}

	pub fn as_binary(&self) -> Result<Vec<u8>> {
		parse_binary(self.canonical())
	}

	pub fn as_string_array(&self, separators: &str, keep_empty: bool) -> Result<Vec<String>> {
		split_string_array(self.canonical(), separators, keep_empty)
	}

	pub fn as_i64_array(&self, separators: &str) -> Result<Vec<i64>> {
		split_i64_array(self.canonical(), separators)
	}

	pub fn as_f64_array(&self, separators: &str, decimal_sep: char) -> Result<Vec<f64>> {
		split_f64_array(self.canonical(), separators, decimal_sep)
	}

	/// Build a value from a signed integer.
	pub fn from_i64(number: i64, key_length: usize, wrap_boundary: usize) -> Self {
		Value::new(&number.to_string(), Origin::Created, key_length, wrap_boundary, None)
	}

	/// Build a value from an unsigned integer.
	pub fn from_u64(number: u64, key_length: usize, wrap_boundary: usize) -> Self {
		Value::new(&number.to_string(), Origin::Created, key_length, wrap_boundary, None)
	}

	/// Build a value from a float.
	pub fn from_f64(number: f64, key_length: usize, wrap_boundary: usize) -> Self {
		Value::new(&number.to_string(), Origin::Created, key_length, wrap_boundary, None)
	}

	/// Build a value from a boolean (`true`/`false`).
	pub fn from_bool(flag: bool, key_length: usize, wrap_boundary: usize) -> Self {
		let text = if flag { "true" } else { "false" };
		Value::new(text, Origin::Created, key_length, wrap_boundary, None)
	}

	/// Build a single-quoted hex value from raw bytes.
	pub fn from_binary(bytes: &[u8], key_length: usize, wrap_boundary: usize) -> Self {
		let text = format!("'{}'", hex::encode_upper(bytes));
		Value::new(&text, Origin::Created, key_length, wrap_boundary, None)
	}

	/// Build a value by joining `items` with `separator`.
	pub fn from_string_array<S: AsRef<str>>(
		items: &[S],
		separator: char,
		key_length: usize,
		wrap_boundary: usize,
	) -> Self {
		let text = items
			.iter()
			.map(|s| s.as_ref())
			.collect::<Vec<_>>()
			.join(&separator.to_string());
		Value::new(&text, Origin::Created, key_length, wrap_boundary, None)
	}

	/// Build a value by joining integers with `separator`.
	pub fn from_i64_array(
		numbers: &[i64],
		separator: char,
		key_length: usize,
		wrap_boundary: usize,
	) -> Self {
		let items: Vec<String> = numbers.iter().map(|n| n.to_string()).collect();
		Value::from_string_array(&items, separator, key_length, wrap_boundary)
	}

	/// Build a value by joining floats with `separator`.
	pub fn from_f64_array(
		numbers: &[f64],
		separator: char,
		key_length: usize,
		wrap_boundary: usize,
	) -> Self {
		let items: Vec<String> = numbers.iter().map(|n| n.to_string()).collect();
		Value::from_string_array(&items, separator, key_length, wrap_boundary)
	}
}
