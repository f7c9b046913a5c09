//! Column-bounded folding of canonical value strings into wire lines, and
//! the verbatim unfolding that inverts it.
//!
//! Folding breaks a value at whitespace so each physical line stays inside
//! the wrap boundary. A break consumes the single separating whitespace
//! byte; the continuation line gets one injected leading space that both
//! marks it as a continuation on the wire and stands in for the consumed
//! separator. Concatenating the folded lines therefore reproduces the
//! canonical string exactly, and so does serializing and re-parsing.

/// Wrap boundary used for values parsed from files.
pub const DEFAULT_WRAP_BOUNDARY: usize = 80;

/// Width of the `" = "` separator between key and first value line.
const KEY_SEPARATOR_WIDTH: usize = 3;

/// Split `canonical` into wire-format lines.
///
/// The first line's budget is reduced by the key and the `" = "` separator;
/// continuation lines get the full boundary, minus one column reserved for
/// the injected leading space when the upcoming content does not already
/// begin with whitespace. A wrap boundary of 0 is normalized to 1.
///
/// Breakpoints are whitespace bytes immediately followed by non-whitespace
/// (the end of a whitespace run). The rightmost breakpoint within the budget
/// wins; if none fits, the first one beyond the budget is taken so progress
/// is always made, and if none exists at all the entire remainder becomes
/// the final line. An empty canonical string folds to zero lines.
pub fn fold(canonical: &str, key_length: usize, wrap_boundary: usize) -> Vec<String> {
	let boundary = wrap_boundary.max(1);
	let bytes = canonical.as_bytes();
	let len = bytes.len();
	let mut lines = Vec::new();
	let mut start = 0;

	while start < len {
		let first = lines.is_empty();
		let budget = if first {
			boundary.saturating_sub(key_length + KEY_SEPARATOR_WIDTH)
		} else if bytes[start].is_ascii_whitespace() {
			boundary
		} else {
			boundary.saturating_sub(1)
		};

		let remainder = len - start;
		if remainder <= budget {
			push_line(&mut lines, &canonical[start..], first);
			break;
		}

		match find_breakpoint(&bytes[start..], budget) {
			Some(brk) => {
				push_line(&mut lines, &canonical[start..start + brk], first);
				// Skip the single separating whitespace byte; the injected
				// leading space of the next line stands in for it.
				start += brk + 1;
			}
			None => {
				push_line(&mut lines, &canonical[start..], first);
				break;
			}
		}
	}

	lines
}

/// Concatenate continuation segments verbatim into one canonical string.
pub fn unfold<S: AsRef<str>>(segments: &[S]) -> String {
	let mut canonical = String::with_capacity(segments.iter().map(|s| s.as_ref().len()).sum());
	for segment in segments {
		canonical.push_str(segment.as_ref());
	}
	canonical
}

/// Find the break offset for the next line of `remainder`.
///
/// Returns the rightmost candidate at or before `budget`, or the first
/// candidate beyond it. Candidates are whitespace bytes followed by
/// non-whitespace, so a break never lands inside a UTF-8 sequence and the
/// byte after the break is never whitespace. A candidate at offset 0 yields
/// a zero-length line; the one-byte separator skip still guarantees advance.
fn find_breakpoint(remainder: &[u8], budget: usize) -> Option<usize> {
	let mut best = None;
	for i in 0..remainder.len().saturating_sub(1) {
		if remainder[i].is_ascii_whitespace() && !remainder[i + 1].is_ascii_whitespace() {
			if i <= budget {
				best = Some(i);
			} else {
				// First breakpoint past the budget: only wanted when nothing
				// fit, and scanning further cannot improve on it.
				return best.or(Some(i));
			}
		}
	}
	best
}

fn push_line(lines: &mut Vec<String>, content: &str, first: bool) {
	if !first && !content.as_bytes().first().is_some_and(|b| b.is_ascii_whitespace()) {
		let mut line = String::with_capacity(content.len() + 1);
		line.push(' ');
		line.push_str(content);
		lines.push(line);
	} else {
		lines.push(content.to_string());
	}
}
