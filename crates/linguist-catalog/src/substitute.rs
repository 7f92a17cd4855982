// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Positional placeholder substitution.
//!
//! Markers are `%1`..`%99` (optionally written `%L1`), replaced by the
//! matching 1-indexed argument, and `%n`/`%Ln`, replaced by the quantity of
//! a plural lookup. The template is scanned once from left to right, so
//! substituted values are never re-scanned.
//!
//! # Failure Modes
//!
//! | Input | Behavior |
//! |-------|----------|
//! | `%3` with two arguments | Marker left as-is |
//! | `%n` without a quantity | Marker left as-is |
//! | `%` not followed by a marker | Copied unchanged |

use std::borrow::Cow;

enum Marker {
	Arg(usize),
	Quantity,
}

/// Replaces `%N` markers with `args[N - 1]`.
///
/// ```
/// use linguist_catalog::substitute;
///
/// assert_eq!(substitute("詳細(%2の%1)(&D)", &["3", "5"]), "詳細(5の3)(&D)");
/// assert_eq!(substitute("%1 of %2", &["1"]), "1 of %2");
/// assert_eq!(substitute("100%", &[]), "100%");
/// ```
pub fn substitute(template: &str, args: &[&str]) -> String {
	render(template, args, None)
}

/// Like [`substitute`], additionally replacing `%n` with `quantity`.
pub fn substitute_quantity(template: &str, args: &[&str], quantity: i64) -> String {
	render(template, args, Some(quantity))
}

fn render(template: &str, args: &[&str], quantity: Option<i64>) -> String {
	let bytes = template.as_bytes();
	let mut out = String::with_capacity(template.len());
	let mut copied = 0;
	let mut i = 0;

	while i < bytes.len() {
		if bytes[i] != b'%' {
			i += 1;
			continue;
		}
		let Some((marker, end)) = parse_marker(bytes, i + 1) else {
			i += 1;
			continue;
		};
		let replacement = match marker {
			Marker::Arg(n) => args.get(n - 1).map(|arg| Cow::Borrowed(*arg)),
			Marker::Quantity => quantity.map(|q| Cow::Owned(q.to_string())),
		};
		if let Some(replacement) = replacement {
			out.push_str(&template[copied..i]);
			out.push_str(&replacement);
			copied = end;
		}
		i = end;
	}

	out.push_str(&template[copied..]);
	out
}

/// Parses the marker following a `%` at `start`, returning it and the index
/// just past it.
fn parse_marker(bytes: &[u8], start: usize) -> Option<(Marker, usize)> {
	let mut pos = start;
	if bytes.get(pos) == Some(&b'L') {
		pos += 1;
	}
	match bytes.get(pos).copied() {
		Some(b'n') => Some((Marker::Quantity, pos + 1)),
		Some(first @ b'1'..=b'9') => {
			let mut value = usize::from(first - b'0');
			let mut end = pos + 1;
			if let Some(second) = bytes.get(end).copied().filter(u8::is_ascii_digit) {
				value = value * 10 + usize::from(second - b'0');
				end += 1;
			}
			Some((Marker::Arg(value), end))
		}
		_ => None,
	}
}
