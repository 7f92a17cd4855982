// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Plural rule selection.
//!
//! Each language has a closed, ordered list of plural categories. A plural
//! message stores one variant per category in that order, so selecting a
//! variant means categorising the quantity and taking the category's
//! position in the list.
//!
//! # Invariants
//!
//! 1. Every rule maps any `i64` to exactly one category of its own list.
//! 2. Selection is a pure function of `(language, quantity, variant_count)`.
//! 3. Variant counts are checked here, at lookup time, not when parsing.

use std::fmt;

use crate::locale::primary_language;

/// CLDR plural categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluralCategory {
	Zero,
	One,
	Two,
	Few,
	Many,
	Other,
}

impl fmt::Display for PluralCategory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Zero => write!(f, "zero"),
			Self::One => write!(f, "one"),
			Self::Two => write!(f, "two"),
			Self::Few => write!(f, "few"),
			Self::Many => write!(f, "many"),
			Self::Other => write!(f, "other"),
		}
	}
}

/// The message has fewer variants than the selected category needs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("plural category '{category}' of '{language}' needs variant {index} but only {available} exist")]
pub struct PluralMismatch {
	pub language: String,
	pub category: PluralCategory,
	pub index: usize,
	pub available: usize,
}

/// Plural rule families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluralRule {
	/// No number inflection: always `other` (Japanese, Chinese, Korean, ...).
	Invariant,
	/// `one` for 1, `other` otherwise.
	English,
	/// `one` for 0 and 1, `other` otherwise.
	French,
	/// `one`/`few`/`many` by the last two digits.
	Russian,
	/// `one` for 1, `few` for 2-4, `other` otherwise.
	Czech,
	/// `one` for 1, `few`/`many` by the last two digits.
	Polish,
	/// Six categories.
	Arabic,
}

impl PluralRule {
	/// Rule for a language tag. Unknown languages use the English rule.
	pub fn for_language(tag: &str) -> Self {
		match primary_language(tag).as_str() {
			"ja" | "zh" | "ko" | "vi" | "th" | "id" | "ms" | "lo" | "my" | "km" => Self::Invariant,
			"fr" | "pt" | "hi" | "bn" | "fa" => Self::French,
			"ru" | "uk" | "be" | "hr" | "sr" | "bs" => Self::Russian,
			"cs" | "sk" => Self::Czech,
			"pl" => Self::Polish,
			"ar" => Self::Arabic,
			_ => Self::English,
		}
	}

	/// Categories in variant order.
	pub fn categories(&self) -> &'static [PluralCategory] {
		use PluralCategory::*;
		match self {
			Self::Invariant => &[Other],
			Self::English | Self::French => &[One, Other],
			Self::Russian | Self::Polish => &[One, Few, Many],
			Self::Czech => &[One, Few, Other],
			Self::Arabic => &[Zero, One, Two, Few, Many, Other],
		}
	}

	pub fn categorize(&self, quantity: i64) -> PluralCategory {
		let n = quantity.unsigned_abs();
		let mod10 = n % 10;
		let mod100 = n % 100;
		match self {
			Self::Invariant => PluralCategory::Other,
			Self::English => {
				if n == 1 {
					PluralCategory::One
				} else {
					PluralCategory::Other
				}
			}
			Self::French => {
				if n <= 1 {
					PluralCategory::One
				} else {
					PluralCategory::Other
				}
			}
			Self::Russian => {
				if mod10 == 1 && mod100 != 11 {
					PluralCategory::One
				} else if (2..=4).contains(&mod10) && !(12..=14).contains(&mod100) {
					PluralCategory::Few
				} else {
					PluralCategory::Many
				}
			}
			Self::Czech => match n {
				1 => PluralCategory::One,
				2..=4 => PluralCategory::Few,
				_ => PluralCategory::Other,
			},
			Self::Polish => {
				if n == 1 {
					PluralCategory::One
				} else if (2..=4).contains(&mod10) && !(12..=14).contains(&mod100) {
					PluralCategory::Few
				} else {
					PluralCategory::Many
				}
			}
			Self::Arabic => match n {
				0 => PluralCategory::Zero,
				1 => PluralCategory::One,
				2 => PluralCategory::Two,
				_ if (3..=10).contains(&mod100) => PluralCategory::Few,
				_ if (11..=99).contains(&mod100) => PluralCategory::Many,
				_ => PluralCategory::Other,
			},
		}
	}

	/// Position of the quantity's category in [`Self::categories`].
	pub fn ordinal(&self, quantity: i64) -> (PluralCategory, usize) {
		let category = self.categorize(quantity);
		let categories = self.categories();
		let index = categories
			.iter()
			.position(|c| *c == category)
			.unwrap_or(categories.len() - 1);
		(category, index)
	}
}

/// Picks which variant of a plural message applies to `quantity`.
///
/// ```
/// use linguist_catalog::select_variant;
///
/// assert_eq!(select_variant("en", 1, 2), Ok(0));
/// assert_eq!(select_variant("en", 5, 2), Ok(1));
/// assert_eq!(select_variant("ja", 5, 1), Ok(0));
/// assert!(select_variant("ru", 5, 2).is_err());
/// ```
pub fn select_variant(
	language_tag: &str,
	quantity: i64,
	variant_count: usize,
) -> Result<usize, PluralMismatch> {
	let (category, index) = PluralRule::for_language(language_tag).ordinal(quantity);
	if index >= variant_count {
		return Err(PluralMismatch {
			language: language_tag.to_string(),
			category,
			index,
			available: variant_count,
		});
	}
	Ok(index)
}
