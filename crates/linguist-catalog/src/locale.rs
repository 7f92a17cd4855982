// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Locale tag normalisation.

use std::fmt;

use crate::error::CatalogError;

/// A normalised locale tag: lowercase language, optional uppercase region,
/// joined with `_` (the catalog file naming convention).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocaleTag {
	language: String,
	region: Option<String>,
}

impl LocaleTag {
	/// Parses `ja`, `ja_JP`, `ja-jp` and similar. Anything past the region
	/// subtag (scripts, variants) is ignored.
	///
	/// ```
	/// use linguist_catalog::LocaleTag;
	///
	/// let tag = LocaleTag::parse("pt-br").unwrap();
	/// assert_eq!(tag.as_string(), "pt_BR");
	/// assert_eq!(tag.language(), "pt");
	/// ```
	pub fn parse(tag: &str) -> Result<Self, CatalogError> {
		let tag = tag.trim();
		let mut parts = tag.split(['-', '_']);
		let language = parts.next().unwrap_or_default();
		if language.is_empty() || !language.chars().all(|c| c.is_ascii_alphabetic()) {
			return Err(CatalogError::LocaleUnavailable(tag.to_string()));
		}
		let region = match parts.next() {
			Some(region) if !region.is_empty() && region.chars().all(|c| c.is_ascii_alphanumeric()) => {
				Some(region.to_ascii_uppercase())
			}
			Some(_) => return Err(CatalogError::LocaleUnavailable(tag.to_string())),
			None => None,
		};
		Ok(Self {
			language: language.to_ascii_lowercase(),
			region,
		})
	}

	pub fn language(&self) -> &str {
		&self.language
	}

	pub fn region(&self) -> Option<&str> {
		self.region.as_deref()
	}

	pub fn as_string(&self) -> String {
		self.to_string()
	}

	/// Tags to try when locating a catalog, most specific first.
	pub fn candidates(&self) -> Vec<String> {
		let mut candidates = Vec::with_capacity(2);
		if self.region.is_some() {
			candidates.push(self.to_string());
		}
		candidates.push(self.language.clone());
		candidates
	}
}

impl fmt::Display for LocaleTag {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.region {
			Some(region) => write!(f, "{}_{}", self.language, region),
			None => write!(f, "{}", self.language),
		}
	}
}

/// Primary language subtag of a raw tag, lowercased. Never fails.
pub fn primary_language(tag: &str) -> String {
	tag.split(['-', '_'])
		.next()
		.unwrap_or(tag)
		.to_ascii_lowercase()
}
