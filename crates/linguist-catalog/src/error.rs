// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for catalog loading and locale switching.
//!
//! Only loading and switching surface errors. Lookup failures are absorbed by
//! the resolver and never reach callers.

use std::path::PathBuf;

use crate::plural::PluralMismatch;

/// Errors from parsing, locating or installing a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
	/// The document is not well-formed or its structure is not a catalog.
	#[error("malformed catalog at byte {offset}: {reason}")]
	Malformed { offset: u64, reason: String },

	/// The root element carries no `language` attribute.
	#[error("catalog does not declare a language")]
	MissingLanguage,

	/// A message has no `<source>` element.
	#[error("message {index} in context '{context}' has no source text")]
	MissingSource { context: String, index: usize },

	/// A context has an empty `<name>`.
	#[error("context {index} has an empty name")]
	EmptyContextName { index: usize },

	/// A catalog file exists but could not be read.
	#[error("failed to read catalog {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// No catalog document exists for the requested locale.
	#[error("no catalog available for locale '{0}'")]
	LocaleUnavailable(String),

	/// A newer locale request was issued before this one finished loading.
	#[error("request for locale '{0}' was superseded by a newer request")]
	Superseded(String),

	/// No process-wide switcher has been installed.
	#[error("catalog switcher has not been installed")]
	NotInitialized,

	/// The background load task panicked or was cancelled.
	#[error("catalog load task failed: {0}")]
	Task(String),
}

impl CatalogError {
	pub fn malformed(offset: u64, reason: impl Into<String>) -> Self {
		Self::Malformed {
			offset,
			reason: reason.into(),
		}
	}
}

/// Why a catalog tier could not answer a lookup. Recovered locally by
/// falling through to the next tier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupMiss {
	/// No active message exists for the key.
	#[error("key not found")]
	KeyNotFound,
	/// The message exists but its translation is not finished.
	#[error("translation unfinished")]
	Unfinished,
	/// The message has fewer variants than the plural rule requires.
	#[error(transparent)]
	PluralMismatch(#[from] PluralMismatch),
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::plural::PluralCategory;

	#[test]
	fn test_lookup_miss_messages() {
		assert_eq!(LookupMiss::KeyNotFound.to_string(), "key not found");
		assert_eq!(LookupMiss::Unfinished.to_string(), "translation unfinished");

		let mismatch = PluralMismatch {
			language: "ru".to_string(),
			category: PluralCategory::Many,
			index: 2,
			available: 2,
		};
		let miss = LookupMiss::from(mismatch.clone());
		assert_eq!(miss.to_string(), mismatch.to_string());
		assert!(std::error::Error::source(&miss).is_none());
	}

	#[test]
	fn test_malformed_display() {
		let err = CatalogError::malformed(42, "unbalanced closing tag");
		assert_eq!(err.to_string(), "malformed catalog at byte 42: unbalanced closing tag");
	}
}
