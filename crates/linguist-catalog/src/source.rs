// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Where catalog documents come from.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::CatalogError;
use crate::locale::LocaleTag;
use crate::model::Catalog;
use crate::parser::{parse_catalog, parse_catalog_bytes};

/// File extension of catalog documents.
pub const CATALOG_EXTENSION: &str = "ts";

/// Locates and parses the catalog for a locale.
///
/// Implementations may block; the switcher calls them off the async runtime.
pub trait CatalogSource: Send + Sync {
	fn name(&self) -> &'static str;

	/// Loads the catalog for `locale`, trying the most specific tag first.
	/// Returns [`CatalogError::LocaleUnavailable`] when no document exists.
	fn load(&self, locale: &LocaleTag) -> Result<Catalog, CatalogError>;
}

/// Catalog files named `{prefix}_{locale}.ts` in one directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
	dir: PathBuf,
	prefix: String,
}

impl DirectorySource {
	pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
		Self {
			dir: dir.into(),
			prefix: prefix.into(),
		}
	}

	pub fn dir(&self) -> &Path {
		&self.dir
	}

	/// Path a catalog for the exact tag would have.
	pub fn path_for(&self, tag: &str) -> PathBuf {
		self
			.dir
			.join(format!("{}_{}.{}", self.prefix, tag, CATALOG_EXTENSION))
	}
}

impl CatalogSource for DirectorySource {
	fn name(&self) -> &'static str {
		"directory"
	}

	fn load(&self, locale: &LocaleTag) -> Result<Catalog, CatalogError> {
		for candidate in locale.candidates() {
			let path = self.path_for(&candidate);
			let bytes = match std::fs::read(&path) {
				Ok(bytes) => bytes,
				Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
					debug!(path = %path.display(), "no catalog file");
					continue;
				}
				Err(source) => return Err(CatalogError::Io { path, source }),
			};
			debug!(path = %path.display(), bytes = bytes.len(), "parsing catalog file");
			return parse_catalog_bytes(&bytes);
		}
		Err(CatalogError::LocaleUnavailable(locale.to_string()))
	}
}

/// Catalog documents held in memory, keyed by normalised locale tag.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
	documents: HashMap<String, String>,
}

impl MemorySource {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a document. Tags that fail to parse are stored verbatim.
	pub fn with_document(mut self, locale: &str, document: impl Into<String>) -> Self {
		let key = LocaleTag::parse(locale)
			.map(|tag| tag.to_string())
			.unwrap_or_else(|_| locale.to_string());
		self.documents.insert(key, document.into());
		self
	}
}

impl CatalogSource for MemorySource {
	fn name(&self) -> &'static str {
		"memory"
	}

	fn load(&self, locale: &LocaleTag) -> Result<Catalog, CatalogError> {
		locale
			.candidates()
			.iter()
			.find_map(|candidate| self.documents.get(candidate))
			.ok_or_else(|| CatalogError::LocaleUnavailable(locale.to_string()))
			.and_then(|document| parse_catalog(document))
	}
}
