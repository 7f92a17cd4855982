// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Partial configuration layers and the resolved configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_CATALOG_DIR: &str = "./nls";
pub const DEFAULT_FILE_PREFIX: &str = "app";
pub const DEFAULT_LOCALE: &str = "en";

/// Top-level shape of a TOML config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConfigFile {
	#[serde(default)]
	pub i18n: I18nConfigLayer,
}

/// One source's view of the i18n settings. Every field is optional so that
/// layers can be stacked.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct I18nConfigLayer {
	pub catalog_dir: Option<PathBuf>,
	pub file_prefix: Option<String>,
	pub locale: Option<String>,
	pub fallback_locale: Option<String>,
}

impl I18nConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.catalog_dir.is_some() {
			self.catalog_dir = other.catalog_dir;
		}
		if other.file_prefix.is_some() {
			self.file_prefix = other.file_prefix;
		}
		if other.locale.is_some() {
			self.locale = other.locale;
		}
		if other.fallback_locale.is_some() {
			self.fallback_locale = other.fallback_locale;
		}
	}

	pub fn finalize(self) -> Result<I18nConfig, ConfigError> {
		let config = I18nConfig {
			catalog_dir: self
				.catalog_dir
				.unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_DIR)),
			file_prefix: self
				.file_prefix
				.unwrap_or_else(|| DEFAULT_FILE_PREFIX.to_string()),
			locale: self.locale.unwrap_or_else(|| DEFAULT_LOCALE.to_string()),
			fallback_locale: self
				.fallback_locale
				.unwrap_or_else(|| DEFAULT_LOCALE.to_string()),
		};
		config.validate()?;
		Ok(config)
	}
}

/// Fully resolved i18n configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct I18nConfig {
	/// Directory holding `{file_prefix}_{locale}.ts` catalog documents.
	pub catalog_dir: PathBuf,
	pub file_prefix: String,
	/// Locale activated at startup.
	pub locale: String,
	/// Built-in source-language catalog consulted after the active one.
	pub fallback_locale: String,
}

impl Default for I18nConfig {
	fn default() -> Self {
		Self {
			catalog_dir: PathBuf::from(DEFAULT_CATALOG_DIR),
			file_prefix: DEFAULT_FILE_PREFIX.to_string(),
			locale: DEFAULT_LOCALE.to_string(),
			fallback_locale: DEFAULT_LOCALE.to_string(),
		}
	}
}

impl I18nConfig {
	fn validate(&self) -> Result<(), ConfigError> {
		if self.file_prefix.trim().is_empty() {
			return Err(ConfigError::invalid_value(
				"file_prefix",
				"must not be empty",
			));
		}
		validate_locale_tag("locale", &self.locale)?;
		validate_locale_tag("fallback_locale", &self.fallback_locale)?;
		Ok(())
	}
}

/// Accepts `ll`, `ll_CC`, `ll-CC` and longer tags. The language subtag is
/// ASCII alphabetic, later subtags ASCII alphanumeric; the catalog engine
/// parses tags by the same rule.
pub fn validate_locale_tag(key: &str, tag: &str) -> Result<(), ConfigError> {
	if tag.is_empty() {
		return Err(ConfigError::invalid_value(key, "locale tag must not be empty"));
	}
	let mut parts = tag.split(['-', '_']);
	let language_ok = parts
		.next()
		.is_some_and(|language| !language.is_empty() && language.chars().all(|c| c.is_ascii_alphabetic()));
	let rest_ok = parts.all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric()));
	if !(language_ok && rest_ok) {
		return Err(ConfigError::invalid_value(
			key,
			format!("'{tag}' is not a locale tag"),
		));
	}
	Ok(())
}
