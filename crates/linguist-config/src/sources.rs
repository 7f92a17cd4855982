// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: built-in defaults, TOML files and environment variables.

use std::path::PathBuf;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::{ConfigFile, I18nConfigLayer};

pub const ENV_CATALOG_DIR: &str = "LINGUIST_CATALOG_DIR";
pub const ENV_FILE_PREFIX: &str = "LINGUIST_FILE_PREFIX";
pub const ENV_LOCALE: &str = "LINGUIST_LOCALE";
pub const ENV_FALLBACK_LOCALE: &str = "LINGUIST_FALLBACK_LOCALE";

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<I18nConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<I18nConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(I18nConfigLayer::default())
	}
}

/// TOML file configuration source. A missing file contributes nothing.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new("/etc/linguist/i18n.toml")
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<I18nConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(I18nConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let file: ConfigFile = toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
			path: self.path.clone(),
			source: e,
		})?;

		trace!("parsed config layer from TOML");
		Ok(file.i18n)
	}
}

/// Environment variable source.
///
/// Convention: LINGUIST_<FIELD>
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<I18nConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(layer_from_lookup(env_var))
	}
}

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn layer_from_lookup(get: impl Fn(&str) -> Option<String>) -> I18nConfigLayer {
	I18nConfigLayer {
		catalog_dir: get(ENV_CATALOG_DIR).map(PathBuf::from),
		file_prefix: get(ENV_FILE_PREFIX),
		locale: get(ENV_LOCALE),
		fallback_locale: get(ENV_FALLBACK_LOCALE),
	}
}
