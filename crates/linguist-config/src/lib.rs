// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration for the translation catalog engine.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Validation of locale tags and catalog file naming
//! - Consistent environment variable naming (`LINGUIST_*`)
//!
//! # Usage
//!
//! ```ignore
//! use linguist_config::load_config;
//!
//! let config = load_config()?;
//! println!("catalogs in {}", config.catalog_dir.display());
//! ```

pub mod error;
pub mod layer;
pub mod sources;

pub use error::ConfigError;
pub use layer::{validate_locale_tag, ConfigFile, I18nConfig, I18nConfigLayer};
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use tracing::{debug, info};

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`LINGUIST_*`)
/// 2. Config file (`/etc/linguist/i18n.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<I18nConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration from environment only.
pub fn load_config_from_env() -> Result<I18nConfig, ConfigError> {
	load_from_sources(vec![Box::new(DefaultsSource), Box::new(EnvSource)])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<I18nConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<I18nConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = I18nConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		merged.merge(source.load()?);
	}

	let config = merged.finalize()?;
	info!(
		catalog_dir = %config.catalog_dir.display(),
		file_prefix = %config.file_prefix,
		locale = %config.locale,
		fallback_locale = %config.fallback_locale,
		"i18n configuration loaded"
	);
	Ok(config)
}
