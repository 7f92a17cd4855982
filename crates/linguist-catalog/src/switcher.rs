// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Process-wide active catalog with atomic locale switching.
//!
//! # Invariants
//!
//! 1. **Single snapshot per lookup**: readers load one [`CatalogSnapshot`]
//!    and resolve entirely against it; they never block and never see a mix
//!    of two catalogs.
//! 2. **Whole replacement**: a locale change builds a new snapshot and swaps
//!    the pointer; installed catalogs are never mutated.
//! 3. **Newest request wins**: every `set_locale` call takes a ticket when it
//!    is issued. A load finishing after a newer request was issued is
//!    discarded with [`CatalogError::Superseded`].
//! 4. **Failures keep the old catalog**: a request that cannot be loaded
//!    leaves the current snapshot installed.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use linguist_config::I18nConfig;
use tracing::{debug, info, warn};

use crate::error::CatalogError;
use crate::locale::LocaleTag;
use crate::model::Catalog;
use crate::resolver::{Request, ResolvedString, Resolver};
use crate::source::{CatalogSource, DirectorySource};
use crate::store::CatalogStore;

/// One consistent view of the installed catalogs.
#[derive(Debug, Default)]
pub struct CatalogSnapshot {
	generation: u64,
	locale: Option<LocaleTag>,
	active: Option<Arc<CatalogStore>>,
	fallback: Option<Arc<CatalogStore>>,
}

impl CatalogSnapshot {
	/// Locale of the last successful switch, if any.
	pub fn locale(&self) -> Option<&LocaleTag> {
		self.locale.as_ref()
	}

	pub fn active(&self) -> Option<&CatalogStore> {
		self.active.as_deref()
	}

	pub fn fallback(&self) -> Option<&CatalogStore> {
		self.fallback.as_deref()
	}

	pub fn resolver(&self) -> Resolver<'_> {
		Resolver::new(self.active(), self.fallback())
	}
}

struct Shared {
	current: ArcSwap<CatalogSnapshot>,
	requested: AtomicU64,
	source: Arc<dyn CatalogSource>,
	source_language: Option<LocaleTag>,
}

impl Shared {
	/// Loads and indexes a catalog. Blocking.
	///
	/// The source language may have no catalog of its own; switching to it
	/// then installs no active catalog instead of failing.
	fn load(&self, locale: &LocaleTag) -> Result<Option<CatalogStore>, CatalogError> {
		match self.source.load(locale) {
			Ok(catalog) => Ok(Some(CatalogStore::new(catalog))),
			Err(CatalogError::LocaleUnavailable(_)) if self.is_source_language(locale) => {
				debug!(locale = %locale, "no catalog for the source language, using source text");
				Ok(None)
			}
			Err(e) => {
				warn!(locale = %locale, source = self.source.name(), error = %e, "failed to load catalog");
				Err(e)
			}
		}
	}

	fn is_source_language(&self, locale: &LocaleTag) -> bool {
		self
			.source_language
			.as_ref()
			.is_some_and(|source| source.language() == locale.language())
	}

	fn install(
		&self,
		ticket: u64,
		locale: LocaleTag,
		store: Option<CatalogStore>,
	) -> Result<(), CatalogError> {
		let store = store.map(Arc::new);
		let mut installed = false;

		self.current.rcu(|current| {
			installed =
				self.requested.load(Ordering::SeqCst) == ticket && current.generation < ticket;
			if installed {
				Arc::new(CatalogSnapshot {
					generation: ticket,
					locale: Some(locale.clone()),
					active: store.clone(),
					fallback: current.fallback.clone(),
				})
			} else {
				Arc::clone(current)
			}
		});

		if !installed {
			debug!(locale = %locale, ticket, "discarding superseded catalog load");
			return Err(CatalogError::Superseded(locale.to_string()));
		}

		match &store {
			Some(store) => info!(
				locale = %locale,
				language = store.language(),
				messages = store.len(),
				"catalog installed"
			),
			None => info!(locale = %locale, "source language installed"),
		}
		Ok(())
	}
}

/// Holds the active and fallback catalogs and swaps them on locale change.
///
/// Cloning is cheap; clones share the same state.
#[derive(Clone)]
pub struct CatalogSwitcher {
	shared: Arc<Shared>,
}

impl std::fmt::Debug for CatalogSwitcher {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("CatalogSwitcher")
			.field("source", &self.shared.source.name())
			.field("snapshot", &self.shared.current.load_full())
			.finish()
	}
}

impl CatalogSwitcher {
	/// Creates a switcher with no active catalog. When `fallback_locale` is
	/// given its catalog is loaded now, blocking, and consulted after the
	/// active catalog for every lookup. A missing or broken fallback catalog
	/// is logged and skipped.
	pub fn new(source: Arc<dyn CatalogSource>, fallback_locale: Option<&str>) -> Self {
		let source_language = fallback_locale.and_then(|tag| match LocaleTag::parse(tag) {
			Ok(tag) => Some(tag),
			Err(e) => {
				warn!(locale = tag, error = %e, "ignoring invalid fallback locale");
				None
			}
		});

		let fallback = source_language
			.as_ref()
			.and_then(|tag| match source.load(tag) {
				Ok(catalog) => Some(Arc::new(CatalogStore::new(catalog))),
				Err(CatalogError::LocaleUnavailable(_)) => {
					debug!(locale = %tag, "no fallback catalog, source text is the last resort");
					None
				}
				Err(e) => {
					warn!(locale = %tag, error = %e, "failed to load fallback catalog");
					None
				}
			});

		Self {
			shared: Arc::new(Shared {
				current: ArcSwap::from_pointee(CatalogSnapshot {
					fallback,
					..Default::default()
				}),
				requested: AtomicU64::new(0),
				source,
				source_language,
			}),
		}
	}

	/// Builds a directory-backed switcher and activates the configured
	/// locale. An unavailable initial locale is logged and the switcher
	/// starts on the fallback tier.
	pub fn from_config(config: &I18nConfig) -> Self {
		let source = Arc::new(DirectorySource::new(
			config.catalog_dir.clone(),
			config.file_prefix.clone(),
		));
		let switcher = Self::new(source, Some(config.fallback_locale.as_str()));
		if let Err(e) = switcher.set_locale_blocking(&config.locale) {
			warn!(
				locale = %config.locale,
				catalog_dir = %config.catalog_dir.display(),
				error = %e,
				"initial locale unavailable, starting on fallback catalog"
			);
		}
		switcher
	}

	/// The current snapshot. Holding it pins those catalogs in memory.
	pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
		self.shared.current.load_full()
	}

	pub fn current_locale(&self) -> Option<String> {
		self.shared.current.load().locale().map(LocaleTag::to_string)
	}

	pub fn resolve(
		&self,
		context: &str,
		source: &str,
		disambiguator: Option<&str>,
		args: &[&str],
	) -> String {
		let snapshot = self.shared.current.load();
		snapshot.resolver().resolve(context, source, disambiguator, args)
	}

	pub fn resolve_n(
		&self,
		context: &str,
		source: &str,
		disambiguator: Option<&str>,
		quantity: i64,
		args: &[&str],
	) -> String {
		let snapshot = self.shared.current.load();
		snapshot
			.resolver()
			.resolve_n(context, source, disambiguator, quantity, args)
	}

	pub fn resolve_detailed(&self, request: &Request<'_>) -> ResolvedString {
		let snapshot = self.shared.current.load();
		snapshot.resolver().resolve_detailed(request)
	}

	/// Switches to `tag`. The request is ordered when this is called; the
	/// returned future parses the catalog on the blocking pool and installs
	/// it unless a newer request was issued meanwhile.
	///
	/// Polled outside a Tokio runtime the future resolves to
	/// [`CatalogError::Task`] and nothing is installed; use
	/// [`Self::set_locale_blocking`] there.
	pub fn set_locale(&self, tag: &str) -> impl Future<Output = Result<(), CatalogError>> + Send + 'static {
		let shared = Arc::clone(&self.shared);
		let ticket = shared.requested.fetch_add(1, Ordering::SeqCst) + 1;
		let tag = tag.to_string();

		async move {
			let runtime = tokio::runtime::Handle::try_current()
				.map_err(|e| CatalogError::Task(e.to_string()))?;
			let locale = LocaleTag::parse(&tag)?;
			let loader = Arc::clone(&shared);
			let store = runtime.spawn_blocking({
				let locale = locale.clone();
				move || loader.load(&locale)
			})
			.await
			.map_err(|e| CatalogError::Task(e.to_string()))??;
			shared.install(ticket, locale, store)
		}
	}

	/// Synchronous [`Self::set_locale`] for callers outside a runtime.
	pub fn set_locale_blocking(&self, tag: &str) -> Result<(), CatalogError> {
		let ticket = self.shared.requested.fetch_add(1, Ordering::SeqCst) + 1;
		let locale = LocaleTag::parse(tag)?;
		let store = self.shared.load(&locale)?;
		self.shared.install(ticket, locale, store)
	}

	/// Installs an already-parsed catalog as the active one.
	pub fn install_catalog(&self, catalog: Catalog) -> Result<(), CatalogError> {
		let ticket = self.shared.requested.fetch_add(1, Ordering::SeqCst) + 1;
		let locale = LocaleTag::parse(catalog.language())?;
		self.shared
			.install(ticket, locale, Some(CatalogStore::new(catalog)))
	}
}
