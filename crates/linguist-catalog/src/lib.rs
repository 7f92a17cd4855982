// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Translation catalog engine.
//!
//! Loads Qt Linguist `.ts` catalogs and resolves UI strings by
//! `(context, source text, disambiguator)`, with plural variants, `%N`
//! placeholders and graceful fallback to the source text.
//!
//! Lookups never fail. When no current translation exists the engine tries
//! the built-in source-language catalog and then returns the source text
//! itself, placeholders filled in.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use linguist_catalog::{CatalogSwitcher, MemorySource};
//!
//! let source = MemorySource::new().with_document(
//!     "ja",
//!     r#"<TS language="ja"><context><name>QIMessageBox</name>
//!        <message><source>&amp;Details (%1 of %2)</source>
//!        <translation>詳細(%2の%1)(&amp;D)</translation></message>
//!        </context></TS>"#,
//! );
//! let switcher = CatalogSwitcher::new(Arc::new(source), Some("en"));
//! switcher.set_locale_blocking("ja_JP").unwrap();
//!
//! let text = switcher.resolve("QIMessageBox", "&Details (%1 of %2)", None, &["3", "5"]);
//! assert_eq!(text, "詳細(5の3)(&D)");
//!
//! // Unknown keys degrade to the source text.
//! assert_eq!(switcher.resolve("QIMessageBox", "Retry", None, &[]), "Retry");
//! ```
//!
//! # Process-wide use
//!
//! Applications install one switcher at startup and use the free functions
//! or [`tr!`] everywhere else:
//!
//! ```ignore
//! let config = linguist_config::load_config()?;
//! linguist_catalog::install(CatalogSwitcher::from_config(&config));
//!
//! let title = tr!("UIVMListView", "%n year(s)", n = 5);
//! linguist_catalog::set_locale("de").await?;
//! ```

mod error;
mod locale;
mod model;
mod parser;
mod plural;
mod resolver;
mod source;
mod store;
mod substitute;
mod switcher;

use std::future::Future;

use once_cell::sync::OnceCell;

pub use error::{CatalogError, LookupMiss};
pub use locale::LocaleTag;
pub use model::{Catalog, CatalogStats, Context, Location, Message, Status, META_CONTEXT};
pub use parser::{parse_catalog, parse_catalog_bytes};
pub use plural::{select_variant, PluralCategory, PluralMismatch, PluralRule};
pub use resolver::{Origin, Request, ResolvedString, Resolver};
pub use source::{CatalogSource, DirectorySource, MemorySource, CATALOG_EXTENSION};
pub use store::CatalogStore;
pub use substitute::{substitute, substitute_quantity};
pub use switcher::{CatalogSnapshot, CatalogSwitcher};

static SWITCHER: OnceCell<CatalogSwitcher> = OnceCell::new();

/// Installs the process-wide switcher. Only the first call wins; later
/// calls get their switcher back.
pub fn install(switcher: CatalogSwitcher) -> Result<(), CatalogSwitcher> {
	SWITCHER.set(switcher)
}

/// The process-wide switcher, if installed.
pub fn switcher() -> Option<&'static CatalogSwitcher> {
	SWITCHER.get()
}

/// Translates a simple message with the process-wide catalogs.
///
/// Without an installed switcher the source text is returned, placeholders
/// filled in.
pub fn resolve(context: &str, source: &str, disambiguator: Option<&str>, args: &[&str]) -> String {
	match SWITCHER.get() {
		Some(switcher) => switcher.resolve(context, source, disambiguator, args),
		None => substitute(source, args),
	}
}

/// Translates a quantity-dependent message with the process-wide catalogs.
pub fn resolve_n(
	context: &str,
	source: &str,
	disambiguator: Option<&str>,
	quantity: i64,
	args: &[&str],
) -> String {
	match SWITCHER.get() {
		Some(switcher) => switcher.resolve_n(context, source, disambiguator, quantity, args),
		None => substitute_quantity(source, args, quantity),
	}
}

pub fn resolve_detailed(request: &Request<'_>) -> ResolvedString {
	match SWITCHER.get() {
		Some(switcher) => switcher.resolve_detailed(request),
		None => Resolver::default().resolve_detailed(request),
	}
}

/// Switches the process-wide locale. See [`CatalogSwitcher::set_locale`].
///
/// The future must be polled inside a Tokio runtime; elsewhere it resolves to
/// [`CatalogError::Task`].
pub fn set_locale(tag: &str) -> impl Future<Output = Result<(), CatalogError>> + Send + 'static {
	let pending = SWITCHER.get().map(|switcher| switcher.set_locale(tag));
	async move {
		match pending {
			Some(pending) => pending.await,
			None => Err(CatalogError::NotInitialized),
		}
	}
}

pub fn current_locale() -> Option<String> {
	SWITCHER.get().and_then(CatalogSwitcher::current_locale)
}

/// Translates with the process-wide catalogs.
///
/// ```ignore
/// tr!("QIMessageBox", "OK");
/// tr!("QIMessageBox", "&Details (%1 of %2)"; index, total);
/// tr!("UIGlobalSettingsUpdate", "invalid", comment = "value state");
/// tr!("UIGlobalSettingsUpdate", "%n year(s)", n = years);
/// ```
///
/// Arguments may be anything implementing `Display`.
#[macro_export]
macro_rules! tr {
	($context:expr, $source:expr $(; $($arg:expr),+ )? $(,)?) => {
		$crate::resolve(
			$context,
			$source,
			::core::option::Option::None,
			&[$($(&$arg.to_string() as &str),+)?],
		)
	};
	($context:expr, $source:expr, comment = $comment:expr $(; $($arg:expr),+ )? $(,)?) => {
		$crate::resolve(
			$context,
			$source,
			::core::option::Option::Some($comment),
			&[$($(&$arg.to_string() as &str),+)?],
		)
	};
	($context:expr, $source:expr, n = $n:expr $(; $($arg:expr),+ )? $(,)?) => {
		$crate::resolve_n(
			$context,
			$source,
			::core::option::Option::None,
			::core::convert::Into::<i64>::into($n),
			&[$($(&$arg.to_string() as &str),+)?],
		)
	};
	($context:expr, $source:expr, comment = $comment:expr, n = $n:expr $(; $($arg:expr),+ )? $(,)?) => {
		$crate::resolve_n(
			$context,
			$source,
			::core::option::Option::Some($comment),
			::core::convert::Into::<i64>::into($n),
			&[$($(&$arg.to_string() as &str),+)?],
		)
	};
}
