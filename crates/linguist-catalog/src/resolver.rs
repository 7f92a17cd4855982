// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Message resolution with fallback.
//!
//! A lookup walks up to three tiers: the active catalog, the built-in
//! source-language catalog, then the literal source text. Inside a catalog
//! tier the key must resolve to a current message; plural messages then pick
//! a variant for the quantity. Any miss moves on to the next tier. The
//! chosen text always goes through placeholder substitution, the literal
//! source included.
//!
//! Resolution never fails: the worst case is the source text with its
//! placeholders filled in.

use tracing::trace;

use crate::error::LookupMiss;
use crate::model::Status;
use crate::plural::select_variant;
use crate::store::CatalogStore;
use crate::substitute::{substitute, substitute_quantity};

/// Which tier produced a resolved string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
	/// The active catalog.
	Translated,
	/// The built-in source-language catalog.
	Fallback,
	/// The literal source text.
	Source,
}

/// Final display text of one lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedString {
	pub text: String,
	pub origin: Origin,
}

impl ResolvedString {
	pub fn is_translated(&self) -> bool {
		self.origin == Origin::Translated
	}

	pub fn into_string(self) -> String {
		self.text
	}
}

impl std::fmt::Display for ResolvedString {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.text)
	}
}

/// One lookup: the message key plus what to fill it with.
#[derive(Debug, Clone, Copy)]
pub struct Request<'r> {
	pub context: &'r str,
	pub source: &'r str,
	pub disambiguator: Option<&'r str>,
	pub quantity: Option<i64>,
	pub args: &'r [&'r str],
}

impl<'r> Request<'r> {
	pub fn new(context: &'r str, source: &'r str) -> Self {
		Self {
			context,
			source,
			disambiguator: None,
			quantity: None,
			args: &[],
		}
	}

	pub fn disambiguator(mut self, disambiguator: Option<&'r str>) -> Self {
		self.disambiguator = disambiguator;
		self
	}

	pub fn quantity(mut self, quantity: i64) -> Self {
		self.quantity = Some(quantity);
		self
	}

	pub fn args(mut self, args: &'r [&'r str]) -> Self {
		self.args = args;
		self
	}
}

/// Resolves requests against a fixed pair of catalogs.
#[derive(Debug, Clone, Copy, Default)]
pub struct Resolver<'a> {
	active: Option<&'a CatalogStore>,
	fallback: Option<&'a CatalogStore>,
}

impl<'a> Resolver<'a> {
	pub fn new(active: Option<&'a CatalogStore>, fallback: Option<&'a CatalogStore>) -> Self {
		Self { active, fallback }
	}

	/// Translation of a simple message, with `%N` markers filled from `args`.
	pub fn resolve(
		&self,
		context: &str,
		source: &str,
		disambiguator: Option<&str>,
		args: &[&str],
	) -> String {
		let request = Request::new(context, source)
			.disambiguator(disambiguator)
			.args(args);
		self.resolve_detailed(&request).text
	}

	/// Translation of a quantity-dependent message; `%n` becomes `quantity`.
	pub fn resolve_n(
		&self,
		context: &str,
		source: &str,
		disambiguator: Option<&str>,
		quantity: i64,
		args: &[&str],
	) -> String {
		let request = Request::new(context, source)
			.disambiguator(disambiguator)
			.quantity(quantity)
			.args(args);
		self.resolve_detailed(&request).text
	}

	pub fn resolve_detailed(&self, request: &Request<'_>) -> ResolvedString {
		let tiers = [
			(self.active, Origin::Translated),
			(self.fallback, Origin::Fallback),
		];
		for (store, origin) in tiers {
			let Some(store) = store else {
				continue;
			};
			match translate_in(store, request) {
				Ok(template) => {
					return ResolvedString {
						text: fill(template, request),
						origin,
					};
				}
				Err(miss) => {
					trace!(
						language = store.language(),
						context = request.context,
						source = request.source,
						%miss,
						"catalog tier missed"
					);
				}
			}
		}

		ResolvedString {
			text: fill(request.source, request),
			origin: Origin::Source,
		}
	}
}

/// Picks the variant text for a request from one catalog.
fn translate_in<'s>(store: &'s CatalogStore, request: &Request<'_>) -> Result<&'s str, LookupMiss> {
	let message = store
		.lookup(request.context, request.source, request.disambiguator)
		.ok_or(LookupMiss::KeyNotFound)?;
	if message.status != Status::Current {
		return Err(LookupMiss::Unfinished);
	}

	let index = match request.quantity {
		Some(quantity) if message.variants.len() != 1 => {
			select_variant(store.language(), quantity, message.variants.len())
				.map_err(LookupMiss::PluralMismatch)?
		}
		_ => 0,
	};

	message
		.variants
		.get(index)
		.map(String::as_str)
		.ok_or(LookupMiss::KeyNotFound)
}

fn fill(template: &str, request: &Request<'_>) -> String {
	match request.quantity {
		Some(quantity) => substitute_quantity(template, request.args, quantity),
		None => substitute(template, request.args),
	}
}
