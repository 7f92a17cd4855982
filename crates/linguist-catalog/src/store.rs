// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Indexed lookup over one catalog.
//!
//! # Invariants
//!
//! 1. **Obsolete exclusion**: obsolete messages are never indexed.
//! 2. **Last wins**: when two active messages share a key within a context,
//!    the one later in document order is the one indexed.
//! 3. **Immutable**: the index is built once; `CatalogStore` is `Send + Sync`
//!    and needs no locking for reads.

use std::collections::HashMap;

use tracing::debug;

use crate::model::{Catalog, Message};

/// Position of a message inside the owned catalog.
#[derive(Debug, Clone, Copy)]
struct Slot {
	context: usize,
	message: usize,
}

/// `source -> disambiguator -> slot` for one context. Nested maps keep
/// lookups allocation-free while the key stays the full triple.
type ContextIndex = HashMap<String, HashMap<String, Slot>>;

/// A catalog plus its `(context, source, disambiguator)` index.
#[derive(Debug)]
pub struct CatalogStore {
	catalog: Catalog,
	index: HashMap<String, ContextIndex>,
	active: usize,
}

impl CatalogStore {
	pub fn new(catalog: Catalog) -> Self {
		let mut index: HashMap<String, ContextIndex> = HashMap::new();
		let mut overridden = 0usize;

		for (ci, context) in catalog.contexts().iter().enumerate() {
			let by_source = index.entry(context.name.clone()).or_default();
			for (mi, message) in context.messages.iter().enumerate() {
				if !message.status.is_active() {
					continue;
				}
				let slot = Slot {
					context: ci,
					message: mi,
				};
				let previous = by_source
					.entry(message.source.clone())
					.or_default()
					.insert(message.disambiguator().to_string(), slot);
				if previous.is_some() {
					overridden += 1;
				}
			}
		}

		let active = index
			.values()
			.flat_map(|sources| sources.values())
			.map(HashMap::len)
			.sum();

		if overridden > 0 {
			debug!(
				language = catalog.language(),
				overridden, "duplicate active keys resolved by last-wins"
			);
		}

		Self {
			catalog,
			index,
			active,
		}
	}

	/// The active message for a key. `None` and `Some("")` are the same
	/// disambiguator.
	pub fn lookup(&self, context: &str, source: &str, disambiguator: Option<&str>) -> Option<&Message> {
		let slot = self
			.index
			.get(context)?
			.get(source)?
			.get(disambiguator.unwrap_or(""))?;
		self.catalog
			.contexts()
			.get(slot.context)?
			.messages
			.get(slot.message)
	}

	pub fn catalog(&self) -> &Catalog {
		&self.catalog
	}

	pub fn language(&self) -> &str {
		self.catalog.language()
	}

	/// Number of distinct active keys.
	pub fn len(&self) -> usize {
		self.active
	}

	pub fn is_empty(&self) -> bool {
		self.active == 0
	}
}

impl From<Catalog> for CatalogStore {
	fn from(catalog: Catalog) -> Self {
		Self::new(catalog)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::{Context, Status};
	use proptest::prelude::*;

	fn store(messages: Vec<Message>) -> CatalogStore {
		let mut context = Context::new("QIMessageBox");
		context.messages = messages;
		CatalogStore::new(Catalog::new("ja", vec![context]))
	}

	#[test]
	fn test_lookup_simple() {
		let store = store(vec![Message::new("OK", "OK")]);
		let message = store.lookup("QIMessageBox", "OK", None).unwrap();
		assert_eq!(message.variants, vec!["OK".to_string()]);
		assert!(store.lookup("QIMessageBox", "Cancel", None).is_none());
		assert!(store.lookup("Other", "OK", None).is_none());
	}

	#[test]
	fn test_last_wins_on_duplicate_keys() {
		let store = store(vec![
			Message::new("Close", "閉じる"),
			Message::new("Close", "クローズ"),
		]);
		let message = store.lookup("QIMessageBox", "Close", None).unwrap();
		assert_eq!(message.variants[0], "クローズ");
		assert_eq!(store.len(), 1);
	}

	#[test]
	fn test_obsolete_excluded_even_when_alone() {
		let store = store(vec![Message::new(
			"Double-click to add a new assignment",
			"ダブルクリックで新規の割り当てを追加",
		)
		.with_status(Status::Obsolete)]);
		assert!(store
			.lookup("QIMessageBox", "Double-click to add a new assignment", None)
			.is_none());
		assert!(store.is_empty());
	}

	#[test]
	fn test_obsolete_does_not_shadow_active() {
		let store = store(vec![
			Message::new("Apply", "適用"),
			Message::new("Apply", "古い").with_status(Status::Obsolete),
		]);
		assert_eq!(
			store.lookup("QIMessageBox", "Apply", None).unwrap().variants[0],
			"適用"
		);
	}

	#[test]
	fn test_disambiguator_is_part_of_key() {
		let store = store(vec![
			Message::new("invalid", "無効").with_disambiguator("value state"),
			Message::new("invalid", "不正"),
		]);
		assert_eq!(
			store
				.lookup("QIMessageBox", "invalid", Some("value state"))
				.unwrap()
				.variants[0],
			"無効"
		);
		assert_eq!(
			store.lookup("QIMessageBox", "invalid", None).unwrap().variants[0],
			"不正"
		);
		assert_eq!(
			store.lookup("QIMessageBox", "invalid", Some("")).unwrap().variants[0],
			"不正"
		);
		assert!(store.lookup("QIMessageBox", "invalid", Some("summary")).is_none());
	}

	#[test]
	fn test_unfinished_is_indexed() {
		let store = store(vec![Message::new("Reset", "").with_status(Status::Unfinished)]);
		let message = store.lookup("QIMessageBox", "Reset", None).unwrap();
		assert_eq!(message.status, Status::Unfinished);
	}

	fn arb_message() -> impl Strategy<Value = Message> {
		(
			prop::sample::select(vec!["OK", "Cancel", "invalid"]),
			prop::sample::select(vec!["", "value state", "summary"]),
			prop::sample::select(vec![Status::Current, Status::Unfinished, Status::Obsolete]),
			"[a-z]{1,6}",
		)
			.prop_map(|(source, comment, status, text)| {
				Message::new(source, text)
					.with_disambiguator(comment)
					.with_status(status)
			})
	}

	proptest! {
		#[test]
		fn lookup_returns_last_active_message(messages in prop::collection::vec(arb_message(), 0..24)) {
			let store = store(messages.clone());
			for wanted in &messages {
				let expected = messages
					.iter()
					.rev()
					.find(|m| m.status.is_active() && m.source == wanted.source && m.disambiguator == wanted.disambiguator);
				let found = store.lookup("QIMessageBox", &wanted.source, wanted.disambiguator.as_deref());
				prop_assert_eq!(found, expected);
				if let Some(found) = found {
					prop_assert!(found.status != Status::Obsolete);
				}
			}
		}
	}
}
