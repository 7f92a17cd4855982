// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-memory catalog values.
//!
//! A [`Catalog`] is produced once per parse and never mutated afterwards; a
//! reload produces a new value. Contexts and messages live inside their
//! catalog for its whole lifetime.

/// Pseudo-context holding catalog meta-information.
pub const META_CONTEXT: &str = "@@@";
const NATIVE_NAME_SOURCE: &str = "English";
const NATIVE_NAME_COMMENT: &str = "Native language name";

/// Lifecycle state of a message's translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
	/// Usable translation.
	#[default]
	Current,
	/// Present but not yet approved; lookups treat it as untranslated.
	Unfinished,
	/// Kept for history only; never returned by lookups.
	Obsolete,
}

impl Status {
	/// Maps the `type` attribute of a `<translation>` element. Unknown values
	/// are treated as current.
	pub fn from_attr(value: Option<&str>) -> Self {
		match value {
			Some("unfinished") => Status::Unfinished,
			Some("obsolete") | Some("vanished") => Status::Obsolete,
			_ => Status::Current,
		}
	}

	pub fn is_active(&self) -> bool {
		!matches!(self, Status::Obsolete)
	}
}

/// Where a message was extracted from. Advisory only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
	pub file: String,
	pub line: Option<u32>,
}

/// The addressable unit of translation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Message {
	pub source: String,
	/// Distinguishes messages sharing `source` within a context. An empty
	/// comment is stored as `None`.
	pub disambiguator: Option<String>,
	pub locations: Vec<Location>,
	pub status: Status,
	/// One entry for a simple message, one per numerus form otherwise.
	pub variants: Vec<String>,
	/// Declared with `numerus="yes"`.
	pub numerus: bool,
	pub old_source: Option<String>,
	pub extra_comment: Option<String>,
	pub translator_comment: Option<String>,
}

impl Message {
	pub fn new(source: impl Into<String>, translation: impl Into<String>) -> Self {
		Self {
			source: source.into(),
			variants: vec![translation.into()],
			..Default::default()
		}
	}

	pub fn with_disambiguator(mut self, disambiguator: impl Into<String>) -> Self {
		let disambiguator = disambiguator.into();
		self.disambiguator = (!disambiguator.is_empty()).then_some(disambiguator);
		self
	}

	pub fn with_status(mut self, status: Status) -> Self {
		self.status = status;
		self
	}

	pub fn with_variants(mut self, variants: Vec<String>) -> Self {
		self.numerus = true;
		self.variants = variants;
		self
	}

	/// Declared plural, or carrying more than one variant.
	pub fn is_plural(&self) -> bool {
		self.numerus || self.variants.len() > 1
	}

	pub fn disambiguator(&self) -> &str {
		self.disambiguator.as_deref().unwrap_or("")
	}
}

/// A named group of messages, usually one UI component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
	pub name: String,
	pub messages: Vec<Message>,
}

impl Context {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			messages: Vec::new(),
		}
	}

	pub fn with_message(mut self, message: Message) -> Self {
		self.messages.push(message);
		self
	}
}

/// All translations for one target language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
	language: String,
	source_language: Option<String>,
	contexts: Vec<Context>,
}

/// Translation completeness counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogStats {
	pub contexts: usize,
	pub messages: usize,
	pub current: usize,
	pub unfinished: usize,
	pub obsolete: usize,
	pub plural: usize,
}

impl Catalog {
	/// Builds a catalog from already-unique contexts. The parser guarantees
	/// uniqueness for documents; callers constructing catalogs by hand are
	/// responsible for it.
	pub fn new(language: impl Into<String>, contexts: Vec<Context>) -> Self {
		Self {
			language: language.into(),
			source_language: None,
			contexts,
		}
	}

	pub fn with_source_language(mut self, source_language: impl Into<String>) -> Self {
		self.source_language = Some(source_language.into());
		self
	}

	pub fn language(&self) -> &str {
		&self.language
	}

	pub fn source_language(&self) -> Option<&str> {
		self.source_language.as_deref()
	}

	pub fn contexts(&self) -> &[Context] {
		&self.contexts
	}

	pub fn context(&self, name: &str) -> Option<&Context> {
		self.contexts.iter().find(|c| c.name == name)
	}

	/// The language's own name, as recorded in the meta context.
	pub fn native_language_name(&self) -> Option<&str> {
		self.context(META_CONTEXT)?
			.messages
			.iter()
			.rev()
			.find(|m| {
				m.status == Status::Current
					&& m.source == NATIVE_NAME_SOURCE
					&& m.disambiguator() == NATIVE_NAME_COMMENT
			})
			.and_then(|m| m.variants.first())
			.map(String::as_str)
			.filter(|name| !name.is_empty())
	}

	pub fn stats(&self) -> CatalogStats {
		let mut stats = CatalogStats {
			contexts: self.contexts.len(),
			..Default::default()
		};
		for message in self.contexts.iter().flat_map(|c| &c.messages) {
			stats.messages += 1;
			match message.status {
				Status::Current => stats.current += 1,
				Status::Unfinished => stats.unfinished += 1,
				Status::Obsolete => stats.obsolete += 1,
			}
			if message.is_plural() {
				stats.plural += 1;
			}
		}
		stats
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_status_from_attr() {
		assert_eq!(Status::from_attr(None), Status::Current);
		assert_eq!(Status::from_attr(Some("unfinished")), Status::Unfinished);
		assert_eq!(Status::from_attr(Some("obsolete")), Status::Obsolete);
		assert_eq!(Status::from_attr(Some("vanished")), Status::Obsolete);
		assert_eq!(Status::from_attr(Some("finished")), Status::Current);
	}

	#[test]
	fn test_empty_disambiguator_is_none() {
		let message = Message::new("OK", "OK").with_disambiguator("");
		assert_eq!(message.disambiguator, None);
		assert_eq!(message.disambiguator(), "");
	}

	#[test]
	fn test_native_language_name() {
		let catalog = Catalog::new(
			"ja",
			vec![Context::new(META_CONTEXT).with_message(
				Message::new("English", "日本語").with_disambiguator("Native language name"),
			)],
		);
		assert_eq!(catalog.native_language_name(), Some("日本語"));
	}

	#[test]
	fn test_native_language_name_ignores_unfinished() {
		let catalog = Catalog::new(
			"ja",
			vec![Context::new(META_CONTEXT).with_message(
				Message::new("English", "日本語")
					.with_disambiguator("Native language name")
					.with_status(Status::Unfinished),
			)],
		);
		assert_eq!(catalog.native_language_name(), None);
	}

	#[test]
	fn test_stats() {
		let catalog = Catalog::new(
			"ja",
			vec![
				Context::new("QIMessageBox")
					.with_message(Message::new("OK", "OK"))
					.with_message(Message::new("Cancel", "").with_status(Status::Unfinished)),
				Context::new("UIVMListView")
					.with_message(Message::new("Old", "古い").with_status(Status::Obsolete))
					.with_message(
						Message::new("%n item(s)", "")
							.with_variants(vec!["%n item".into(), "%n items".into()]),
					),
			],
		);
		let stats = catalog.stats();
		assert_eq!(stats.contexts, 2);
		assert_eq!(stats.messages, 4);
		assert_eq!(stats.current, 2);
		assert_eq!(stats.unfinished, 1);
		assert_eq!(stats.obsolete, 1);
		assert_eq!(stats.plural, 1);
	}
}
