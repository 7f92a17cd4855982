// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Catalog document parser.
//!
//! Reads Qt Linguist `.ts` documents:
//!
//! ```text
//! <TS version="2.1" language="ja_JP">
//!   <context>
//!     <name>QIMessageBox</name>
//!     <message>
//!       <location filename="../src/QIMessageBox.cpp" line="201"/>
//!       <source>&amp;Details (%1 of %2)</source>
//!       <translation>詳細(%2の%1)(&amp;D)</translation>
//!     </message>
//!   </context>
//! </TS>
//! ```
//!
//! Parsing is all-or-nothing: any structural error fails the whole document.
//! Elements the engine has no use for are skipped whole. Repeated
//! `<context>` blocks with the same name are folded into the first one, with
//! their messages appended in document order.

use std::collections::HashMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

use crate::error::CatalogError;
use crate::model::{Catalog, Context, Location, Message, Status};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parses a catalog document held in memory.
pub fn parse_catalog(document: &str) -> Result<Catalog, CatalogError> {
	Parser::new(document).parse_document()
}

/// Parses raw catalog bytes, which must be UTF-8 (a leading BOM is allowed).
pub fn parse_catalog_bytes(bytes: &[u8]) -> Result<Catalog, CatalogError> {
	let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
	let document = std::str::from_utf8(bytes).map_err(|e| {
		CatalogError::malformed(e.valid_up_to() as u64, "document is not valid UTF-8")
	})?;
	parse_catalog(document)
}

struct Parser<'a> {
	reader: Reader<&'a [u8]>,
}

impl<'a> Parser<'a> {
	fn new(document: &'a str) -> Self {
		Self {
			reader: Reader::from_str(document),
		}
	}

	fn offset(&self) -> u64 {
		self.reader.buffer_position() as u64
	}

	fn malformed(&self, reason: impl Into<String>) -> CatalogError {
		CatalogError::malformed(self.offset(), reason)
	}

	fn next(&mut self) -> Result<Event<'a>, CatalogError> {
		self.reader
			.read_event()
			.map_err(|e| CatalogError::malformed(self.offset(), e.to_string()))
	}

	fn parse_document(mut self) -> Result<Catalog, CatalogError> {
		loop {
			match self.next()? {
				Event::Start(e) if e.name().as_ref() == b"TS" => {
					let catalog = self.parse_ts(&e, true)?;
					self.expect_end_of_document()?;
					return Ok(catalog);
				}
				Event::Empty(e) if e.name().as_ref() == b"TS" => {
					let catalog = self.parse_ts(&e, false)?;
					self.expect_end_of_document()?;
					return Ok(catalog);
				}
				Event::Start(e) | Event::Empty(e) => {
					return Err(self.malformed(format!(
						"expected <TS> root element, found <{}>",
						element_name(&e)
					)));
				}
				Event::Text(t) if t.iter().all(u8::is_ascii_whitespace) => {}
				Event::Text(_) | Event::CData(_) => {
					return Err(self.malformed("text outside of the <TS> root element"));
				}
				Event::End(_) => return Err(self.malformed("unbalanced closing tag")),
				Event::Eof => return Err(self.malformed("document has no <TS> root element")),
				_ => {}
			}
		}
	}

	fn expect_end_of_document(&mut self) -> Result<(), CatalogError> {
		loop {
			match self.next()? {
				Event::Eof => return Ok(()),
				Event::Start(_) | Event::Empty(_) | Event::End(_) | Event::CData(_) => {
					return Err(self.malformed("content after the </TS> root element"));
				}
				Event::Text(t) if !t.iter().all(u8::is_ascii_whitespace) => {
					return Err(self.malformed("content after the </TS> root element"));
				}
				_ => {}
			}
		}
	}

	fn parse_ts(&mut self, root: &BytesStart<'_>, has_children: bool) -> Result<Catalog, CatalogError> {
		let language = self
			.attribute(root, "language")?
			.filter(|l| !l.trim().is_empty());
		let source_language = self
			.attribute(root, "sourcelanguage")?
			.filter(|l| !l.trim().is_empty());

		let mut contexts: Vec<Context> = Vec::new();
		let mut positions: HashMap<String, usize> = HashMap::new();
		let mut index = 0;

		while has_children {
			match self.next()? {
				Event::Start(e) if e.name().as_ref() == b"context" => {
					let context = self.parse_context(index)?;
					index += 1;
					match positions.get(&context.name) {
						Some(&pos) => {
							debug!(context = %context.name, "folding repeated context block");
							contexts[pos].messages.extend(context.messages);
						}
						None => {
							positions.insert(context.name.clone(), contexts.len());
							contexts.push(context);
						}
					}
				}
				Event::Empty(e) if e.name().as_ref() == b"context" => {
					return Err(CatalogError::EmptyContextName { index });
				}
				Event::Start(_) => self.skip_element()?,
				Event::End(_) => break,
				Event::Eof => return Err(self.malformed("unexpected end of document inside <TS>")),
				_ => {}
			}
		}

		// Structural errors above take precedence over a missing language.
		let language = language.ok_or(CatalogError::MissingLanguage)?;
		let mut catalog = Catalog::new(language.trim(), contexts);
		if let Some(source_language) = source_language {
			catalog = catalog.with_source_language(source_language.trim());
		}
		Ok(catalog)
	}

	fn parse_context(&mut self, index: usize) -> Result<Context, CatalogError> {
		let mut name: Option<String> = None;
		let mut messages = Vec::new();

		loop {
			match self.next()? {
				Event::Start(e) => match e.name().as_ref() {
					b"name" => name = Some(self.read_content(b"name", None)?),
					b"message" => {
						let context = name.as_deref().unwrap_or_default();
						messages.push(self.parse_message(&e, context, messages.len())?);
					}
					_ => self.skip_element()?,
				},
				Event::Empty(e) => match e.name().as_ref() {
					b"name" => name = Some(String::new()),
					b"message" => {
						return Err(CatalogError::MissingSource {
							context: name.unwrap_or_default(),
							index: messages.len(),
						});
					}
					_ => {}
				},
				Event::End(_) => break,
				Event::Eof => {
					return Err(self.malformed("unexpected end of document inside <context>"));
				}
				_ => {}
			}
		}

		match name {
			Some(name) if !name.is_empty() => Ok(Context { name, messages }),
			_ => Err(CatalogError::EmptyContextName { index }),
		}
	}

	fn parse_message(
		&mut self,
		start: &BytesStart<'_>,
		context: &str,
		index: usize,
	) -> Result<Message, CatalogError> {
		let numerus = self.attribute(start, "numerus")?.as_deref() == Some("yes");
		let mut message = Message {
			numerus,
			..Default::default()
		};
		let mut source: Option<String> = None;
		let mut translation: Option<(Status, Vec<String>)> = None;

		loop {
			match self.next()? {
				Event::Start(e) => match e.name().as_ref() {
					b"location" => {
						message.locations.push(self.location(&e)?);
						self.skip_element()?;
					}
					b"source" => source = Some(self.read_content(b"source", None)?),
					b"oldsource" => message.old_source = Some(self.read_content(b"oldsource", None)?),
					b"comment" => {
						let comment = self.read_content(b"comment", None)?;
						message.disambiguator = (!comment.is_empty()).then_some(comment);
					}
					b"extracomment" => {
						message.extra_comment = Some(self.read_content(b"extracomment", None)?);
					}
					b"translatorcomment" => {
						message.translator_comment =
							Some(self.read_content(b"translatorcomment", None)?);
					}
					b"translation" => {
						let status = Status::from_attr(self.attribute(&e, "type")?.as_deref());
						let mut forms = Vec::new();
						let text = self.read_content(b"translation", Some(&mut forms))?;
						let variants = if forms.is_empty() { vec![text] } else { forms };
						translation = Some((status, variants));
					}
					_ => self.skip_element()?,
				},
				Event::Empty(e) => match e.name().as_ref() {
					b"location" => message.locations.push(self.location(&e)?),
					b"source" => source = Some(String::new()),
					b"oldsource" => message.old_source = Some(String::new()),
					b"extracomment" => message.extra_comment = Some(String::new()),
					b"translatorcomment" => message.translator_comment = Some(String::new()),
					b"translation" => {
						let status = Status::from_attr(self.attribute(&e, "type")?.as_deref());
						translation = Some((status, vec![String::new()]));
					}
					_ => {}
				},
				Event::End(_) => break,
				Event::Eof => {
					return Err(self.malformed("unexpected end of document inside <message>"));
				}
				_ => {}
			}
		}

		message.source = source.ok_or_else(|| CatalogError::MissingSource {
			context: context.to_string(),
			index,
		})?;
		let (status, variants) = translation.unwrap_or((Status::Unfinished, vec![String::new()]));
		message.status = status;
		message.variants = variants;
		Ok(message)
	}

	/// Collects the text of the element just opened, up to its closing tag.
	/// `<byte>` escapes are decoded and when `forms` is given each
	/// `<numerusform>` is pushed onto it. An element holding `<lengthvariant>`
	/// children yields the first variant only; its own text is layout.
	fn read_content(
		&mut self,
		tag: &[u8],
		mut forms: Option<&mut Vec<String>>,
	) -> Result<String, CatalogError> {
		let mut text = String::new();
		let mut first_variant: Option<String> = None;
		let mut seen_length_variant = false;

		loop {
			match self.next()? {
				Event::Text(t) => {
					let unescaped = t.unescape().map_err(|e| self.malformed(e.to_string()))?;
					text.push_str(&unescaped);
				}
				Event::CData(c) => {
					let raw = std::str::from_utf8(&c).map_err(|e| self.malformed(e.to_string()))?;
					text.push_str(raw);
				}
				Event::Empty(e) if e.name().as_ref() == b"byte" => {
					text.push(self.byte_value(&e)?);
				}
				Event::Start(e) if e.name().as_ref() == b"lengthvariant" => {
					if seen_length_variant {
						self.skip_element()?;
					} else {
						first_variant = Some(self.read_content(b"lengthvariant", None)?);
					}
					seen_length_variant = true;
				}
				Event::Empty(e) if e.name().as_ref() == b"lengthvariant" => {
					if !seen_length_variant {
						first_variant = Some(String::new());
					}
					seen_length_variant = true;
				}
				Event::Start(e) if e.name().as_ref() == b"numerusform" && forms.is_some() => {
					let form = self.read_content(b"numerusform", None)?;
					if let Some(forms) = forms.as_deref_mut() {
						forms.push(form);
					}
				}
				Event::Empty(e) if e.name().as_ref() == b"numerusform" && forms.is_some() => {
					if let Some(forms) = forms.as_deref_mut() {
						forms.push(String::new());
					}
				}
				Event::Start(e) | Event::Empty(e) => {
					return Err(self.malformed(format!(
						"unexpected <{}> inside <{}>",
						element_name(&e),
						String::from_utf8_lossy(tag)
					)));
				}
				Event::End(_) => return Ok(first_variant.unwrap_or(text)),
				Event::Eof => {
					return Err(self.malformed(format!(
						"unexpected end of document inside <{}>",
						String::from_utf8_lossy(tag)
					)));
				}
				_ => {}
			}
		}
	}

	/// Skips everything up to the end of the element just opened.
	fn skip_element(&mut self) -> Result<(), CatalogError> {
		let mut depth = 1usize;
		loop {
			match self.next()? {
				Event::Start(_) => depth += 1,
				Event::End(_) => {
					depth -= 1;
					if depth == 0 {
						return Ok(());
					}
				}
				Event::Eof => return Err(self.malformed("unexpected end of document")),
				_ => {}
			}
		}
	}

	fn attribute(&self, element: &BytesStart<'_>, name: &str) -> Result<Option<String>, CatalogError> {
		let attribute = element
			.try_get_attribute(name)
			.map_err(|e| self.malformed(e.to_string()))?;
		match attribute {
			Some(attribute) => {
				let value = attribute
					.unescape_value()
					.map_err(|e| self.malformed(e.to_string()))?;
				Ok(Some(value.into_owned()))
			}
			None => Ok(None),
		}
	}

	fn location(&self, element: &BytesStart<'_>) -> Result<Location, CatalogError> {
		Ok(Location {
			file: self.attribute(element, "filename")?.unwrap_or_default(),
			line: self
				.attribute(element, "line")?
				.and_then(|line| line.trim().parse().ok()),
		})
	}

	/// Decodes `<byte value="x9"/>` (hex) or `<byte value="9"/>` (decimal).
	fn byte_value(&self, element: &BytesStart<'_>) -> Result<char, CatalogError> {
		let value = self
			.attribute(element, "value")?
			.ok_or_else(|| self.malformed("<byte> without a value"))?;
		let code = match value.strip_prefix(['x', 'X']) {
			Some(hex) => u32::from_str_radix(hex, 16),
			None => value.parse::<u32>(),
		};
		code.ok()
			.and_then(char::from_u32)
			.ok_or_else(|| self.malformed(format!("invalid <byte> value '{value}'")))
	}
}

fn element_name(element: &BytesStart<'_>) -> String {
	String::from_utf8_lossy(element.name().as_ref()).into_owned()
}
