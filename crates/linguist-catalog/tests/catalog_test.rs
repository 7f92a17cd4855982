// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::PathBuf;
use std::sync::Arc;

use linguist_catalog::{
	parse_catalog, CatalogError, CatalogSource, CatalogStore, CatalogSwitcher, DirectorySource, LocaleTag,
	MemorySource, Origin, Request, Status,
};
use linguist_config::I18nConfig;

fn fixtures() -> PathBuf {
	PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn source() -> Arc<DirectorySource> {
	Arc::new(DirectorySource::new(fixtures(), "VirtualBox"))
}

fn japanese() -> CatalogSwitcher {
	let switcher = CatalogSwitcher::new(source(), Some("en"));
	switcher.set_locale_blocking("ja_JP").unwrap();
	switcher
}

#[test]
fn test_simple_message() {
	let switcher = japanese();
	assert_eq!(switcher.resolve("QIMessageBox", "OK", None, &[]), "OK");
	let resolved = switcher.resolve_detailed(&Request::new("QIMessageBox", "OK"));
	assert_eq!(resolved.origin, Origin::Translated);
}

#[test]
fn test_reordered_arguments() {
	let switcher = japanese();
	assert_eq!(
		switcher.resolve("QIMessageBox", "&Details (%1 of %2)", None, &["3", "5"]),
		"詳細(5の3)(&D)"
	);
}

#[test]
fn test_disambiguated_messages_are_distinct() {
	let switcher = japanese();
	assert_eq!(
		switcher.resolve("UIGlobalSettingsUpdate", "invalid", Some("value state"), &[]),
		"無効"
	);
	assert_eq!(switcher.resolve("UIGlobalSettingsUpdate", "invalid", None, &[]), "不正");
}

#[test]
fn test_obsolete_message_is_never_returned() {
	let switcher = japanese();
	let resolved = switcher.resolve_detailed(&Request::new(
		"QIMessageBox",
		"Double-click to add a new assignment",
	));
	assert_eq!(resolved.text, "Double-click to add a new assignment");
	assert_eq!(resolved.origin, Origin::Source);
}

#[test]
fn test_single_form_plural() {
	let switcher = japanese();
	assert_eq!(
		switcher.resolve_n("UIGlobalSettingsUpdate", "%n year(s)", None, 5, &[]),
		"5 年"
	);
	assert_eq!(
		switcher.resolve_n("UIGlobalSettingsUpdate", "%n year(s)", None, 1, &[]),
		"1 年"
	);
}

#[test]
fn test_unfinished_uses_fallback_catalog() {
	let switcher = japanese();
	let resolved = switcher.resolve_detailed(&Request::new("QIMessageBox", "Ignore"));
	assert_eq!(resolved.text, "Ignore");
	assert_eq!(resolved.origin, Origin::Fallback);
}

#[test]
fn test_duplicate_keys_last_wins() {
	let switcher = japanese();
	assert_eq!(
		switcher.resolve("UIGlobalSettingsUpdate", "Every %1 day(s)", None, &["3"]),
		"3日ごと"
	);
}

#[test]
fn test_russian_plurals() {
	let switcher = CatalogSwitcher::new(source(), Some("en"));
	switcher.set_locale_blocking("ru").unwrap();

	let years = |n| switcher.resolve_n("UIGlobalSettingsUpdate", "%n year(s)", None, n, &[]);
	assert_eq!(years(1), "1 год");
	assert_eq!(years(3), "3 года");
	assert_eq!(years(5), "5 лет");
	assert_eq!(years(21), "21 год");
	assert_eq!(years(112), "112 лет");
}

#[test]
fn test_catalog_metadata() {
	let catalog = source().load(&LocaleTag::parse("ja").unwrap()).unwrap();
	assert_eq!(catalog.language(), "ja_JP");
	assert_eq!(catalog.source_language(), Some("en"));
	assert_eq!(catalog.native_language_name(), Some("日本語"));

	let stats = catalog.stats();
	assert_eq!(stats.contexts, 3);
	assert_eq!(stats.messages, 10);
	assert_eq!(stats.current, 8);
	assert_eq!(stats.unfinished, 1);
	assert_eq!(stats.obsolete, 1);
	assert_eq!(stats.plural, 1);

	let store = CatalogStore::new(catalog);
	assert_eq!(store.len(), 8);
	let ignore = store.lookup("QIMessageBox", "Ignore", None).unwrap();
	assert_eq!(ignore.status, Status::Unfinished);
	assert!(store
		.lookup("QIMessageBox", "Double-click to add a new assignment", None)
		.is_none());
}

#[test]
fn test_missing_locale_keeps_current_catalog() {
	let switcher = japanese();
	assert!(matches!(
		switcher.set_locale_blocking("de"),
		Err(CatalogError::LocaleUnavailable(ref locale)) if locale == "de"
	));
	assert_eq!(switcher.current_locale().as_deref(), Some("ja_JP"));
	assert_eq!(switcher.resolve("UIGlobalSettingsUpdate", "invalid", None, &[]), "不正");
}

#[test]
fn test_from_config() {
	let config = I18nConfig {
		catalog_dir: fixtures(),
		file_prefix: "VirtualBox".to_string(),
		locale: "ja_JP".to_string(),
		fallback_locale: "en".to_string(),
	};
	let switcher = CatalogSwitcher::from_config(&config);
	assert_eq!(switcher.current_locale().as_deref(), Some("ja_JP"));
	assert_eq!(switcher.resolve("QIMessageBox", "Ignore", None, &[]), "Ignore");
	assert_eq!(
		switcher.resolve_n("UIGlobalSettingsUpdate", "%n year(s)", None, 2, &[]),
		"2 年"
	);
}

#[test]
fn test_from_config_with_unavailable_locale_starts_on_fallback() {
	let config = I18nConfig {
		catalog_dir: fixtures(),
		file_prefix: "VirtualBox".to_string(),
		locale: "fr".to_string(),
		fallback_locale: "en".to_string(),
	};
	let switcher = CatalogSwitcher::from_config(&config);
	assert_eq!(switcher.current_locale(), None);
	assert_eq!(
		switcher.resolve_n("UIGlobalSettingsUpdate", "%n year(s)", None, 2, &[]),
		"2 years"
	);
}

#[test]
fn test_parse_error_carries_offset() {
	let err = parse_catalog("<TS language=\"ja\"><context><name>C</name></TS>").unwrap_err();
	assert!(matches!(err, CatalogError::Malformed { offset, .. } if offset > 0));
}

#[test]
fn test_indented_length_variants_resolve_to_first_variant() {
	let document = r#"<?xml version="1.0" encoding="utf-8"?>
<TS version="2.1" language="en">
<context>
    <name>C</name>
    <message>
        <source>Settings</source>
        <translation variants="yes">
            <lengthvariant>Preferences</lengthvariant>
            <lengthvariant>Prefs</lengthvariant>
        </translation>
    </message>
    <message numerus="yes">
        <source>%n file(s)</source>
        <translation>
            <numerusform variants="yes">
                <lengthvariant>%n file</lengthvariant>
                <lengthvariant>%n f.</lengthvariant>
            </numerusform>
            <numerusform>%n files</numerusform>
        </translation>
    </message>
</context>
</TS>
"#;
	let source = MemorySource::new().with_document("en", document);
	let switcher = CatalogSwitcher::new(Arc::new(source), None);
	switcher.set_locale_blocking("en").unwrap();

	assert_eq!(switcher.resolve("C", "Settings", None, &[]), "Preferences");
	assert_eq!(switcher.resolve_n("C", "%n file(s)", None, 1, &[]), "1 file");
	assert_eq!(switcher.resolve_n("C", "%n file(s)", None, 4, &[]), "4 files");
}
