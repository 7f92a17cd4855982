// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use linguist_catalog::{Catalog, CatalogError, CatalogSource, CatalogSwitcher, LocaleTag, MemorySource};
use tokio::sync::Notify;

fn catalog(language: &str) -> String {
	format!(
		r#"<TS language="{language}"><context><name>Probe</name>
		<message><source>lang</source><translation>{language}</translation></message>
		<message><source>marker</source><translation>{upper}</translation></message>
		</context></TS>"#,
		upper = language.to_uppercase()
	)
}

fn memory() -> MemorySource {
	MemorySource::new()
		.with_document("de", catalog("de"))
		.with_document("fr", catalog("fr"))
		.with_document("ja", catalog("ja"))
}

/// Blocks loads of one locale until released.
struct GatedSource {
	inner: MemorySource,
	slow: &'static str,
	entered: Arc<Notify>,
	release: Mutex<mpsc::Receiver<()>>,
}

impl CatalogSource for GatedSource {
	fn name(&self) -> &'static str {
		"gated"
	}

	fn load(&self, locale: &LocaleTag) -> Result<Catalog, CatalogError> {
		if locale.language() == self.slow {
			self.entered.notify_one();
			let release = self.release.lock().unwrap();
			release.recv().unwrap();
		}
		self.inner.load(locale)
	}
}

fn gated(slow: &'static str) -> (CatalogSwitcher, Arc<Notify>, mpsc::Sender<()>) {
	let (tx, rx) = mpsc::channel();
	let entered = Arc::new(Notify::new());
	let source = GatedSource {
		inner: memory(),
		slow,
		entered: Arc::clone(&entered),
		release: Mutex::new(rx),
	};
	(CatalogSwitcher::new(Arc::new(source), None), entered, tx)
}

#[test]
fn test_readers_never_see_mixed_catalogs() {
	let switcher = CatalogSwitcher::new(Arc::new(memory()), None);
	switcher.set_locale_blocking("de").unwrap();
	let stop = Arc::new(AtomicBool::new(false));

	let readers: Vec<_> = (0..4)
		.map(|_| {
			let switcher = switcher.clone();
			let stop = Arc::clone(&stop);
			thread::spawn(move || {
				let mut checked = 0u64;
				while !stop.load(Ordering::Relaxed) {
					let snapshot = switcher.snapshot();
					let resolver = snapshot.resolver();
					let lang = resolver.resolve("Probe", "lang", None, &[]);
					let marker = resolver.resolve("Probe", "marker", None, &[]);
					assert_eq!(lang.to_uppercase(), marker);
					checked += 1;
				}
				checked
			})
		})
		.collect();

	for round in 0..200 {
		let locale = ["de", "fr", "ja"][round % 3];
		switcher.set_locale_blocking(locale).unwrap();
	}
	stop.store(true, Ordering::Relaxed);

	for reader in readers {
		reader.join().unwrap();
	}
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_stale_load_is_discarded() {
	let (switcher, entered, release) = gated("de");

	let slow = tokio::spawn(switcher.set_locale("de"));
	entered.notified().await;

	switcher.set_locale("ja").await.unwrap();
	assert_eq!(switcher.current_locale().as_deref(), Some("ja"));

	release.send(()).unwrap();
	let result = slow.await.unwrap();
	assert!(matches!(result, Err(CatalogError::Superseded(ref locale)) if locale == "de"));
	assert_eq!(switcher.current_locale().as_deref(), Some("ja"));
	assert_eq!(switcher.resolve("Probe", "lang", None, &[]), "ja");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_failed_newer_request_still_supersedes() {
	let (switcher, entered, release) = gated("de");
	switcher.set_locale("fr").await.unwrap();

	let slow = tokio::spawn(switcher.set_locale("de"));
	entered.notified().await;

	let newer = switcher.set_locale("pl").await;
	assert!(matches!(newer, Err(CatalogError::LocaleUnavailable(_))));

	release.send(()).unwrap();
	assert!(matches!(slow.await.unwrap(), Err(CatalogError::Superseded(_))));
	assert_eq!(switcher.current_locale().as_deref(), Some("fr"));
	assert_eq!(switcher.resolve("Probe", "lang", None, &[]), "fr");
}

#[tokio::test]
async fn test_lookups_continue_during_load() {
	let (switcher, entered, release) = gated("ja");
	switcher.set_locale("de").await.unwrap();

	let pending = tokio::task::spawn_blocking({
		let switcher = switcher.clone();
		move || switcher.set_locale_blocking("ja")
	});
	entered.notified().await;

	assert_eq!(switcher.resolve("Probe", "lang", None, &[]), "de");

	release.send(()).unwrap();
	pending.await.unwrap().unwrap();
	assert_eq!(switcher.resolve("Probe", "lang", None, &[]), "ja");
}
