//! End-to-end tests: actions -> effects -> platform

mod common;

use badgesmith::app::Outcome;
use badgesmith::i18n::Locale;
use badgesmith::platform::{
    MemoryClipboard, MemorySink, Notifier, Platform, ToastKind, UnavailableClipboard,
};
use badgesmith::storage::{FileStore, MemoryStore};
use badgesmith::{
    Action, AppState, BadgeConfig, Dispatcher, LogoRegistry, RasterExporter, Session, Snippet,
};

fn config(root: &str) -> BadgeConfig {
    BadgeConfig {
        provider_root: root.to_string(),
        timeout_ms: 5000,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_download_saves_badge_png() {
    let root = common::start_provider();
    let cfg = config(&root);
    let mut session = Session::open(MemoryStore::new(), LogoRegistry::bundled(), &cfg);

    let sink = MemorySink::new();
    let platform = Platform::new(
        Box::new(MemoryClipboard::new()),
        Box::new(sink.clone()),
        Notifier::new(cfg.toast_duration()),
    );
    let mut dispatcher = Dispatcher::new(platform, RasterExporter::new(&cfg).unwrap());

    let effects = session.handle(Action::DownloadPng);
    let outcomes = dispatcher.run(effects, session.locale()).await;
    assert!(matches!(outcomes.as_slice(), [Outcome::Downloaded(_)]));

    let saved = sink.saved();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].0, "badge.png");
    assert_eq!(&saved[0].1[0..8], b"\x89PNG\r\n\x1a\n");
    let toast = dispatcher.platform().notifier.current().expect("toast");
    assert_eq!(toast.kind, ToastKind::Success);
}

#[tokio::test]
async fn test_failed_download_writes_nothing_and_notifies() {
    let root = common::start_provider();
    let cfg = config(&root);
    let mut session = Session::open(MemoryStore::new(), LogoRegistry::bundled(), &cfg);
    session.handle(Action::SetLabel("missing".into()));

    let sink = MemorySink::new();
    let platform = Platform::new(
        Box::new(MemoryClipboard::new()),
        Box::new(sink.clone()),
        Notifier::default(),
    );
    let mut dispatcher = Dispatcher::new(platform, RasterExporter::new(&cfg).unwrap());

    let outcomes = dispatcher.run(session.handle(Action::DownloadPng), Locale::En).await;
    match outcomes.as_slice() {
        [Outcome::Failed(toast)] => {
            assert_eq!(toast.title, "Fetch failed");
            assert_eq!(toast.kind, ToastKind::Error);
        }
        other => panic!("unexpected outcomes: {:?}", other),
    }
    assert!(sink.saved().is_empty());
    assert_eq!(dispatcher.exporter().blobs().live_count(), 0);
}

#[tokio::test]
async fn test_copy_snippets_and_clipboard_denied() {
    let cfg = BadgeConfig::default();
    let mut session = Session::open(MemoryStore::new(), LogoRegistry::bundled(), &cfg);

    let clipboard = MemoryClipboard::new();
    let platform = Platform::new(
        Box::new(clipboard.clone()),
        Box::new(MemorySink::new()),
        Notifier::default(),
    );
    let mut dispatcher = Dispatcher::new(platform, RasterExporter::new(&cfg).unwrap());
    dispatcher.run(session.handle(Action::Copy(Snippet::Html)), Locale::Es).await;
    assert_eq!(
        clipboard.contents().as_deref(),
        Some("<img src=\"https://img.shields.io/badge/build-passing-4c1.svg\" alt=\"Badge\" />")
    );
    let toast = dispatcher.platform().notifier.current().unwrap();
    assert_eq!(toast.title, "¡Copiado!");

    let platform = Platform::new(
        Box::new(UnavailableClipboard),
        Box::new(MemorySink::new()),
        Notifier::default(),
    );
    let mut denied = Dispatcher::new(platform, RasterExporter::new(&cfg).unwrap());
    let outcomes = denied.run(session.handle(Action::Copy(Snippet::Url)), Locale::En).await;
    assert!(matches!(outcomes.as_slice(), [Outcome::Failed(t)] if t.title == "Copy failed"));

    let outcomes = denied.run(session.handle(Action::Copy(Snippet::Url)), Locale::Es).await;
    assert!(matches!(outcomes.as_slice(), [Outcome::Failed(t)] if t.title == "Error al copiar"));
}

#[test]
fn test_state_survives_reopen_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = BadgeConfig::default();

    let first_id = {
        let mut s = Session::open(FileStore::new(dir.path()), LogoRegistry::bundled(), &cfg);
        s.handle(Action::SetLabel("license".into()));
        s.handle(Action::SetMessage("MIT".into()));
        s.handle(Action::SetColor("#blue".into()));
        s.handle(Action::SelectLogo("watermelon".into()));
        s.handle(Action::SaveToHistory);
        s.state().history.nth(0).unwrap().id
    };

    let reopened = Session::open(FileStore::new(dir.path()), LogoRegistry::bundled(), &cfg);
    let state: &AppState = reopened.state();
    assert_eq!(state.spec.label, "license");
    assert_eq!(state.spec.color, "#blue");
    assert_eq!(state.history.len(), 1);
    let entry = state.history.get(first_id).unwrap();
    assert_eq!(entry.spec(), state.spec);
    assert_eq!(entry.url, reopened.locator().as_str());
}

#[test]
fn test_history_cap_across_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = BadgeConfig::default();

    let mut s = Session::open(FileStore::new(dir.path()), LogoRegistry::empty(), &cfg);
    for i in 0..51 {
        s.handle(Action::SetMessage(format!("run {}", i)));
        s.handle(Action::SaveToHistory);
    }
    drop(s);

    let s = Session::open(FileStore::new(dir.path()), LogoRegistry::empty(), &cfg);
    let history = &s.state().history;
    assert_eq!(history.len(), 50);
    assert_eq!(history.nth(0).unwrap().message, "run 50");
    assert!(history.iter().all(|e| e.message != "run 0"));
}
