//! Application state and action handling.
//!
//! [`Session`] owns the persisted state. It is loaded once from a
//! [`KeyValueStore`], and each field is written back when it changes.
//! Handlers never touch the platform: they return [`Effect`]s, which
//! [`Dispatcher`] executes against a [`Platform`]. Every failure ends as a
//! toast at that boundary.

use crate::badge::{BadgeSpec, Locator, LocatorBuilder, Snippet};
use crate::history::{History, HistoryEntry};
use crate::i18n::{Locale, Text};
use crate::logos::LogoRegistry;
use crate::platform::{Platform, Toast};
use crate::rendering::{RasterExporter, DOWNLOAD_FILENAME};
use crate::storage::{self, keys, KeyValueStore};
use crate::{BadgeConfig, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_LABEL: &str = "build";
pub const DEFAULT_MESSAGE: &str = "passing";
pub const DEFAULT_COLOR: &str = "4c1";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Everything that survives between runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub spec: BadgeSpec,
    pub theme: Theme,
    pub locale: Locale,
    pub history: History,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            spec: BadgeSpec::new(DEFAULT_LABEL, DEFAULT_MESSAGE, DEFAULT_COLOR),
            theme: Theme::default(),
            locale: Locale::default(),
            history: History::default(),
        }
    }
}

impl AppState {
    /// Load each field independently, using the default for anything
    /// missing or unreadable.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        let d = Self::default();
        Self {
            spec: BadgeSpec {
                label: storage::load(store, keys::LABEL, d.spec.label),
                message: storage::load(store, keys::MESSAGE, d.spec.message),
                color: storage::load(store, keys::COLOR, d.spec.color),
                logo_id: storage::load(store, keys::SELECTED_LOGO_ID, d.spec.logo_id),
            },
            theme: storage::load(store, keys::THEME, d.theme),
            locale: storage::load(store, keys::LOCALE, d.locale),
            history: storage::load(store, keys::HISTORY, d.history),
        }
    }
}

/// User intents
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SetLabel(String),
    SetMessage(String),
    SetColor(String),
    /// Empty id clears the logo
    SelectLogo(String),
    SetTheme(Theme),
    ToggleTheme,
    SetLocale(Locale),
    Copy(Snippet),
    /// Copy the stored URL of a history entry
    CopyEntry(i64),
    SaveToHistory,
    LoadEntry(i64),
    ClearHistory,
    DownloadPng,
}

/// Side effects requested by a handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    CopyText(String),
    ExportPng(Locator),
    Notify(Toast),
}

/// The single owner of application state
pub struct Session<S: KeyValueStore> {
    state: AppState,
    store: S,
    logos: LogoRegistry,
    builder: LocatorBuilder,
}

impl<S: KeyValueStore> Session<S> {
    pub fn open(store: S, logos: LogoRegistry, config: &BadgeConfig) -> Self {
        let mut state = AppState::load(&store);
        state.history.set_limit(config.history_limit);
        Self {
            state,
            store,
            logos,
            builder: LocatorBuilder::new(config.provider_root.clone()),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn logos(&self) -> &LogoRegistry {
        &self.logos
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn locale(&self) -> Locale {
        self.state.locale
    }

    /// The locator for the current form state.
    pub fn locator(&self) -> Locator {
        self.builder.build(&self.state.spec, &self.logos)
    }

    pub fn handle(&mut self, action: Action) -> Vec<Effect> {
        log::debug!("action: {:?}", action);
        let locale = self.state.locale;
        let t = move |text: Text| locale.t(text).to_string();
        match action {
            Action::SetLabel(v) => {
                self.state.spec.label = v;
                storage::save(&mut self.store, keys::LABEL, &self.state.spec.label);
                vec![]
            }
            Action::SetMessage(v) => {
                self.state.spec.message = v;
                storage::save(&mut self.store, keys::MESSAGE, &self.state.spec.message);
                vec![]
            }
            Action::SetColor(v) => {
                self.state.spec.color = v;
                storage::save(&mut self.store, keys::COLOR, &self.state.spec.color);
                vec![]
            }
            Action::SelectLogo(id) => {
                self.state.spec.logo_id = id;
                storage::save(&mut self.store, keys::SELECTED_LOGO_ID, &self.state.spec.logo_id);
                vec![]
            }
            Action::SetTheme(theme) => {
                self.state.theme = theme;
                storage::save(&mut self.store, keys::THEME, &self.state.theme);
                vec![]
            }
            Action::ToggleTheme => self.handle(Action::SetTheme(self.state.theme.toggled())),
            Action::SetLocale(locale) => {
                self.state.locale = locale;
                storage::save(&mut self.store, keys::LOCALE, &self.state.locale);
                vec![]
            }
            Action::Copy(kind) => vec![Effect::CopyText(self.locator().snippet(kind))],
            Action::CopyEntry(id) => match self.state.history.get(id) {
                Some(e) => vec![Effect::CopyText(e.url.clone())],
                None => vec![Effect::Notify(Toast::error(t(Text::History), t(Text::EntryNotFound)))],
            },
            Action::SaveToHistory => {
                let locator = self.locator();
                let now = chrono::Utc::now().timestamp_millis();
                let entry = self.state.history.push(&self.state.spec, &locator, now).clone();
                storage::save(&mut self.store, keys::HISTORY, &self.state.history);
                log::info!("saved history entry {} ({})", entry.id, entry.url);
                vec![Effect::Notify(Toast::success(t(Text::History), t(Text::SavedToHistory)))]
            }
            Action::LoadEntry(id) => match self.state.history.get(id).map(HistoryEntry::spec) {
                Some(spec) => {
                    self.state.spec = spec;
                    self.persist_spec();
                    vec![Effect::Notify(Toast::success(t(Text::History), t(Text::EntryLoaded)))]
                }
                None => vec![Effect::Notify(Toast::error(t(Text::History), t(Text::EntryNotFound)))],
            },
            Action::ClearHistory => {
                self.state.history.clear();
                storage::save(&mut self.store, keys::HISTORY, &self.state.history);
                vec![Effect::Notify(Toast::success(t(Text::History), t(Text::HistoryCleared)))]
            }
            Action::DownloadPng => vec![Effect::ExportPng(self.locator())],
        }
    }

    fn persist_spec(&mut self) {
        let spec = &self.state.spec;
        storage::save(&mut self.store, keys::LABEL, &spec.label);
        storage::save(&mut self.store, keys::MESSAGE, &spec.message);
        storage::save(&mut self.store, keys::COLOR, &spec.color);
        storage::save(&mut self.store, keys::SELECTED_LOGO_ID, &spec.logo_id);
    }
}

/// What a dispatched effect produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Copied(String),
    Downloaded(PathBuf),
    Notified,
    /// The effect failed; the error was shown as this toast
    Failed(Toast),
}

/// Runs effects against the platform and turns failures into toasts
pub struct Dispatcher {
    platform: Platform,
    exporter: RasterExporter,
}

impl Dispatcher {
    pub fn new(platform: Platform, exporter: RasterExporter) -> Self {
        Self { platform, exporter }
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    pub fn exporter(&self) -> &RasterExporter {
        &self.exporter
    }

    pub async fn run(&mut self, effects: Vec<Effect>, locale: Locale) -> Vec<Outcome> {
        let mut outcomes = Vec::with_capacity(effects.len());
        for effect in effects {
            outcomes.push(self.run_one(effect, locale).await);
        }
        outcomes
    }

    async fn run_one(&mut self, effect: Effect, locale: Locale) -> Outcome {
        match effect {
            Effect::Notify(toast) => {
                self.platform.notifier.show(toast);
                Outcome::Notified
            }
            Effect::CopyText(text) => match self.platform.clipboard.write_text(&text) {
                Ok(()) => {
                    self.platform
                        .notifier
                        .show(Toast::success(locale.t(Text::Copied), text.clone()));
                    Outcome::Copied(text)
                }
                Err(e) => self.fail(&e, locale),
            },
            Effect::ExportPng(locator) => match self.download(&locator).await {
                Ok(path) => {
                    self.platform
                        .notifier
                        .show(Toast::success(locale.t(Text::Downloaded), path.display().to_string()));
                    Outcome::Downloaded(path)
                }
                Err(e) => self.fail(&e, locale),
            },
        }
    }

    async fn download(&mut self, locator: &Locator) -> Result<PathBuf> {
        let blob = self.exporter.export(locator).await?;
        self.platform.downloads.save(DOWNLOAD_FILENAME, &blob.png_data)
    }

    fn fail(&mut self, err: &crate::Error, locale: Locale) -> Outcome {
        let toast = Toast::from_error(err, locale);
        self.platform.notifier.show(toast.clone());
        Outcome::Failed(toast)
    }
}
