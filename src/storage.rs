//! Per-profile key-value persistence of JSON values.
//!
//! Values are stored as JSON text under fixed keys. Reads never fail from
//! the caller's point of view: a missing key, unreadable storage or a value
//! that no longer parses all yield the caller's default. Writes are best
//! effort and only logged when they fail.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Storage keys used by the application state
pub mod keys {
    pub const LABEL: &str = "badge_label";
    pub const MESSAGE: &str = "badge_message";
    pub const COLOR: &str = "badge_color";
    pub const SELECTED_LOGO_ID: &str = "badge_selected_logo_id";
    pub const HISTORY: &str = "badge_history";
    pub const THEME: &str = "theme";
    pub const LOCALE: &str = "locale";
}

/// Raw text storage behind the JSON helpers
pub trait KeyValueStore {
    /// Stored text for `key`, `Ok(None)` when absent.
    fn read(&self, key: &str) -> Result<Option<String>>;

    fn write(&mut self, key: &str, value: &str) -> Result<()>;

    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Load and parse `key`, falling back to `default` on any failure.
pub fn load<T, S>(store: &S, key: &str, default: T) -> T
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    match store.read(key) {
        Ok(Some(text)) => match serde_json::from_str(&text) {
            Ok(v) => v,
            Err(e) => {
                log::warn!("Ignoring malformed value for {}: {}", key, e);
                default
            }
        },
        Ok(None) => default,
        Err(e) => {
            log::warn!("Using default for {}: {}", key, e);
            default
        }
    }
}

/// Serialize and store `value` under `key`. Failures are logged, not raised.
pub fn save<T, S>(store: &mut S, key: &str, value: &T)
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    if let Err(e) = try_save(store, key, value) {
        log::warn!("Failed to persist {}: {}", key, e);
    }
}

/// Like [`save`] but reports the failure.
pub fn try_save<T, S>(store: &mut S, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let text = serde_json::to_string(value)
        .map_err(|e| Error::StorageUnavailable(format!("serialize {}: {}", key, e)))?;
    store.write(key, &text)
}

/// One `<key>.json` file per key inside a profile directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store under the platform data directory (`<data>/badgesmith`).
    pub fn default_profile() -> Result<Self> {
        let base = dirs::data_dir()
            .ok_or_else(|| Error::StorageUnavailable("no data directory for this platform".into()))?;
        Ok(Self::new(base.join("badgesmith")))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", safe))
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::StorageUnavailable(format!("{}: {}", path.display(), e))),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| Error::StorageUnavailable(format!("{}: {}", self.dir.display(), e)))?;
        let path = self.path_for(key);
        std::fs::write(&path, value)
            .map_err(|e| Error::StorageUnavailable(format!("{}: {}", path.display(), e)))
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::StorageUnavailable(e.to_string())),
        }
    }
}

/// In-memory store; can be switched off to emulate disabled storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    disabled: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every operation fails with `StorageUnavailable`.
    pub fn disabled() -> Self {
        Self {
            values: HashMap::new(),
            disabled: true,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn check(&self) -> Result<()> {
        if self.disabled {
            Err(Error::StorageUnavailable("storage is disabled".into()))
        } else {
            Ok(())
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        self.check()?;
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.check()?;
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.check()?;
        self.values.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_and_default() {
        let mut s = MemoryStore::new();
        save(&mut s, "k", &vec![1, 2, 3]);
        assert_eq!(load(&s, "k", Vec::<i32>::new()), vec![1, 2, 3]);
        assert_eq!(load(&s, "unset", 7), 7);
    }

    #[test]
    fn malformed_value_falls_back() {
        let mut s = MemoryStore::new();
        s.write("k", "{not json").unwrap();
        assert_eq!(load(&s, "k", String::from("dflt")), "dflt");
        s.write("n", "\"a string\"").unwrap();
        assert_eq!(load(&s, "n", 3u32), 3);
    }

    #[test]
    fn disabled_store_degrades() {
        let mut s = MemoryStore::disabled();
        assert_eq!(load(&s, "k", 1), 1);
        save(&mut s, "k", &2);
        assert!(matches!(try_save(&mut s, "k", &2), Err(Error::StorageUnavailable(_))));
    }

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = FileStore::new(dir.path().join("profile"));
        assert_eq!(load(&s, keys::LABEL, String::from("build")), "build");
        save(&mut s, keys::LABEL, "coverage");
        assert_eq!(load(&s, keys::LABEL, String::new()), "coverage");
        assert!(dir.path().join("profile/badge_label.json").exists());

        std::fs::write(dir.path().join("profile/badge_color.json"), "oops").unwrap();
        assert_eq!(load(&s, keys::COLOR, String::from("4c1")), "4c1");

        s.remove(keys::LABEL).unwrap();
        s.remove(keys::LABEL).unwrap();
        assert_eq!(s.read(keys::LABEL).unwrap(), None);
    }
}
