//! Key-value preference storage: one JSON file per key in the data directory.
//!
//! Reads tolerate a missing key (treated as "no value") and writes are atomic.
//! Callers that must never fail use [`PreferenceStore::load_or_default`] and
//! [`PreferenceStore::save_or_log`], which log and fall back instead of
//! returning errors.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;

/// Well-known storage keys
pub mod keys {
    /// `{"theme": bool, "sounds": bool, "haptics": bool}`
    pub const SETTINGS: &str = "settings";
    /// Array of chat messages
    pub const CHAT_MESSAGES: &str = "chat_messages";
    /// `"male"` or `"female"`
    pub const COMPANION_GENDER: &str = "companion_gender";
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid storage key {0:?}")]
    InvalidKey(String),
    #[error("could not access {path}: {source}")]
    Io {
        path: PathBuf,
        source: io::Error,
    },
    #[error("malformed data under key {key:?}: {source}")]
    Json {
        key: String,
        source: serde_json::Error,
    },
}

/// Handle to the on-disk preference store. Cheap to clone.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    dir: PathBuf,
}

impl PreferenceStore {
    /// The directory is created lazily on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        PreferenceStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }

    /// Read and decode a key. `Ok(None)` when nothing is stored.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let path = self.path_for(key)?;
        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Io { path, source: e }),
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| StoreError::Json {
                key: key.to_string(),
                source: e,
            })
    }

    /// Encode and atomically replace a key.
    pub fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        let content = serde_json::to_string_pretty(value).map_err(|e| StoreError::Json {
            key: key.to_string(),
            source: e,
        })?;
        fs::create_dir_all(&self.dir).map_err(|e| StoreError::Io {
            path: self.dir.clone(),
            source: e,
        })?;
        atomic_write(&path, content.as_bytes()).map_err(|e| StoreError::Io { path, source: e })
    }

    /// Delete a key. Removing a missing key is not an error.
    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io { path, source: e }),
        }
    }

    /// Read a key, falling back to `T::default()` when it is missing,
    /// unreadable or malformed. Failures are logged.
    pub fn load_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.read(key) {
            Ok(Some(v)) => v,
            Ok(None) => T::default(),
            Err(e) => {
                log::warn!("using defaults for {:?}: {}", key, e);
                T::default()
            }
        }
    }

    /// Write a key, logging instead of failing. Returns whether it was saved.
    pub fn save_or_log<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        match self.write(key, value) {
            Ok(()) => true,
            Err(e) => {
                log::error!("could not save {:?}: {}", key, e);
                false
            }
        }
    }
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChatMessage, Persona, Settings};
    use tempfile::TempDir;

    #[test]
    fn write_and_read_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = PreferenceStore::new(dir.path());
        let settings = Settings {
            dark_theme: false,
            sounds: true,
            haptics: false,
        };
        store.write(keys::SETTINGS, &settings).unwrap();
        let loaded: Option<Settings> = store.read(keys::SETTINGS).unwrap();
        assert_eq!(loaded, Some(settings));
    }

    #[test]
    fn missing_key_reads_as_none() {
        let dir = TempDir::new().unwrap();
        let store = PreferenceStore::new(dir.path());
        let loaded: Option<Settings> = store.read(keys::SETTINGS).unwrap();
        assert!(loaded.is_none());
        assert_eq!(store.load_or_default::<Settings>(keys::SETTINGS), Settings::default());
    }

    #[test]
    fn malformed_json_is_an_error_but_loads_defaults() {
        let dir = TempDir::new().unwrap();
        let store = PreferenceStore::new(dir.path());
        fs::write(dir.path().join("settings.json"), "not json {{{").unwrap();
        assert!(matches!(
            store.read::<Settings>(keys::SETTINGS),
            Err(StoreError::Json { .. })
        ));
        assert_eq!(store.load_or_default::<Settings>(keys::SETTINGS), Settings::default());
    }

    #[test]
    fn write_creates_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("deep").join("er");
        let store = PreferenceStore::new(&nested);
        assert!(store.save_or_log(keys::COMPANION_GENDER, &Persona::Male));
        assert_eq!(
            fs::read_to_string(nested.join("companion_gender.json")).unwrap(),
            "\"male\""
        );
    }

    #[test]
    fn write_failure_is_logged_not_fatal() {
        let dir = TempDir::new().unwrap();
        // A file where the directory should be makes every write fail.
        let blocker = dir.path().join("blocked");
        fs::write(&blocker, "").unwrap();
        let store = PreferenceStore::new(&blocker);
        assert!(!store.save_or_log(keys::SETTINGS, &Settings::default()));
    }

    #[test]
    fn chat_array_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = PreferenceStore::new(dir.path());
        let messages = vec![ChatMessage::user("hi"), ChatMessage::bot("hello!")];
        store.write(keys::CHAT_MESSAGES, &messages).unwrap();
        let loaded: Vec<ChatMessage> = store.load_or_default(keys::CHAT_MESSAGES);
        assert_eq!(loaded, messages);
    }

    #[test]
    fn remove_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = PreferenceStore::new(dir.path());
        store.write(keys::SETTINGS, &Settings::default()).unwrap();
        store.remove(keys::SETTINGS).unwrap();
        store.remove(keys::SETTINGS).unwrap();
        assert!(store.read::<Settings>(keys::SETTINGS).unwrap().is_none());
    }

    #[test]
    fn rejects_path_like_keys() {
        let store = PreferenceStore::new("/tmp");
        assert!(matches!(store.path_for("../etc"), Err(StoreError::InvalidKey(_))));
        assert!(matches!(store.path_for(""), Err(StoreError::InvalidKey(_))));
    }
}
