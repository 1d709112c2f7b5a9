//! Persisted key/value state, in the spirit of browser local storage.
//!
//! Two keys are used by the client: [`AUTH_TOKEN_KEY`] for the bearer token
//! and [`THEME_KEY`] for the `light`/`dark` preference.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::error::Result;

/// Key holding the bearer token.
pub const AUTH_TOKEN_KEY: &str = "auth_token";

/// Key holding the theme preference.
pub const THEME_KEY: &str = "theme";

/// Local-storage-style string store.
pub trait StateStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Volatile store, used by tests and one-shot invocations.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(lock(&self.entries).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        lock(&self.entries).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        lock(&self.entries).remove(key);
        Ok(())
    }
}

/// YAML file store. Every mutation rewrites the whole file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open (or lazily create) the store at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_yaml::from_str(&content)?
            }
        } else {
            BTreeMap::new()
        };
        tracing::debug!(path = %path.display(), keys = entries.len(), "Opened state store");
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Open `state.yaml` inside `dir`.
    pub fn in_dir(dir: &Path) -> Result<Self> {
        Self::open(dir.join("state.yaml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(entries)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl StateStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(lock(&self.entries).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = lock(&self.entries);
        let previous = entries.insert(key.to_string(), value.to_string());
        if let Err(e) = self.persist(&entries) {
            match previous {
                Some(old) => entries.insert(key.to_string(), old),
                None => entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = lock(&self.entries);
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_basic() {
        let store = MemoryStore::new();
        assert_eq!(store.get(AUTH_TOKEN_KEY).unwrap(), None);
        store.set(AUTH_TOKEN_KEY, "t1").unwrap();
        assert_eq!(store.get(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("t1"));
        store.remove(AUTH_TOKEN_KEY).unwrap();
        assert_eq!(store.get(AUTH_TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::in_dir(dir.path()).unwrap();
        store.set(AUTH_TOKEN_KEY, "t1").unwrap();
        store.set(THEME_KEY, "dark").unwrap();

        let reopened = FileStore::in_dir(dir.path()).unwrap();
        assert_eq!(reopened.get(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("t1"));
        assert_eq!(reopened.get(THEME_KEY).unwrap().as_deref(), Some("dark"));

        reopened.remove(AUTH_TOKEN_KEY).unwrap();
        let again = FileStore::in_dir(dir.path()).unwrap();
        assert_eq!(again.get(AUTH_TOKEN_KEY).unwrap(), None);
        assert_eq!(again.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("nested").join("state.yaml")).unwrap();
        assert_eq!(store.get(THEME_KEY).unwrap(), None);
        // Removing an absent key must not create the file.
        store.remove(THEME_KEY).unwrap();
        assert!(!store.path().exists());
    }
}
