//! Flat key/value persistence for session and preference state
//!
//! The console persists a handful of opaque strings: the bearer token,
//! the serialized user record and the theme choice. Storage is a single
//! JSON object on disk with a write-through in-memory cache, mirroring
//! the browser localStorage the dashboard originally relied on.

use std::collections::HashMap;
use std::path::PathBuf;

use parking_lot::Mutex;
use tracing::{error, warn};

/// Storage keys shared with the original dashboard
pub const AUTH_TOKEN_KEY: &str = "auth_token";
pub const USER_DATA_KEY: &str = "user_data";
pub const THEME_KEY: &str = "dashboard-theme";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not resolve a data directory")]
    NoDataDir,
}

/// Common interface for the persisted key->string map.
///
/// Mutations never fail from the caller's perspective; a write that
/// cannot reach disk is logged and the in-memory copy stays current.
pub trait KeyStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    /// Write several entries as one unit. Overlapping writers get
    /// last-write-wins per batch, never a mixed combination of keys
    /// from two batches.
    fn set_many(&self, entries: &[(&str, &str)]);
    fn remove(&self, key: &str);
}

/// File-backed store: one JSON object, rewritten on every mutation.
/// Writes are serialized by the cache lock, so overlapping callers get
/// last-write-wins rather than interleaved partial content.
pub struct FileStore {
    path: PathBuf,
    cache: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`, loading any existing content. A file
    /// that fails to parse starts the store empty rather than failing.
    pub fn open(path: PathBuf) -> Result<Self, StoreError> {
        let cache = match std::fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                warn!("store file unreadable, starting empty: {e}");
                HashMap::new()
            }),
            Err(_) => HashMap::new(),
        };

        Ok(Self {
            path,
            cache: Mutex::new(cache),
        })
    }

    /// Default OS-specific store location
    pub fn default_path() -> Result<PathBuf, StoreError> {
        let mut path = dirs::data_dir().ok_or(StoreError::NoDataDir)?;
        path.push("nexus-console");
        path.push("store.json");
        Ok(path)
    }

    fn flush(&self, cache: &HashMap<String, String>) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                error!("failed to create store directory: {e}");
                return;
            }
        }

        match serde_json::to_string_pretty(cache) {
            Ok(text) => {
                if let Err(e) = std::fs::write(&self.path, text) {
                    error!("failed to write store file: {e}");
                }
            }
            Err(e) => error!("failed to serialize store: {e}"),
        }
    }
}

impl KeyStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.cache.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut cache = self.cache.lock();
        cache.insert(key.to_string(), value.to_string());
        self.flush(&cache);
    }

    fn set_many(&self, entries: &[(&str, &str)]) {
        let mut cache = self.cache.lock();
        for (key, value) in entries {
            cache.insert((*key).to_string(), (*value).to_string());
        }
        self.flush(&cache);
    }

    fn remove(&self, key: &str) {
        let mut cache = self.cache.lock();
        cache.remove(key);
        self.flush(&cache);
    }
}

/// In-memory store for tests and ephemeral sessions
#[derive(Default)]
pub struct MemoryStore {
    map: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.map.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.map.lock().insert(key.to_string(), value.to_string());
    }

    fn set_many(&self, entries: &[(&str, &str)]) {
        let mut map = self.map.lock();
        for (key, value) in entries {
            map.insert((*key).to_string(), (*value).to_string());
        }
    }

    fn remove(&self, key: &str) {
        self.map.lock().remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let store = FileStore::open(path.clone()).unwrap();
        store.set(AUTH_TOKEN_KEY, "T1");
        store.set(THEME_KEY, "light");
        assert_eq!(store.get(AUTH_TOKEN_KEY).as_deref(), Some("T1"));

        // Reopen from disk
        let reloaded = FileStore::open(path).unwrap();
        assert_eq!(reloaded.get(AUTH_TOKEN_KEY).as_deref(), Some("T1"));
        assert_eq!(reloaded.get(THEME_KEY).as_deref(), Some("light"));
    }

    #[test]
    fn test_file_store_remove_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let store = FileStore::open(path.clone()).unwrap();
        store.set(AUTH_TOKEN_KEY, "T1");
        store.remove(AUTH_TOKEN_KEY);

        let reloaded = FileStore::open(path).unwrap();
        assert_eq!(reloaded.get(AUTH_TOKEN_KEY), None);
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "not json at all {").unwrap();

        let store = FileStore::open(path).unwrap();
        assert_eq!(store.get(AUTH_TOKEN_KEY), None);
        store.set(AUTH_TOKEN_KEY, "fresh");
        assert_eq!(store.get(AUTH_TOKEN_KEY).as_deref(), Some("fresh"));
    }

    #[test]
    fn test_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("absent.json")).unwrap();
        assert_eq!(store.get("anything"), None);
    }

    #[test]
    fn test_set_many_persists_all_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let store = FileStore::open(path.clone()).unwrap();
        store.set_many(&[(AUTH_TOKEN_KEY, "T1"), (USER_DATA_KEY, "{\"id\":\"1\"}")]);

        let reloaded = FileStore::open(path).unwrap();
        assert_eq!(reloaded.get(AUTH_TOKEN_KEY).as_deref(), Some("T1"));
        assert_eq!(reloaded.get(USER_DATA_KEY).as_deref(), Some("{\"id\":\"1\"}"));
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        store.set("k", "v");
        assert_eq!(store.get("k").as_deref(), Some("v"));
        store.set_many(&[("a", "1"), ("b", "2")]);
        assert_eq!(store.get("a").as_deref(), Some("1"));
        assert_eq!(store.get("b").as_deref(), Some("2"));
        store.remove("k");
        assert_eq!(store.get("k"), None);
    }
}
