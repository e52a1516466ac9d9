use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};

/// Small string key-value store for state that outlives one command
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Persists keys to `state.json` in the data dir
pub struct JsonFileStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        if !data_dir.exists() {
            fs::create_dir_all(&data_dir).context("Failed to create data directory")?;
        }

        Ok(Self {
            path: data_dir.join("state.json"),
            lock: Mutex::new(()),
        })
    }

    fn load(&self) -> Result<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }

        let content = fs::read_to_string(&self.path).context("Failed to read state.json")?;
        serde_json::from_str(&content).context("Failed to parse state.json")
    }

    fn save(&self, entries: &HashMap<String, String>) -> Result<()> {
        let content = serde_json::to_string_pretty(entries).context("Failed to serialize state")?;
        fs::write(&self.path, content).context("Failed to write state.json")?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().map_err(|_| anyhow!("state lock poisoned"))?;
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock().map_err(|_| anyhow!("state lock poisoned"))?;
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }
}

/// In-process store, used by tests and one-shot commands
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().map_err(|_| anyhow!("state lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| anyhow!("state lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_json_store_persists_across_instances() {
        let dir = tempdir().unwrap();

        let store = JsonFileStore::new(dir.path()).unwrap();
        assert!(store.get("last_instagram_check").unwrap().is_none());
        store.set("last_instagram_check", "2026-01-01T00:00:00Z").unwrap();
        store.set("other", "value").unwrap();

        let reopened = JsonFileStore::new(dir.path()).unwrap();
        assert_eq!(
            reopened.get("last_instagram_check").unwrap().as_deref(),
            Some("2026-01-01T00:00:00Z")
        );
        assert_eq!(reopened.get("other").unwrap().as_deref(), Some("value"));
    }

    #[test]
    fn test_json_store_creates_missing_dir() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = JsonFileStore::new(&nested).unwrap();
        store.set("k", "v").unwrap();
        assert!(nested.join("state.json").exists());
    }

    #[test]
    fn test_json_store_corrupt_file_is_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("state.json"), "not json").unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();
        assert!(store.get("k").is_err());
    }

    #[test]
    fn test_memory_store_overwrites() {
        let store = MemoryStore::new();
        store.set("k", "1").unwrap();
        store.set("k", "2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("2"));
        assert!(store.get("missing").unwrap().is_none());
    }
}
