//! Volatile key-value state store.
//!
//! The dashboard keeps its state (latest payload, history ring, UI
//! selections) as opaque string values behind the [`StateStore`] capability,
//! so view code never touches a global and the normalizer stack can be
//! tested against an in-memory store. The file-backed implementation is a
//! best-effort cache: no integrity checks, last write wins.

pub mod stock;

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};

pub use stock::{HistoricalEntry, StockStore};

/// Open the file-backed store described by the `[store]` config section.
pub fn open(config: &crate::config::schema::StoreConfig) -> StockStore<FileStore> {
    let dir = crate::config::expand_home(&config.dir);
    StockStore::new(FileStore::new(dir), config.history_capacity)
}

// ---------------------------------------------------------------------------
// Capability
// ---------------------------------------------------------------------------

/// Get/set access to named string slots.
pub trait StateStore {
    /// Read a value. Absent keys and unreadable values both return `None`.
    fn get(&self, key: &str) -> Option<String>;

    /// Overwrite a value. Last write wins.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a value if present.
    fn remove(&self, key: &str) -> Result<()>;
}

// ---------------------------------------------------------------------------
// File-backed store
// ---------------------------------------------------------------------------

/// One file per key under a state directory (default `~/.shelfwatch/state/`).
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StateStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create state directory {}", self.dir.display()))?;
        let path = self.path_for(key);
        fs::write(&path, value)
            .with_context(|| format!("failed to write state file {}", path.display()))
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("failed to remove state file {}", path.display()))?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// HashMap-backed store for tests and previews.
#[derive(Debug, Default)]
pub struct MemStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| anyhow::anyhow!("state store poisoned"))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| anyhow::anyhow!("state store poisoned"))?;
        values.remove(key);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mem_store_round_trips() {
        let store = MemStore::new();
        assert_eq!(store.get("k"), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k"), Some("v".to_string()));
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k"), Some("v2".to_string()));
        store.remove("k").unwrap();
        assert_eq!(store.get("k"), None);
    }

    #[test]
    fn file_store_round_trips() {
        let dir = std::env::temp_dir().join(format!("shelfwatch-store-{}", std::process::id()));
        let store = FileStore::new(&dir);
        store.set("latestAnalysis", "{}").unwrap();
        assert_eq!(store.get("latestAnalysis"), Some("{}".to_string()));
        store.remove("latestAnalysis").unwrap();
        assert_eq!(store.get("latestAnalysis"), None);
        // Removing an absent key is not an error.
        store.remove("latestAnalysis").unwrap();
        let _ = fs::remove_dir_all(&dir);
    }
}
