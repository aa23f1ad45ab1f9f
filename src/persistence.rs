//! Durable key-value storage port
//!
//! The board mirrors its state into a string-keyed, string-valued store.
//! Absence of a key means "use the derived default", never an error.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{PlanboardError, Result};

/// Serialized card collection
pub const CARDS_KEY: &str = "cards";
/// Serialized z-order table
pub const Z_ORDER_KEY: &str = "zOrder";
/// Free-text session label
pub const IDENTIFIER_KEY: &str = "identifier";

/// Key-value persistence used by the board
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// In-memory store, used by tests and `--ephemeral` sessions
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `set`/`remove` fail, as a full or revoked
    /// storage backend would
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes {
            return Err(PlanboardError::storage(format!("write of '{}' refused", key)));
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.fail_writes {
            return Err(PlanboardError::storage(format!("removal of '{}' refused", key)));
        }
        self.entries.remove(key);
        Ok(())
    }
}

/// Store backed by a single JSON object file.
///
/// The whole map is rewritten on every change through a sibling temp file
/// and a rename, so a crash never leaves a half-written file behind.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open (or lazily create) the store at `path`.
    ///
    /// An unreadable or corrupt file is logged and treated as empty; it is
    /// replaced on the next write.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<BTreeMap<String, String>>(&content) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("Ignoring corrupt storage file {:?}: {}", path, e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!("Opened storage file {:?} with {} keys", path, entries.len());
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let previous = self.entries.insert(key.to_string(), value.to_string());
        if let Err(e) = self.flush() {
            // Keep the in-memory map in step with what is on disk
            match previous {
                Some(old) => self.entries.insert(key.to_string(), old),
                None => self.entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if let Some(old) = self.entries.remove(key) {
            if let Err(e) = self.flush() {
                self.entries.insert(key.to_string(), old);
                return Err(e);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store_get_set_remove() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get(CARDS_KEY).unwrap(), None);

        store.set(CARDS_KEY, "[]").unwrap();
        assert_eq!(store.get(CARDS_KEY).unwrap().as_deref(), Some("[]"));

        store.remove(CARDS_KEY).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_memory_store_failing_writes() {
        let mut store = MemoryStore::new();
        store.set(IDENTIFIER_KEY, "team").unwrap();
        store.set_fail_writes(true);

        assert!(matches!(
            store.set(IDENTIFIER_KEY, "other"),
            Err(PlanboardError::Storage(_))
        ));
        assert!(store.remove(IDENTIFIER_KEY).is_err());
        assert_eq!(store.get(IDENTIFIER_KEY).unwrap().as_deref(), Some("team"));
    }

    #[test]
    fn test_file_store_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("board.json");

        let mut store = FileStore::open(&path).unwrap();
        store.set(Z_ORDER_KEY, r#"{"1":{}}"#).unwrap();
        store.set(IDENTIFIER_KEY, "room 4").unwrap();
        store.remove(IDENTIFIER_KEY).unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get(Z_ORDER_KEY).unwrap().as_deref(), Some(r#"{"1":{}}"#));
        assert_eq!(reopened.get(IDENTIFIER_KEY).unwrap(), None);
    }

    #[test]
    fn test_file_store_corrupt_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("board.json");
        fs::write(&path, "{not json").unwrap();

        let mut store = FileStore::open(&path).unwrap();
        assert_eq!(store.get(CARDS_KEY).unwrap(), None);

        store.set(CARDS_KEY, "[]").unwrap();
        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get(CARDS_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_boxed_store_forwards() {
        let mut store: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
        store.set(CARDS_KEY, "x").unwrap();
        assert_eq!(store.get(CARDS_KEY).unwrap().as_deref(), Some("x"));
    }
}
