use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

use regex::Regex;

use crate::io::recovery::atomic_write;

/// Error type for key/value backends
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("quota exceeded writing {key}: {needed} bytes needed, {limit} allowed")]
    QuotaExceeded { key: String, needed: u64, limit: u64 },
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// A durable string-keyed store of string values.
///
/// Mirrors the browser `localStorage` contract: values are opaque strings,
/// a write either lands completely or fails, and there is a total byte budget.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
    /// Short description for log lines
    fn describe(&self) -> String;
}

fn key_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap())
}

fn check_key(key: &str) -> Result<(), StoreError> {
    if key_re().is_match(key) {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

// ---------------------------------------------------------------------------
// File-backed store
// ---------------------------------------------------------------------------

/// One `<key>.json` file per key inside a data directory.
pub struct FileStore {
    dir: PathBuf,
    quota_bytes: u64,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>, quota_bytes: u64) -> Self {
        FileStore {
            dir: dir.into(),
            quota_bytes,
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Bytes currently used by stored values, excluding `skip_key`
    fn usage_excluding(&self, skip_key: &str) -> Result<u64, StoreError> {
        let skip = format!("{}.json", skip_key);
        let mut total = 0;
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if !name.ends_with(".json") || name == skip {
                continue;
            }
            total += entry.metadata()?.len();
        }
        Ok(total)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        check_key(key)?;
        match fs::read_to_string(self.path_for(key)) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        check_key(key)?;
        fs::create_dir_all(&self.dir)
            .map_err(|e| StoreError::Unavailable(format!("{}: {}", self.dir.display(), e)))?;
        let needed = self.usage_excluding(key)? + value.len() as u64;
        if needed > self.quota_bytes {
            return Err(StoreError::QuotaExceeded {
                key: key.to_string(),
                needed,
                limit: self.quota_bytes,
            });
        }
        atomic_write(&self.path_for(key), value.as_bytes())?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        check_key(key)?;
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn describe(&self) -> String {
        format!("file store at {}", self.dir.display())
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Session-only store. Used for `--ephemeral` runs and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    quota_bytes: Option<u64>,
    unavailable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    pub fn with_quota(quota_bytes: u64) -> Self {
        MemoryStore {
            quota_bytes: Some(quota_bytes),
            ..Default::default()
        }
    }

    /// A store that rejects every operation, like a browser with storage disabled
    pub fn unavailable() -> Self {
        MemoryStore {
            unavailable: true,
            ..Default::default()
        }
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable {
            Err(StoreError::Unavailable("storage disabled".into()))
        } else {
            Ok(())
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.check_available()?;
        check_key(key)?;
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.check_available()?;
        check_key(key)?;
        if let Some(limit) = self.quota_bytes {
            let others: u64 = self
                .entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(_, v)| v.len() as u64)
                .sum();
            let needed = others + value.len() as u64;
            if needed > limit {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    limit,
                });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.check_available()?;
        check_key(key)?;
        self.entries.remove(key);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory store".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_store_set_get_remove() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::new(dir.path().join("data"), 1024);
        assert_eq!(store.get("toolCheckoutDate").unwrap(), None);
        store.set("toolCheckoutDate", "\"2026-10-17\"").unwrap();
        assert_eq!(
            store.get("toolCheckoutDate").unwrap().as_deref(),
            Some("\"2026-10-17\"")
        );
        assert!(dir.path().join("data/toolCheckoutDate.json").exists());
        store.remove("toolCheckoutDate").unwrap();
        assert_eq!(store.get("toolCheckoutDate").unwrap(), None);
        // Removing a missing key is fine
        store.remove("toolCheckoutDate").unwrap();
    }

    #[test]
    fn file_store_enforces_quota() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::new(dir.path(), 10);
        store.set("a", "12345").unwrap();
        // Overwriting the same key does not count its old value
        store.set("a", "1234567890").unwrap();
        let err = store.set("b", "x").unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded { needed: 11, limit: 10, .. }));
        assert_eq!(store.get("b").unwrap(), None);
    }

    #[test]
    fn rejects_path_like_keys() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::new(dir.path(), 1024);
        assert!(matches!(
            store.set("../escape", "1"),
            Err(StoreError::InvalidKey(_))
        ));
        assert!(matches!(store.get("a/b"), Err(StoreError::InvalidKey(_))));
    }

    #[test]
    fn memory_store_quota_and_unavailable() {
        let mut store = MemoryStore::with_quota(4);
        store.set("k", "1234").unwrap();
        assert!(matches!(
            store.set("j", "1"),
            Err(StoreError::QuotaExceeded { .. })
        ));

        let mut off = MemoryStore::unavailable();
        assert!(matches!(off.set("k", "1"), Err(StoreError::Unavailable(_))));
        assert!(matches!(off.get("k"), Err(StoreError::Unavailable(_))));
    }
}
