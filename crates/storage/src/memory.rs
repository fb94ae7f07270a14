//! In-memory store.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::{KeyValueStore, StorageError, StorageResult};

/// In-memory store for testing and ephemeral sessions
///
/// An optional byte quota mirrors the browser storage behaviour where a
/// `set` that would grow the namespace past its limit fails and leaves the
/// previous value in place.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStore {
    /// Creates a new, unbounded in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that rejects writes once keys and values together
    /// exceed `quota` bytes
    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: RwLock::default(),
            quota: Some(quota),
        }
    }

    /// Returns a copy of every stored entry
    pub fn snapshot(&self) -> StorageResult<HashMap<String, String>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| StorageError::Backend(format!("Lock poisoned: {}", e)))?;
        Ok(entries.clone())
    }

    /// Returns the number of stored keys
    pub fn len(&self) -> StorageResult<usize> {
        Ok(self.snapshot()?.len())
    }

    /// Returns true if nothing is stored
    pub fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.len()? == 0)
    }
}

fn used_bytes(entries: &HashMap<String, String>) -> usize {
    entries.iter().map(|(k, v)| k.len() + v.len()).sum()
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| StorageError::Backend(format!("Lock poisoned: {}", e)))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| StorageError::Backend(format!("Lock poisoned: {}", e)))?;

        if let Some(quota) = self.quota {
            let replaced = entries.get(key).map_or(0, |old| key.len() + old.len());
            let needed = used_bytes(&entries) - replaced + key.len() + value.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded { needed, quota });
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| StorageError::Backend(format!("Lock poisoned: {}", e)))?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();

        store.set("film07_theme", "dark").unwrap();
        assert_eq!(store.get("film07_theme").unwrap(), Some("dark".to_string()));

        assert!(store.contains("film07_theme").unwrap());
        assert!(!store.contains("nonexistent").unwrap());

        store.remove("film07_theme").unwrap();
        assert!(!store.contains("film07_theme").unwrap());

        // Removing again is a no-op
        store.remove("film07_theme").unwrap();
    }

    #[test]
    fn test_set_replaces_value() {
        let store = MemoryStore::new();
        store.set("k", "first").unwrap();
        store.set("k", "second").unwrap();
        assert_eq!(store.get("k").unwrap(), Some("second".to_string()));
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_quota_rejects_and_keeps_prior_value() {
        // "key" + "12345" = 8 bytes
        let store = MemoryStore::with_quota(10);
        store.set("key", "12345").unwrap();

        let err = store.set("key", "123456789").unwrap_err();
        assert!(matches!(
            err,
            StorageError::QuotaExceeded {
                needed: 12,
                quota: 10
            }
        ));
        assert_eq!(store.get("key").unwrap(), Some("12345".to_string()));

        // Replacing with an equally sized value fits
        store.set("key", "abcde").unwrap();
        assert_eq!(store.get("key").unwrap(), Some("abcde".to_string()));
    }
}
