//! In-process shared store.
//!
//! A `HashMap` behind a `Mutex`.  Cloning the surrounding `Arc` lets several
//! windows in one process (or one test) share it.  An optional byte quota
//! mimics the size limit of browser local storage: the quota counts the bytes
//! of every key plus every value.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::application::shared_store::{SharedStore, StoreError};

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStore {
    /// Creates an empty store without a size limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store that rejects writes past `limit` bytes.
    pub fn with_quota(limit: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            quota: Some(limit),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, StoreError> {
        self.entries
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

fn usage(entries: &HashMap<String, String>) -> usize {
    entries.iter().map(|(k, v)| k.len() + v.len()).sum()
}

impl SharedStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.lock()?;
        if let Some(limit) = self.quota {
            let replaced = entries.get(key).map_or(0, |old| key.len() + old.len());
            let needed = usage(&entries) - replaced + key.len() + value.len();
            if needed > limit {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    limit,
                });
            }
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.lock()?.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.lock()?.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_get_returns_value() {
        let store = MemoryStore::new();
        store.set("screen-0", "{}").expect("set");
        assert_eq!(store.get("screen-0").expect("get").as_deref(), Some("{}"));
    }

    #[test]
    fn test_last_writer_wins() {
        let store = MemoryStore::new();
        store.set("k", "first").expect("set");
        store.set("k", "second").expect("set");
        assert_eq!(store.get("k").expect("get").as_deref(), Some("second"));
    }

    #[test]
    fn test_removing_absent_key_is_ok() {
        let store = MemoryStore::new();
        assert!(store.remove("missing").is_ok());
    }

    #[test]
    fn test_quota_rejects_oversized_write() {
        // Arrange
        let store = MemoryStore::with_quota(10);

        // Act
        let result = store.set("screen-0", "too long");

        // Assert
        assert!(matches!(
            result,
            Err(StoreError::QuotaExceeded { needed: 16, limit: 10, .. })
        ));
        assert!(store.get("screen-0").expect("get").is_none());
    }

    #[test]
    fn test_quota_counts_replaced_value_once() {
        let store = MemoryStore::with_quota(6);
        store.set("k", "abcde").expect("fits exactly");
        store.set("k", "vwxyz").expect("replacement also fits");

        let grown = store.set("k", "vwxyz!");

        assert!(matches!(
            grown,
            Err(StoreError::QuotaExceeded { needed: 7, limit: 6, .. })
        ));
        assert_eq!(store.get("k").expect("get").as_deref(), Some("vwxyz"));
    }

    #[test]
    fn test_keys_lists_every_entry() {
        let store = MemoryStore::new();
        store.set("a", "1").expect("set");
        store.set("b", "2").expect("set");

        let mut keys = store.keys().expect("keys");
        keys.sort();

        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);
    }
}
