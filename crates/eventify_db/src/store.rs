//! Key/value store contract
//!
//! The services persist each collection as one string value under a fixed
//! key. Stores are synchronous, have no transactions, and are shared by
//! reference (`Arc<dyn KeyValueStore>`) between the services of one origin.

use crate::error::StoreError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::trace;

/// A persistent, synchronous, string-keyed store.
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` if the key was never written
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Write `value` only if the key still holds exactly `expected`
    /// (`None` meaning absent).
    ///
    /// The comparison and the write are one step: no other writer of this
    /// store can commit in between. Returns `false`, writing nothing, when
    /// the current value differs.
    fn compare_and_set(
        &self,
        key: &str,
        expected: Option<String>,
        value: &str,
    ) -> Result<bool, StoreError>;

    /// Remove a key; removing an absent key is not an error
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Whether the store can be used at all in this environment
    fn is_available(&self) -> bool {
        true
    }
}

/// Shared handle to a store, injected into every service.
pub type StoreHandle = Arc<dyn KeyValueStore>;

pub(crate) fn check_quota(key: &str, value: &str, quota: Option<u64>) -> Result<(), StoreError> {
    if let Some(quota) = quota {
        let size = value.len() as u64;
        if size > quota {
            return Err(StoreError::QuotaExceeded {
                key: key.to_string(),
                size,
                quota,
            });
        }
    }
    Ok(())
}

/// Process-local store.
///
/// Each instance is isolated; two services sharing one `Arc<MemoryStore>`
/// behave like two tabs of the same origin.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    quota: Option<u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects values larger than `quota` bytes.
    pub fn with_quota(quota: u64) -> Self {
        Self {
            values: Mutex::new(HashMap::new()),
            quota: Some(quota),
        }
    }

    /// Convenience for tests and demos: a fresh store behind a handle.
    pub fn shared() -> StoreHandle {
        Arc::new(Self::new())
    }

    /// Number of keys currently held.
    pub fn len(&self) -> usize {
        self.values.lock().map(|values| values.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let values = self.values.lock().map_err(|_| StoreError::Poisoned)?;
        trace!("memory get {}", key);
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        check_quota(key, value, self.quota)?;
        let mut values = self.values.lock().map_err(|_| StoreError::Poisoned)?;
        trace!("memory set {} ({} bytes)", key, value.len());
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn compare_and_set(
        &self,
        key: &str,
        expected: Option<String>,
        value: &str,
    ) -> Result<bool, StoreError> {
        check_quota(key, value, self.quota)?;
        let mut values = self.values.lock().map_err(|_| StoreError::Poisoned)?;
        if values.get(key) != expected.as_ref() {
            trace!("memory compare_and_set {} lost the race", key);
            return Ok(false);
        }
        values.insert(key.to_string(), value.to_string());
        Ok(true)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut values = self.values.lock().map_err(|_| StoreError::Poisoned)?;
        values.remove(key);
        Ok(())
    }
}

/// The store used when no storage exists (e.g. pre-rendering).
///
/// Reads return `None` and writes are ignored; `is_available` lets callers
/// tell this apart from an empty store.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableStore;

impl KeyValueStore for UnavailableStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Ok(())
    }

    fn compare_and_set(
        &self,
        _key: &str,
        _expected: Option<String>,
        _value: &str,
    ) -> Result<bool, StoreError> {
        Ok(true)
    }

    fn remove(&self, _key: &str) -> Result<(), StoreError> {
        Ok(())
    }

    fn is_available(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);

        store.set("k", "[1]").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("[1]"));
        assert_eq!(store.len(), 1);

        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_memory_stores_are_isolated() {
        let a = MemoryStore::new();
        let b = MemoryStore::new();
        a.set("k", "a").unwrap();

        assert_eq!(b.get("k").unwrap(), None);
    }

    #[test]
    fn test_quota_is_reported() {
        let store = MemoryStore::with_quota(4);
        store.set("k", "1234").unwrap();

        let err = store.set("k", "12345").unwrap_err();
        assert!(matches!(
            err,
            StoreError::QuotaExceeded { size: 5, quota: 4, .. }
        ));
        // the previous value survives a rejected write
        assert_eq!(store.get("k").unwrap().as_deref(), Some("1234"));
    }

    #[test]
    fn test_compare_and_set_needs_the_expected_value() {
        let store = MemoryStore::new();

        assert!(store.compare_and_set("k", None, "v1").unwrap());
        assert!(!store.compare_and_set("k", None, "other").unwrap());
        assert!(!store
            .compare_and_set("k", Some("v0".to_string()), "other")
            .unwrap());
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v1"));

        assert!(store
            .compare_and_set("k", Some("v1".to_string()), "v2")
            .unwrap());
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"));
    }

    #[test]
    fn test_compare_and_set_lets_one_of_many_threads_win() {
        let store = Arc::new(MemoryStore::new());
        store.set("k", "start").unwrap();

        let winners: usize = (0..8)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    store
                        .compare_and_set("k", Some("start".to_string()), &format!("t{i}"))
                        .unwrap()
                })
            })
            .collect::<Vec<_>>()
            .into_iter()
            .map(|handle| usize::from(handle.join().unwrap()))
            .sum();

        assert_eq!(winners, 1);
    }

    #[test]
    fn test_unavailable_store_has_safe_defaults() {
        let store = UnavailableStore;
        store.set("k", "v").unwrap();

        assert_eq!(store.get("k").unwrap(), None);
        assert!(!store.is_available());
    }
}
