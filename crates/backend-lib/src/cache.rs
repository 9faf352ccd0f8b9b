// ============================
// crates/backend-lib/src/cache.rs
// ============================
//! Process-local key/value cache guarded by a single reader/writer lock.
use parking_lot::RwLock;
use std::{collections::HashMap, hash::Hash, sync::Arc};

/// Generic in-memory map safe for concurrent access.
///
/// Cloning the handle shares the underlying map. Writers (`set`, `delete`,
/// `clear`, `load`, `append`, `retain`) hold the write lock for the whole
/// mutation, so readers see either the state before or after it.
#[derive(Debug)]
pub struct ConcurrentMap<K, V> {
    inner: Arc<RwLock<HashMap<K, V>>>,
}

impl<K, V> Clone for ConcurrentMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K: Eq + Hash, V> Default for ConcurrentMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash, V> ConcurrentMap<K, V> {
    /// Create an empty map
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert or overwrite a value
    pub fn set(&self, key: K, value: V) {
        self.inner.write().insert(key, value);
    }

    /// Check whether a key is present
    pub fn exists(&self, key: &K) -> bool {
        self.inner.read().contains_key(key)
    }

    /// Remove a key; absent keys are ignored
    pub fn delete(&self, key: &K) {
        self.inner.write().remove(key);
    }

    /// Remove `key` only if its current value matches `pred`, checked under
    /// the same write lock as the removal. Returns whether it was removed.
    pub fn remove_if<F>(&self, key: &K, pred: F) -> bool
    where
        F: FnOnce(&V) -> bool,
    {
        let mut map = self.inner.write();
        match map.get(key) {
            Some(value) if pred(value) => {
                map.remove(key);
                true
            },
            _ => false,
        }
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.inner.write().clear();
    }

    /// Replace the whole contents with `entries`, returning the new size
    pub fn load(&self, entries: HashMap<K, V>) -> usize {
        let mut map = self.inner.write();
        *map = entries;
        map.len()
    }

    /// Merge `entries` into the current contents, returning the new size
    pub fn append(&self, entries: HashMap<K, V>) -> usize {
        let mut map = self.inner.write();
        map.extend(entries);
        map.len()
    }

    /// Number of entries
    pub fn count(&self) -> usize {
        self.inner.read().len()
    }

    /// Keep only the entries matching `keep`, returning how many were removed
    pub fn retain<F>(&self, keep: F) -> usize
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let mut map = self.inner.write();
        let before = map.len();
        map.retain(keep);
        before - map.len()
    }
}

impl<K: Eq + Hash, V: Clone> ConcurrentMap<K, V> {
    /// Get a copy of the value stored under `key`
    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.read().get(key).cloned()
    }

    /// Snapshot of all values, in no particular order
    pub fn to_list(&self) -> Vec<V> {
        self.inner.read().values().cloned().collect()
    }
}
