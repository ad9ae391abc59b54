//! # Concurrency-safe string-keyed map.
//!
//! [`GuardedMap`] wraps a `HashMap<String, T>` behind one
//! [`tokio::sync::RwLock`]. The store keeps three independent instances
//! (values, topics, handlers), so operations on different maps never contend.
//!
//! ## Rules
//! - Values are cloned out; store `Arc`s for anything expensive to clone.
//! - [`GuardedMap::get_or_create`] runs the factory at most once per absent key,
//!   even when many callers race on the first access.
//! - No ordering guarantee across different keys.

use std::collections::HashMap;

use tokio::sync::RwLock;

/// String-keyed map guarded by a reader/writer lock.
#[derive(Debug)]
pub(crate) struct GuardedMap<T> {
    data: RwLock<HashMap<String, T>>,
}

impl<T: Clone> GuardedMap<T> {
    /// Creates an empty map.
    pub(crate) fn new() -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Returns a clone of the value under `key`, if any.
    pub(crate) async fn get(&self, key: &str) -> Option<T> {
        self.data.read().await.get(key).cloned()
    }

    /// Returns true if `key` is present.
    pub(crate) async fn contains(&self, key: &str) -> bool {
        self.data.read().await.contains_key(key)
    }

    /// Returns the value under `key`, creating it with `factory` if absent.
    ///
    /// The boolean is `true` when the value already existed.
    ///
    /// ### Notes
    /// The fast path takes only the shared lock. On a miss the exclusive lock is
    /// taken and the key re-checked, since another caller may have inserted it
    /// between the two lock acquisitions.
    pub(crate) async fn get_or_create<F>(&self, key: &str, factory: F) -> (T, bool)
    where
        F: FnOnce() -> T,
    {
        if let Some(v) = self.data.read().await.get(key) {
            return (v.clone(), true);
        }

        let mut data = self.data.write().await;
        if let Some(v) = data.get(key) {
            return (v.clone(), true);
        }
        let v = factory();
        data.insert(key.to_string(), v.clone());
        (v, false)
    }

    /// Inserts or replaces the value under `key`.
    pub(crate) async fn put(&self, key: &str, value: T) {
        self.data.write().await.insert(key.to_string(), value);
    }

    /// Removes `key`, returning its previous value. Absent keys are a no-op.
    pub(crate) async fn delete(&self, key: &str) -> Option<T> {
        self.data.write().await.remove(key)
    }

    /// Returns the number of entries.
    pub(crate) async fn len(&self) -> usize {
        self.data.read().await.len()
    }

    /// Returns a sorted list of keys.
    pub(crate) async fn keys(&self) -> Vec<String> {
        let data = self.data.read().await;
        let mut keys: Vec<String> = data.keys().cloned().collect();
        keys.sort_unstable();
        keys
    }
}
