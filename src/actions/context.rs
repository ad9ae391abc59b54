//! # Per-dispatch capability object.
//!
//! [`ActionContext`] is built fresh by [`Store::dispatch`](crate::Store::dispatch)
//! and moved into exactly one handler invocation. It carries the positional
//! arguments of that call and is the only way to reach the store's write path.
//!
//! ## Rules
//! - `put`/`delete` exist only here; the store's public surface is read-only.
//! - `arg(i)` outside `0..n_args()` is an [`ActionError::ArgOutOfRange`], so a
//!   handler can bail out with `?` instead of panicking.

use std::fmt;
use std::sync::Arc;

use crate::core::{Store, StoreValue};
use crate::error::ActionError;

/// Arguments and write access granted to one handler invocation.
pub struct ActionContext<V> {
    action: Arc<str>,
    args: Vec<V>,
    store: Store<V>,
}

impl<V: StoreValue> ActionContext<V> {
    pub(crate) fn new(action: Arc<str>, args: Vec<V>, store: Store<V>) -> Self {
        Self {
            action,
            args,
            store,
        }
    }

    /// Returns the name of the action being handled.
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Returns the number of positional arguments.
    pub fn n_args(&self) -> usize {
        self.args.len()
    }

    /// Returns the argument at `index`.
    pub fn arg(&self, index: usize) -> Result<&V, ActionError> {
        self.args.get(index).ok_or(ActionError::ArgOutOfRange {
            index,
            len: self.args.len(),
        })
    }

    /// Returns all positional arguments.
    pub fn args(&self) -> &[V] {
        &self.args
    }

    /// Returns true if `key` holds a value.
    pub async fn has(&self, key: &str) -> bool {
        self.store.has(key).await
    }

    /// Returns the value under `key`, if any.
    pub async fn get(&self, key: &str) -> Option<V> {
        self.store.get(key).await
    }

    /// Stores `value` under `key` and notifies the key's subscribers.
    ///
    /// May wait for slow subscribers, depending on the store's backpressure policy.
    pub async fn put(&self, key: &str, value: V) {
        self.store.put(key, value).await;
    }

    /// Removes `key` and closes every subscription on it.
    pub async fn delete(&self, key: &str) {
        self.store.delete(key).await;
    }
}

impl<V> fmt::Debug for ActionContext<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionContext")
            .field("action", &self.action)
            .field("n_args", &self.args.len())
            .finish_non_exhaustive()
    }
}
