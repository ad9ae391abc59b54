//! # Store: values, per-key topics and action handlers.
//!
//! The [`Store`] composes three independent [`GuardedMap`]s:
//!
//! ```text
//! values:   key    → V
//! topics:   key    → Arc<Topic<V>>      (created lazily by observe)
//! handlers: action → HandlerRef<V>      (last registration wins)
//! ```
//!
//! ## Data flow
//! ```text
//! dispatch(action, args)
//!   └─► handlers[action]? ── none ──► no-op
//!         └─► handler(ActionContext)
//!               ├─► put(k, v):   values[k] = v,   then topics[k]?.notify(v)
//!               └─► delete(k):   values.remove(k), then topics[k]?.shutdown()
//!         └─► Err / panic ──► ErrorSink::on_error(action, &err)
//! ```
//!
//! ## Rules
//! - No store-wide lock: each map and each topic has its own.
//! - A `put` and its notification are sequential, not atomic with respect to a
//!   concurrent `delete` of the same key.
//! - Deleting a key shuts its topic down but keeps the topic entry; a later
//!   `observe` subscribes to the same, still usable, topic. Topics are never
//!   removed while the store lives.
//! - The store spawns one forwarding task per subscription, so it must be used
//!   inside a tokio runtime.

use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tracing::{debug, trace};

use crate::actions::{ActionContext, HandlerRef};
use crate::core::builder::StoreBuilder;
use crate::core::config::StoreConfig;
use crate::core::guarded::GuardedMap;
use crate::error::ActionError;
use crate::sinks::ErrorSink;
use crate::topics::{Subscription, Topic};

/// Bound on the values a store holds.
///
/// Any `Clone + Send + Sync + 'static` type qualifies. To keep heterogeneous
/// values under different keys, use an enum and match per key by convention.
pub trait StoreValue: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> StoreValue for T {}

struct Inner<V> {
    cfg: StoreConfig,
    values: GuardedMap<V>,
    topics: GuardedMap<Arc<Topic<V>>>,
    handlers: GuardedMap<HandlerRef<V>>,
    sink: Arc<dyn ErrorSink>,
}

/// In-process state container with per-key subscriptions and action dispatch.
///
/// `Store` is a cheap handle (`Arc` inside); clone it to share one store
/// between handlers, subscribers and tasks.
///
/// ## Example
/// ```rust
/// use statehub::{ActionContext, ActionError, HandlerFn, Store};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let store: Store<i64> = Store::new();
/// store
///     .on("add", HandlerFn::arc(|ctx: ActionContext<i64>| async move {
///         let total = ctx.get("total").await.unwrap_or(0) + *ctx.arg(0)?;
///         ctx.put("total", total).await;
///         Ok::<_, ActionError>(())
///     }))
///     .await;
///
/// let mut totals = store.observe("total").await;
/// store.dispatch("add", [2]).await;
/// store.dispatch("add", [3]).await;
///
/// assert_eq!(totals.recv().await, Some(2));
/// assert_eq!(totals.recv().await, Some(5));
/// assert_eq!(store.get("total").await, Some(5));
/// # }
/// ```
pub struct Store<V> {
    inner: Arc<Inner<V>>,
}

impl<V: StoreValue> Store<V> {
    /// Creates a store with [`StoreConfig::default`] and the [`LogWriter`](crate::LogWriter) sink.
    pub fn new() -> Self {
        StoreBuilder::new(StoreConfig::default()).build()
    }

    /// Returns a builder for a store with custom configuration or error sink.
    pub fn builder(cfg: StoreConfig) -> StoreBuilder<V> {
        StoreBuilder::new(cfg)
    }

    pub(crate) fn from_parts(cfg: StoreConfig, sink: Arc<dyn ErrorSink>) -> Self {
        Self {
            inner: Arc::new(Inner {
                cfg,
                values: GuardedMap::new(),
                topics: GuardedMap::new(),
                handlers: GuardedMap::new(),
                sink,
            }),
        }
    }

    /// Returns the configuration this store was built with.
    pub fn config(&self) -> &StoreConfig {
        &self.inner.cfg
    }

    /// Returns true if `key` holds a value.
    pub async fn has(&self, key: &str) -> bool {
        self.inner.values.contains(key).await
    }

    /// Returns the value under `key`, or `None` if absent.
    pub async fn get(&self, key: &str) -> Option<V> {
        self.inner.values.get(key).await
    }

    /// Returns a sorted list of keys currently holding a value.
    pub async fn keys(&self) -> Vec<String> {
        self.inner.values.keys().await
    }

    /// Subscribes to every future write of `key`.
    ///
    /// The key's topic is created on first use; concurrent first calls share one topic.
    pub async fn observe(&self, key: &str) -> Subscription<V> {
        let cfg = &self.inner.cfg;
        let (topic, existed) = self
            .inner
            .topics
            .get_or_create(key, || Arc::new(Topic::new(key, cfg)))
            .await;
        if !existed {
            debug!(key, "topic created");
        }
        topic.subscribe().await
    }

    /// Registers `handler` under `action`, replacing any previous one.
    pub async fn on(&self, action: &str, handler: HandlerRef<V>) {
        if self.inner.handlers.get(action).await.is_some() {
            debug!(action, "replacing handler");
        }
        self.inner.handlers.put(action, handler).await;
    }

    /// Unregisters `action`. Returns `true` if a handler was registered.
    pub async fn off(&self, action: &str) -> bool {
        self.inner.handlers.delete(action).await.is_some()
    }

    /// Returns a sorted list of registered action names.
    pub async fn actions(&self) -> Vec<String> {
        self.inner.handlers.keys().await
    }

    /// Runs the handler registered for `action` with `args`.
    ///
    /// - Unknown action: silent no-op.
    /// - Handler error or panic: routed to the store's [`ErrorSink`], never returned.
    ///
    /// Returns once the handler finished, including every notification its
    /// writes triggered.
    pub async fn dispatch<I>(&self, action: &str, args: I)
    where
        I: IntoIterator<Item = V>,
    {
        let Some(handler) = self.inner.handlers.get(action).await else {
            trace!(action, "no handler registered; dispatch ignored");
            return;
        };

        let ctx = ActionContext::new(Arc::from(action), args.into_iter().collect(), self.clone());
        let result = match AssertUnwindSafe(handler.handle(ctx)).catch_unwind().await {
            Ok(result) => result,
            Err(panic) => Err(ActionError::Panicked {
                info: panic_message(&*panic),
            }),
        };

        if let Err(err) = result {
            self.inner.sink.on_error(action, &err);
        }
    }

    /// Returns the number of topics ever created (topics outlive their subscribers).
    pub async fn topic_count(&self) -> usize {
        self.inner.topics.len().await
    }

    /// Returns the number of live subscriptions on `key`.
    pub async fn subscriber_count(&self, key: &str) -> usize {
        match self.inner.topics.get(key).await {
            Some(topic) => topic.subscriber_count().await,
            None => 0,
        }
    }

    /// Writes `value` under `key`, then notifies the key's topic if one exists.
    pub(crate) async fn put(&self, key: &str, value: V) {
        self.inner.values.put(key, value.clone()).await;
        if let Some(topic) = self.inner.topics.get(key).await {
            topic.notify(value).await;
        }
    }

    /// Removes `key`, then shuts the key's topic down if one exists.
    pub(crate) async fn delete(&self, key: &str) {
        self.inner.values.delete(key).await;
        if let Some(topic) = self.inner.topics.get(key).await {
            topic.shutdown().await;
        }
    }
}

impl<V: StoreValue> Default for Store<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Clone for Store<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V> fmt::Debug for Store<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("cfg", &self.inner.cfg)
            .field("sink", &self.inner.sink.name())
            .finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
