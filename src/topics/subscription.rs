//! # Consumer handle for one key.
//!
//! A [`Subscription`] is returned by [`Store::observe`](crate::Store::observe)
//! and yields every value written to its key from then on, in write order.
//!
//! ## Lifecycle
//! ```text
//! Open ──close() / key deleted──► Closed
//!   │                               │
//!   └─ recv() → Some(v)             └─ recv() → queued values, then None
//! ```
//!
//! ## Rules
//! - `close()` is idempotent; only the first call unsubscribes, whether it
//!   comes from the subscription or from one of its [`SubscriptionCloser`]s.
//! - After `close()` returns, no new value is queued for this subscriber.
//!   Values queued before that still drain before `recv()` yields `None`.
//! - Dropping the handle without closing is allowed; its forwarder notices
//!   and removes the slot.

use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;

use crate::core::StoreValue;
use crate::topics::list::SlotKey;
use crate::topics::topic::Topic;

/// Stable identity of a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId {
    topic: u64,
    slot: SlotKey,
}

impl SubscriptionId {
    pub(crate) fn new(topic: u64, slot: SlotKey) -> Self {
        Self { topic, slot }
    }

    pub(crate) fn topic(&self) -> u64 {
        self.topic
    }

    pub(crate) fn slot(&self) -> SlotKey {
        self.slot
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}.{}",
            self.topic, self.slot.index, self.slot.generation
        )
    }
}

/// A single consumer's live connection to a key.
///
/// Read values with [`recv`](Self::recv), or use it as a [`Stream`]. To end
/// the subscription from another task while this one is parked in `recv`,
/// hand that task a [`SubscriptionCloser`] from [`closer`](Self::closer).
///
/// ## Example
/// ```rust
/// use statehub::{ActionContext, ActionError, HandlerFn, Store};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let store: Store<u32> = Store::new();
/// store
///     .on("set", HandlerFn::arc(|ctx: ActionContext<u32>| async move {
///         let v = *ctx.arg(0)?;
///         ctx.put("n", v).await;
///         Ok::<_, ActionError>(())
///     }))
///     .await;
///
/// let mut sub = store.observe("n").await;
/// store.dispatch("set", [5]).await;
/// assert_eq!(sub.recv().await, Some(5));
///
/// sub.close().await;
/// assert_eq!(sub.recv().await, None);
/// # }
/// ```
pub struct Subscription<V> {
    closer: SubscriptionCloser<V>,
    rx: mpsc::Receiver<V>,
}

impl<V: StoreValue> Subscription<V> {
    pub(crate) fn new(id: SubscriptionId, topic: Arc<Topic<V>>, rx: mpsc::Receiver<V>) -> Self {
        Self {
            closer: SubscriptionCloser {
                id,
                topic,
                closed: Arc::new(AtomicBool::new(false)),
            },
            rx,
        }
    }

    /// Returns this subscription's identity.
    pub fn id(&self) -> SubscriptionId {
        self.closer.id
    }

    /// Returns the observed key.
    pub fn key(&self) -> &str {
        self.closer.topic.key()
    }

    /// Receives the next value.
    ///
    /// Returns `None` once the subscription is closed (by [`close`](Self::close)
    /// or because the key was deleted) and every queued value has been read.
    pub async fn recv(&mut self) -> Option<V> {
        self.rx.recv().await
    }

    /// Receives the next value if one is ready, without waiting.
    pub fn try_recv(&mut self) -> Option<V> {
        self.rx.try_recv().ok()
    }

    /// Returns true once the subscription will deliver nothing new.
    ///
    /// That is the case right after [`close`](Self::close) (on this handle or
    /// any of its closers), and after a key deletion once the delivery
    /// pipe has shut. Values already queued may still be read.
    pub fn is_closed(&self) -> bool {
        self.closer.is_closed() || self.rx.is_closed()
    }

    /// Unsubscribes from the key.
    ///
    /// Safe to call repeatedly and concurrently; only the first call has an effect.
    pub async fn close(&self) {
        self.closer.close().await;
    }

    /// Returns a cloneable handle that can close this subscription from another task.
    pub fn closer(&self) -> SubscriptionCloser<V> {
        self.closer.clone()
    }
}

/// Detached close handle for a [`Subscription`].
///
/// Shares the exactly-once close flag with the subscription it came from, so
/// closing through any handle unsubscribes once.
pub struct SubscriptionCloser<V> {
    id: SubscriptionId,
    topic: Arc<Topic<V>>,
    closed: Arc<AtomicBool>,
}

impl<V: StoreValue> SubscriptionCloser<V> {
    /// Returns the identity of the subscription this handle closes.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Returns true once the subscription has been closed through any handle.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Unsubscribes from the key. The reader sees queued values, then `None`.
    pub async fn close(&self) {
        if self
            .closed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            self.topic.unsubscribe(self.id).await;
        }
    }
}

impl<V> Clone for SubscriptionCloser<V> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            topic: Arc::clone(&self.topic),
            closed: Arc::clone(&self.closed),
        }
    }
}

impl<V> fmt::Debug for SubscriptionCloser<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionCloser")
            .field("id", &self.id)
            .field("closed", &self.closed.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl<V: StoreValue> Stream for Subscription<V> {
    type Item = V;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<V>> {
        self.get_mut().rx.poll_recv(cx)
    }
}

impl<V> fmt::Debug for Subscription<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.closer.id)
            .field("closed", &self.closer.closed.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use futures::StreamExt;
    use tokio::time::timeout;

    use crate::core::StoreConfig;

    const WAIT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn close_is_idempotent() {
        let topic = Arc::new(Topic::<u8>::new("k", &StoreConfig::default()));
        let mut sub = topic.subscribe().await;

        sub.close().await;
        sub.close().await;
        assert!(sub.is_closed());
        assert_eq!(topic.subscriber_count().await, 0);
        assert_eq!(timeout(WAIT, sub.recv()).await.unwrap(), None);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_close_unsubscribes_once() {
        let topic = Arc::new(Topic::<u8>::new("k", &StoreConfig::default()));
        let sub = Arc::new(topic.subscribe().await);
        let other = topic.subscribe().await;

        let mut joins = Vec::new();
        for _ in 0..16 {
            let sub = Arc::clone(&sub);
            joins.push(tokio::spawn(async move { sub.close().await }));
        }
        for j in joins {
            j.await.unwrap();
        }

        assert_eq!(topic.subscriber_count().await, 1);
        drop(other);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn closer_ends_a_reader_parked_in_recv() {
        let topic = Arc::new(Topic::<u8>::new("k", &StoreConfig::default()));
        let mut sub = topic.subscribe().await;
        let closer = sub.closer();

        let reader = tokio::spawn(async move {
            let mut seen = Vec::new();
            while let Some(v) = sub.recv().await {
                seen.push(v);
            }
            (seen, sub.is_closed())
        });

        topic.notify(1).await;
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!reader.is_finished());

        timeout(WAIT, closer.close()).await.unwrap();
        assert!(closer.is_closed());
        assert_eq!(topic.subscriber_count().await, 0);

        let (seen, closed) = timeout(WAIT, reader).await.unwrap().unwrap();
        assert_eq!(seen, vec![1]);
        assert!(closed);
    }

    #[tokio::test]
    async fn closer_shares_the_close_flag() {
        let topic = Arc::new(Topic::<u8>::new("k", &StoreConfig::default()));
        let sub = topic.subscribe().await;
        let closer = sub.closer();
        assert_eq!(closer.id(), sub.id());

        sub.close().await;
        assert!(closer.is_closed());
        // second close through the other handle is a no-op
        closer.close().await;
        assert_eq!(topic.subscriber_count().await, 0);
    }

    #[tokio::test]
    async fn is_closed_after_shutdown_drains() {
        let topic = Arc::new(Topic::<u8>::new("k", &StoreConfig::default()));
        let mut sub = topic.subscribe().await;
        assert!(!sub.is_closed());

        topic.shutdown().await;
        assert_eq!(timeout(WAIT, sub.recv()).await.unwrap(), None);
        assert!(sub.is_closed());
    }

    #[tokio::test]
    async fn works_as_a_stream() {
        let topic = Arc::new(Topic::<u8>::new("k", &StoreConfig::default()));
        let sub = topic.subscribe().await;
        for v in [1, 2, 3] {
            topic.notify(v).await;
        }
        topic.shutdown().await;

        let seen: Vec<u8> = timeout(WAIT, sub.collect()).await.unwrap();
        assert_eq!(seen, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn id_displays_topic_and_slot() {
        let topic = Arc::new(Topic::<u8>::new("k", &StoreConfig::default()));
        let sub = topic.subscribe().await;
        assert_eq!(sub.id().to_string(), format!("{}:0.0", sub.id().topic()));
        assert_eq!(sub.key(), "k");
    }
}
