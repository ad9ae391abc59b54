//! # Per-key fan-out of stored values.
//!
//! A [`Topic`] owns the ordered list of live subscriptions for one key and
//! pushes every new value into each subscriber's relay buffer.
//!
//! ## Architecture
//! ```text
//! Store::put(key, v)
//!     │
//!     ▼
//! Topic::notify(v)  (shared lock, head → tail)
//!     ├──► [relay 1] ──► forwarder 1 ──► [delivery 1] ──► Subscription::recv()
//!     │    (bounded)
//!     ├──► [relay 2] ──► forwarder 2 ──► [delivery 2] ──► Subscription::recv()
//!     └──► [relay N] ──► forwarder N ──► [delivery N] ──► Subscription::recv()
//! ```
//!
//! ## Rules
//! - **Per-subscriber FIFO**: each subscriber sees values in `put` order
//! - **Fan-out order**: within one `notify`, oldest subscriber is served first
//! - **Backpressure**: a full relay buffer is handled per [`Backpressure`]
//! - **Teardown**: removing a slot drops its relay sender; the forwarder drains
//!   what was already queued and then closes the delivery channel
//! - **Abandonment**: a consumer dropping its handle stops the forwarder at
//!   once, and the forwarder removes its own slot
//!
//! Subscribe/unsubscribe/shutdown take the exclusive lock; `notify` takes the
//! shared lock for its whole traversal.

use std::sync::{Arc, Weak};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use tokio::sync::{RwLock, mpsc};
use tracing::{debug, warn};

use crate::core::{StoreConfig, StoreValue};
use crate::policies::Backpressure;
use crate::topics::list::{SlotKey, SubscriberList};
use crate::topics::subscription::{Subscription, SubscriptionId};

/// Global counter giving every topic a distinct identity.
static TOPIC_SEQ: AtomicU64 = AtomicU64::new(1);

/// Capacity of the delivery channel between a forwarder and its consumer.
const DELIVERY_CAPACITY: usize = 1;

/// Ordered set of live subscriptions for a single key.
pub(crate) struct Topic<V> {
    id: u64,
    key: String,
    relay_capacity: usize,
    backpressure: Backpressure,
    subs: RwLock<SubscriberList<mpsc::Sender<V>>>,
}

impl<V: StoreValue> Topic<V> {
    /// Creates an empty topic for `key`.
    pub(crate) fn new(key: &str, cfg: &StoreConfig) -> Self {
        Self {
            id: TOPIC_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            key: key.to_string(),
            relay_capacity: cfg.relay_capacity_clamped(),
            backpressure: cfg.backpressure,
            subs: RwLock::new(SubscriberList::new()),
        }
    }

    pub(crate) fn key(&self) -> &str {
        &self.key
    }

    /// Appends a new subscription at the tail and starts its forwarder.
    pub(crate) async fn subscribe(self: &Arc<Self>) -> Subscription<V> {
        let (relay_tx, relay_rx) = mpsc::channel::<V>(self.relay_capacity);
        let (delivery_tx, delivery_rx) = mpsc::channel::<V>(DELIVERY_CAPACITY);

        let id = {
            let mut subs = self.subs.write().await;
            let id = SubscriptionId::new(self.id, subs.push_back(relay_tx));
            tokio::spawn(forward(Arc::downgrade(self), id, relay_rx, delivery_tx));
            id
        };

        debug!(key = %self.key, sub = %id, "subscribed");
        Subscription::new(id, Arc::clone(self), delivery_rx)
    }

    /// Removes the subscription behind `id`, closing its relay buffer.
    ///
    /// Returns `false` if `id` belongs to another topic or was already removed.
    pub(crate) async fn unsubscribe(&self, id: SubscriptionId) -> bool {
        if id.topic() != self.id {
            return false;
        }

        let removed = self.subs.write().await.remove(id.slot()).is_some();
        if removed {
            debug!(key = %self.key, sub = %id, "unsubscribed");
        }
        removed
    }

    /// Pushes `value` into every live relay buffer, oldest subscriber first.
    ///
    /// Slots whose forwarder has gone away but not yet unsubscribed are pruned
    /// once the traversal finishes.
    pub(crate) async fn notify(&self, value: V) {
        let mut dead: Vec<SlotKey> = Vec::new();

        {
            let subs = self.subs.read().await;
            for (slot, tx) in subs.iter() {
                match self.push(tx, value.clone()).await {
                    Push::Sent => {}
                    Push::Dropped(reason) => {
                        let id = SubscriptionId::new(self.id, slot);
                        warn!(key = %self.key, sub = %id, reason, "value dropped for subscriber");
                    }
                    Push::Closed => dead.push(slot),
                }
            }
        }

        if !dead.is_empty() {
            let mut subs = self.subs.write().await;
            for slot in dead {
                if subs.remove(slot).is_some() {
                    let id = SubscriptionId::new(self.id, slot);
                    debug!(key = %self.key, sub = %id, "pruned abandoned subscription");
                }
            }
        }
    }

    /// Closes every live subscription and empties the list.
    ///
    /// Returns the number of subscriptions closed.
    pub(crate) async fn shutdown(&self) -> usize {
        let closed = self.subs.write().await.drain();
        let n = closed.len();
        drop(closed);
        debug!(key = %self.key, closed = n, "topic shut down");
        n
    }

    /// Returns the number of live subscriptions.
    pub(crate) async fn subscriber_count(&self) -> usize {
        self.subs.read().await.len()
    }

    async fn push(&self, tx: &mpsc::Sender<V>, value: V) -> Push {
        match self.backpressure {
            Backpressure::Block => match tx.send(value).await {
                Ok(()) => Push::Sent,
                Err(_) => Push::Closed,
            },
            Backpressure::DropNewest => match tx.try_send(value) {
                Ok(()) => Push::Sent,
                Err(mpsc::error::TrySendError::Full(_)) => Push::Dropped("full"),
                Err(mpsc::error::TrySendError::Closed(_)) => Push::Closed,
            },
            Backpressure::Timeout(limit) => match tx.send_timeout(value, limit).await {
                Ok(()) => Push::Sent,
                Err(mpsc::error::SendTimeoutError::Timeout(_)) => Push::Dropped("timeout"),
                Err(mpsc::error::SendTimeoutError::Closed(_)) => Push::Closed,
            },
        }
    }
}

/// Outcome of pushing one value into one relay buffer.
enum Push {
    Sent,
    Dropped(&'static str),
    Closed,
}

/// Drains a relay buffer into the consumer-facing delivery channel.
///
/// Ends when the relay is closed and empty, or as soon as the consumer drops
/// its handle. Dropping `delivery` on exit is what the consumer observes as
/// closure. A forwarder whose consumer left removes its own slot.
async fn forward<V: StoreValue>(
    topic: Weak<Topic<V>>,
    id: SubscriptionId,
    mut relay: mpsc::Receiver<V>,
    delivery: mpsc::Sender<V>,
) {
    loop {
        tokio::select! {
            next = relay.recv() => {
                let Some(v) = next else { return };
                if delivery.send(v).await.is_err() {
                    break;
                }
            }
            _ = delivery.closed() => break,
        }
    }

    // release a writer blocked on this relay before taking the list lock
    drop(relay);
    if let Some(topic) = topic.upgrade() {
        if topic.unsubscribe(id).await {
            debug!(key = %topic.key, sub = %id, "released abandoned subscription");
        }
    }
}
