//! Per-key publish/subscribe.
//!
//! ## Contents
//! - [`Topic`] ordered set of live subscriptions for one key, with fan-out
//! - [`Subscription`] one consumer's delivery pipe (relay buffer + forwarder)
//! - [`SubscriberList`](list::SubscriberList) slab-backed, insertion-ordered list used by `Topic`
//!
//! Topics are created lazily by `Store::observe` and live as long as the store.

mod list;
mod subscription;
mod topic;

pub use subscription::{Subscription, SubscriptionCloser, SubscriptionId};
pub(crate) use topic::Topic;
