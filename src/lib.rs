//! # statehub
//!
//! **statehub** is an in-process application-state container for tokio
//! programs: a concurrency-safe key/value store whose keys can be observed,
//! mutated only through named actions.
//!
//! Think of it as an in-process message broker that keeps the last value of
//! every topic.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   dispatch("deposit", [50])                       observe("balance")
//!            │                                              │
//!            ▼                                              ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Store                                                            │
//! │  - handlers: action → Handler      (GuardedMap)                   │
//! │  - values:   key    → V            (GuardedMap)                   │
//! │  - topics:   key    → Topic        (GuardedMap, created lazily)   │
//! │  - sink:     ErrorSink             (handler failures)             │
//! └──────┬─────────────────────────────────────────────┬──────────────┘
//!        ▼                                             │
//!   Handler(ActionContext { args, store })             │
//!        │  ctx.put("balance", v)                      │
//!        ├──► values["balance"] = v                    │
//!        └──► Topic("balance").notify(v) ◄─────────────┘
//!                   │ (subscribe order)
//!        ┌──────────┼──────────┐
//!        ▼          ▼          ▼
//!    [relay 1]  [relay 2]  [relay N]      bounded, StoreConfig::relay_capacity
//!        │          │          │
//!    forwarder  forwarder  forwarder      one task per subscription
//!        ▼          ▼          ▼
//!   sub1.recv() sub2.recv() subN.recv()
//! ```
//!
//! ### Lifecycle
//! ```text
//! observe(key) ──► Topic::subscribe ──► Subscription (Open)
//!
//!   put(key, v)      ─► delivered in write order
//!   sub.close()      ─► Closed: queued values drain, then recv() → None
//!   delete(key)      ─► every subscription on key closed the same way
//! ```
//!
//! ## Features
//! | Area              | Description                                                 | Key types / traits                      |
//! |-------------------|-------------------------------------------------------------|-----------------------------------------|
//! | **Store**         | Values, per-key subscriptions, action dispatch.             | [`Store`], [`StoreBuilder`]             |
//! | **Actions**       | The only write path; per-dispatch arguments.                | [`Handler`], [`HandlerFn`], [`ActionContext`] |
//! | **Subscriptions** | Ordered, lossless (by default) delivery per consumer.       | [`Subscription`]                        |
//! | **Policies**      | What a write does when a consumer falls behind.             | [`Backpressure`]                        |
//! | **Errors**        | Handler failures routed to an injectable sink.              | [`ActionError`], [`ErrorSink`], [`LogWriter`] |
//! | **Configuration** | Relay capacity and backpressure.                            | [`StoreConfig`]                         |
//!
//! ## Example
//! ```rust
//! use statehub::{ActionContext, ActionError, HandlerFn, Store};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let store: Store<i64> = Store::new();
//!
//!     store
//!         .on("deposit", HandlerFn::arc(|ctx: ActionContext<i64>| async move {
//!             let amount = *ctx.arg(0)?;
//!             if amount <= 0 {
//!                 return Err(ActionError::fail("deposit must be positive"));
//!             }
//!             let balance = ctx.get("balance").await.unwrap_or(0);
//!             ctx.put("balance", balance + amount).await;
//!             Ok(())
//!         }))
//!         .await;
//!
//!     let mut balance = store.observe("balance").await;
//!
//!     store.dispatch("deposit", [50]).await;
//!     store.dispatch("deposit", [-1]).await; // logged by the default sink, no effect
//!     store.dispatch("deposit", [25]).await;
//!
//!     assert_eq!(balance.recv().await, Some(50));
//!     assert_eq!(balance.recv().await, Some(75));
//! }
//! ```
mod actions;
mod core;
mod error;
mod policies;
mod sinks;
mod topics;

// ---- Public re-exports ----

pub use actions::{ActionContext, Handler, HandlerFn, HandlerRef};
pub use crate::core::{DEFAULT_RELAY_CAPACITY, Store, StoreBuilder, StoreConfig, StoreValue};
pub use error::ActionError;
pub use policies::Backpressure;
pub use sinks::{ErrorSink, LogWriter};
pub use topics::{Subscription, SubscriptionCloser, SubscriptionId};
