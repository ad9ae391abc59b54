//! # Example: basic_store
//!
//! A counter kept in a [`Store`], changed only through named actions and
//! watched by a subscriber running in its own task.
//!
//! Demonstrates how to:
//! - Register handlers with [`HandlerFn`].
//! - Observe a key and read it from a spawned task.
//! - Close the subscription from the main task through a [`SubscriptionCloser`].
//! - Route handler failures to a custom error sink.
//!
//! ## Flow
//! ```text
//! dispatch("add", [n])
//!     └─► handler ──► ctx.put("count", v) ──► Topic::notify(v)
//!                                                 └─► watcher task: recv() → print
//! dispatch("reset", [])
//!     └─► handler ──► ctx.delete("count") ──► Topic::shutdown()
//!                                                 └─► watcher task: recv() → None
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example basic_store
//! ```

use std::sync::Arc;

use statehub::{ActionContext, ActionError, HandlerFn, Store, StoreConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // 1. Build a store whose failures print instead of going to tracing
    let store: Store<i64> = Store::builder(StoreConfig::default())
        .with_error_sink(Arc::new(|action: &str, err: &ActionError| {
            println!("[sink] action={action} {}: {}", err.as_label(), err.as_message());
        }))
        .build();

    // 2. Register actions
    store
        .on(
            "add",
            HandlerFn::arc(|ctx: ActionContext<i64>| async move {
                let by = *ctx.arg(0)?;
                if by < 0 {
                    return Err(ActionError::fail("negative increment"));
                }
                let next = ctx.get("count").await.unwrap_or(0) + by;
                ctx.put("count", next).await;
                Ok::<_, ActionError>(())
            }),
        )
        .await;
    store
        .on(
            "reset",
            HandlerFn::arc(|ctx: ActionContext<i64>| async move {
                ctx.delete("count").await;
                Ok::<_, ActionError>(())
            }),
        )
        .await;
    println!("[main] actions: {:?}", store.actions().await);

    // 3. Watch the counter from another task
    let mut sub = store.observe("count").await;
    let watcher = tokio::spawn(async move {
        while let Some(v) = sub.recv().await {
            println!("[watch] count = {v}");
        }
        println!("[watch] closed");
    });

    // 4. Drive it
    store.dispatch("add", [1]).await;
    store.dispatch("add", [2]).await;
    store.dispatch("add", []).await; // missing argument, reported to the sink
    store.dispatch("add", [-5]).await; // rejected by the handler
    store.dispatch("unknown", [9]).await; // no handler, ignored
    store.dispatch("reset", []).await;

    let _ = watcher.await;
    println!("[main] count after reset: {:?}", store.get("count").await);

    // 5. A second watcher, closed from here while it waits
    let mut sub = store.observe("count").await;
    let closer = sub.closer();
    let watcher = tokio::spawn(async move {
        while let Some(v) = sub.recv().await {
            println!("[watch2] count = {v}");
        }
        println!("[watch2] closed");
    });

    store.dispatch("add", [10]).await;
    closer.close().await;
    store.dispatch("add", [10]).await; // not seen by watch2

    let _ = watcher.await;
    println!("[main] final count: {:?}", store.get("count").await);
}
