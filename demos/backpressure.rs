//! # Example: backpressure
//!
//! Shows how each [`Backpressure`] policy treats a consumer that reads
//! slower than the writer produces.
//!
//! - `Block`: every value arrives; the writer runs at the reader's pace.
//! - `DropNewest`: the writer never waits; the reader misses values.
//! - `Timeout(d)`: the writer waits at most `d` per value, then drops it.
//!
//! ## Flow
//! ```text
//! writer ──dispatch──► put ──► [relay: 2] ──► forwarder ──► slow reader (20ms/value)
//!                               full? → policy decides
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example backpressure
//! ```

use std::time::{Duration, Instant};

use statehub::{ActionContext, ActionError, Backpressure, HandlerFn, Store, StoreConfig};

const VALUES: u32 = 20;

async fn run(policy: Backpressure) {
    // 1. Small relay buffer so the policy kicks in quickly
    let store: Store<u32> = Store::builder(StoreConfig {
        relay_capacity: 2,
        backpressure: policy,
    })
    .build();
    store
        .on(
            "tick",
            HandlerFn::arc(|ctx: ActionContext<u32>| async move {
                ctx.put("tick", *ctx.arg(0)?).await;
                Ok::<_, ActionError>(())
            }),
        )
        .await;

    // 2. Slow reader
    let mut sub = store.observe("tick").await;
    let closer = sub.closer();
    let reader = tokio::spawn(async move {
        let mut seen = 0u32;
        while sub.recv().await.is_some() {
            seen += 1;
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        seen
    });

    // 3. Fast writer
    let started = Instant::now();
    for v in 0..VALUES {
        store.dispatch("tick", [v]).await;
    }
    let wrote_in = started.elapsed();

    closer.close().await;
    let seen = reader.await.unwrap_or(0);
    let name = format!("{policy:?}");
    println!("{name:<16} writer took {wrote_in:.1?}, reader saw {seen}/{VALUES}");
}

#[tokio::main]
async fn main() {
    run(Backpressure::Block).await;
    run(Backpressure::DropNewest).await;
    run(Backpressure::Timeout(Duration::from_millis(5))).await;
}
