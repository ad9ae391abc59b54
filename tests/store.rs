use std::sync::{Arc, Mutex};
use std::time::Duration;

use statehub::{
    ActionContext, ActionError, Backpressure, HandlerFn, Store, StoreConfig, Subscription,
};
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(5);

/// Reads up to `n` values, stopping early if the subscription closes.
async fn take(sub: &mut Subscription<i64>, n: usize) -> Vec<i64> {
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        match timeout(WAIT, sub.recv()).await {
            Ok(Some(v)) => out.push(v),
            Ok(None) => break,
            Err(_) => panic!("timed out waiting for value #{}", out.len() + 1),
        }
    }
    out
}

async fn assert_closed(sub: &mut Subscription<i64>) {
    assert_eq!(timeout(WAIT, sub.recv()).await.expect("closure not observed"), None);
}

/// Store with a "test" action that writes its first argument to "value".
async fn store_with_setter() -> Store<i64> {
    let store: Store<i64> = Store::new();
    store
        .on(
            "test",
            HandlerFn::arc(|ctx: ActionContext<i64>| async move {
                ctx.put("value", *ctx.arg(0)?).await;
                Ok::<_, ActionError>(())
            }),
        )
        .await;
    store
}

#[tokio::test]
async fn get_put() {
    let store: Store<i64> = Store::new();
    store
        .on(
            "test",
            HandlerFn::arc(|ctx: ActionContext<i64>| async move {
                ctx.put("value", 123).await;
                Ok::<_, ActionError>(())
            }),
        )
        .await;

    assert!(!store.has("value").await);
    assert_eq!(store.get("value").await, None);

    store.dispatch("test", []).await;

    assert!(store.has("value").await);
    assert_eq!(store.get("value").await, Some(123));
}

#[tokio::test]
async fn observe_sees_dispatched_args_in_order() {
    let store = store_with_setter().await;
    let mut sub = store.observe("value").await;

    for v in [111, 222, 333] {
        store.dispatch("test", [v]).await;
    }

    assert_eq!(take(&mut sub, 3).await, vec![111, 222, 333]);
}

#[tokio::test]
async fn multiple_observers_and_derived_keys() {
    let store: Store<i64> = Store::new();
    store
        .on(
            "test",
            HandlerFn::arc(|ctx: ActionContext<i64>| async move {
                let v = *ctx.arg(0)?;
                ctx.put("value", v).await;
                ctx.put("value2", v * 2).await;
                Ok::<_, ActionError>(())
            }),
        )
        .await;

    let mut a = store.observe("value").await;
    let mut b = store.observe("value").await;
    let mut doubled = store.observe("value2").await;

    for v in [111, 222, 333] {
        store.dispatch("test", [v]).await;
    }

    assert_eq!(take(&mut a, 3).await, vec![111, 222, 333]);
    assert_eq!(take(&mut b, 3).await, vec![111, 222, 333]);
    assert_eq!(take(&mut doubled, 3).await, vec![222, 444, 666]);
}

#[tokio::test]
async fn closing_one_subscriber_leaves_others_running() {
    let store = store_with_setter().await;
    let mut a = store.observe("value").await;
    let mut b = store.observe("value").await;

    store.dispatch("test", [111]).await;
    store.dispatch("test", [222]).await;

    a.close().await;

    store.dispatch("test", [333]).await;
    store.dispatch("test", [444]).await;

    assert_eq!(take(&mut a, 4).await, vec![111, 222]);
    assert_closed(&mut a).await;
    assert_eq!(take(&mut b, 4).await, vec![111, 222, 333, 444]);
}

#[tokio::test]
async fn deleting_a_key_closes_its_subscribers() {
    let store = store_with_setter().await;
    store
        .on(
            "deleteValue",
            HandlerFn::arc(|ctx: ActionContext<i64>| async move {
                ctx.delete("value").await;
                Ok::<_, ActionError>(())
            }),
        )
        .await;

    let mut a = store.observe("value").await;
    let mut b = store.observe("value").await;
    let mut other = store.observe("other").await;

    store.dispatch("test", [111]).await;
    store.dispatch("test", [222]).await;
    store.dispatch("deleteValue", []).await;

    // closing after the topic is gone is a no-op
    a.close().await;

    assert_eq!(take(&mut a, 4).await, vec![111, 222]);
    assert_eq!(take(&mut b, 4).await, vec![111, 222]);
    assert!(!store.has("value").await);

    // unrelated keys keep their subscribers
    assert_eq!(store.subscriber_count("other").await, 1);
    assert_eq!(other.try_recv(), None);
}

#[tokio::test]
async fn unregistered_action_has_no_effect() {
    let failures = Arc::new(Mutex::new(0usize));
    let seen = Arc::clone(&failures);
    let store: Store<i64> = Store::builder(StoreConfig::default())
        .with_error_sink(Arc::new(move |_: &str, _: &ActionError| {
            *seen.lock().unwrap() += 1;
        }))
        .build();
    let mut sub = store.observe("value").await;

    store.dispatch("missing", [1]).await;

    assert!(store.keys().await.is_empty());
    assert_eq!(*failures.lock().unwrap(), 0);
    tokio::task::yield_now().await;
    assert_eq!(sub.try_recv(), None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_first_observe_shares_one_topic() {
    let store = store_with_setter().await;

    let mut joins = Vec::new();
    for _ in 0..32 {
        let store = store.clone();
        joins.push(tokio::spawn(async move { store.observe("value").await }));
    }
    let mut subs = Vec::new();
    for j in joins {
        subs.push(j.await.unwrap());
    }

    assert_eq!(store.topic_count().await, 1);
    assert_eq!(store.subscriber_count("value").await, 32);

    store.dispatch("test", [7]).await;
    for sub in &mut subs {
        assert_eq!(take(sub, 1).await, vec![7]);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn stalled_consumer_blocks_dispatch_by_default() {
    let store: Store<i64> = Store::builder(StoreConfig {
        relay_capacity: 1,
        ..StoreConfig::default()
    })
    .build();
    store
        .on(
            "test",
            HandlerFn::arc(|ctx: ActionContext<i64>| async move {
                ctx.put("value", *ctx.arg(0)?).await;
                Ok::<_, ActionError>(())
            }),
        )
        .await;
    let mut sub = store.observe("value").await;

    let writer = {
        let store = store.clone();
        tokio::spawn(async move {
            for v in 0..10 {
                store.dispatch("test", [v]).await;
            }
        })
    };

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!writer.is_finished(), "writer should wait for the consumer");

    assert_eq!(take(&mut sub, 10).await, (0..10).collect::<Vec<_>>());
    timeout(WAIT, writer).await.unwrap().unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn drop_newest_keeps_writers_moving() {
    let store: Store<i64> = Store::builder(StoreConfig {
        relay_capacity: 1,
        backpressure: Backpressure::DropNewest,
    })
    .build();
    store
        .on(
            "test",
            HandlerFn::arc(|ctx: ActionContext<i64>| async move {
                ctx.put("value", *ctx.arg(0)?).await;
                Ok::<_, ActionError>(())
            }),
        )
        .await;
    let _stalled = store.observe("value").await;

    timeout(WAIT, async {
        for v in 0..100 {
            store.dispatch("test", [v]).await;
        }
    })
    .await
    .expect("dispatch stalled under DropNewest");

    assert_eq!(store.get("value").await, Some(99));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn closing_from_another_task_ends_the_reader() {
    let store = store_with_setter().await;
    let mut sub = store.observe("value").await;
    let closer = sub.closer();

    let reader = tokio::spawn(async move {
        let mut seen = Vec::new();
        while let Some(v) = sub.recv().await {
            seen.push(v);
        }
        seen
    });

    store.dispatch("test", [111]).await;
    store.dispatch("test", [222]).await;
    timeout(WAIT, closer.close()).await.expect("close stalled");
    store.dispatch("test", [333]).await;

    let seen = timeout(WAIT, reader).await.expect("reader never saw closure").unwrap();
    assert_eq!(seen, vec![111, 222]);
    assert_eq!(store.subscriber_count("value").await, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn observe_dispatch_close_race_leaves_no_subscribers() {
    let store: Store<i64> = Store::builder(StoreConfig {
        relay_capacity: 4,
        backpressure: Backpressure::DropNewest,
    })
    .build();
    store
        .on(
            "test",
            HandlerFn::arc(|ctx: ActionContext<i64>| async move {
                ctx.put("value", *ctx.arg(0)?).await;
                Ok::<_, ActionError>(())
            }),
        )
        .await;

    let mut joins = Vec::new();
    for task in 0..8i64 {
        let store = store.clone();
        joins.push(tokio::spawn(async move {
            for round in 0..200i64 {
                let sub = store.observe("value").await;
                store.dispatch("test", [task * 1_000 + round]).await;
                sub.close().await;
            }
        }));
    }
    for j in joins {
        timeout(WAIT, j).await.expect("stress task stalled").unwrap();
    }

    assert_eq!(store.subscriber_count("value").await, 0);
    assert_eq!(store.topic_count().await, 1);
    assert!(store.has("value").await);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn blocking_writers_and_draining_readers_race_cleanly() {
    let store = store_with_setter().await;

    let mut joins = Vec::new();
    for task in 0..8i64 {
        let store = store.clone();
        joins.push(tokio::spawn(async move {
            for round in 0..50i64 {
                let mut sub = store.observe("value").await;
                let closer = sub.closer();
                let drain = tokio::spawn(async move { while sub.recv().await.is_some() {} });
                store.dispatch("test", [task * 1_000 + round]).await;
                closer.close().await;
                drain.await.unwrap();
            }
        }));
    }
    for j in joins {
        timeout(WAIT, j).await.expect("stress task stalled").unwrap();
    }

    assert_eq!(store.subscriber_count("value").await, 0);
}
