//! # Function-backed handler (`HandlerFn`)
//!
//! [`HandlerFn`] wraps a closure `F: Fn(ActionContext<V>) -> Fut`, producing a
//! fresh future per dispatch. Shared state the closure needs goes in an
//! explicit `Arc<...>` captured by the closure.
//!
//! ## Example
//! ```rust
//! use statehub::{ActionContext, ActionError, HandlerFn, HandlerRef};
//!
//! let h: HandlerRef<String> = HandlerFn::arc(|ctx: ActionContext<String>| async move {
//!     let name = ctx.arg(0)?.clone();
//!     ctx.put("greeting", format!("hello, {name}")).await;
//!     Ok::<_, ActionError>(())
//! });
//! # drop(h);
//! ```

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::actions::{ActionContext, Handler};
use crate::core::StoreValue;
use crate::error::ActionError;

/// Function-backed handler implementation.
#[derive(Debug)]
pub struct HandlerFn<F> {
    f: F,
}

impl<F> HandlerFn<F> {
    /// Creates a new function-backed handler.
    ///
    /// Prefer [`HandlerFn::arc`] when you immediately need a [`HandlerRef`](crate::HandlerRef).
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the handler and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

#[async_trait]
impl<V, F, Fut> Handler<V> for HandlerFn<F>
where
    V: StoreValue,
    F: Fn(ActionContext<V>) -> Fut + Send + Sync + 'static, // Fn, not FnMut
    Fut: Future<Output = Result<(), ActionError>> + Send + 'static,
{
    async fn handle(&self, ctx: ActionContext<V>) -> Result<(), ActionError> {
        (self.f)(ctx).await
    }
}
