//! # Action handler abstraction.
//!
//! A [`Handler`] is the application logic bound to an action name with
//! [`Store::on`](crate::Store::on). It receives an owned [`ActionContext`] for
//! exactly one invocation and may read and write store state through it.
//! The common handle type is [`HandlerRef`], an `Arc<dyn Handler<V>>`.

use std::sync::Arc;

use async_trait::async_trait;

use crate::actions::ActionContext;
use crate::error::ActionError;

/// Shared handle to a handler.
pub type HandlerRef<V> = Arc<dyn Handler<V>>;

/// # Logic run for one dispatched action.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use statehub::{ActionContext, ActionError, Handler};
///
/// struct Increment;
///
/// #[async_trait]
/// impl Handler<i64> for Increment {
///     async fn handle(&self, ctx: ActionContext<i64>) -> Result<(), ActionError> {
///         let step = *ctx.arg(0)?;
///         let current = ctx.get("counter").await.unwrap_or(0);
///         ctx.put("counter", current + step).await;
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Handler<V>: Send + Sync + 'static {
    /// Runs the action.
    ///
    /// An `Err` is routed to the store's error sink. Writes made before the
    /// error stay in effect.
    async fn handle(&self, ctx: ActionContext<V>) -> Result<(), ActionError>;
}
