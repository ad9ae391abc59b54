//! # Named actions: the store's only write path.
//!
//! This module provides the action-related types:
//! - [`Handler`] - trait for implementing action logic
//! - [`HandlerFn`] - closure-backed handler implementation
//! - [`HandlerRef`] - shared reference to a handler (`Arc<dyn Handler<V>>`)
//! - [`ActionContext`] - per-dispatch arguments and write access
//!
//! ```text
//! Store::dispatch(action, args)
//!     ├─ no handler  ─► no-op
//!     └─ handler     ─► handler.handle(ActionContext { args, store })
//!                            ├─ ctx.put(k, v)  ─► values[k] = v ─► Topic(k).notify(v)
//!                            └─ ctx.delete(k)  ─► values.remove(k) ─► Topic(k).shutdown()
//! ```

mod context;
mod handler;
mod handler_fn;

pub use context::ActionContext;
pub use handler::{Handler, HandlerRef};
pub use handler_fn::HandlerFn;
