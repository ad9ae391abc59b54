//! # Error sink trait.
//!
//! Provides [`ErrorSink`], the extension point that receives handler failures.
//! [`Store::dispatch`](crate::Store::dispatch) never returns a handler's error to
//! its caller; it hands `(action, error)` to the sink configured on the store.
//!
//! ## Rules
//! - Called synchronously on the dispatching task, right after the handler returns.
//! - Keep it cheap: forward to a log, a counter or a channel.
//! - Any `Fn(&str, &ActionError)` closure is a sink.
//!
//! ## Example
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use statehub::{ActionError, ErrorSink, Store};
//!
//! let failures = Arc::new(Mutex::new(Vec::new()));
//! let seen = Arc::clone(&failures);
//! let sink = move |action: &str, err: &ActionError| {
//!     seen.lock().unwrap().push((action.to_string(), err.as_label()));
//! };
//!
//! let store: Store<i64> = Store::builder(Default::default())
//!     .with_error_sink(Arc::new(sink))
//!     .build();
//! # drop(store);
//! ```

use crate::error::ActionError;

/// Receiver of handler failures.
pub trait ErrorSink: Send + Sync + 'static {
    /// Handles one failed dispatch.
    fn on_error(&self, action: &str, error: &ActionError);

    /// Returns the sink name used in logs.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose; override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl<F> ErrorSink for F
where
    F: Fn(&str, &ActionError) + Send + Sync + 'static,
{
    fn on_error(&self, action: &str, error: &ActionError) {
        self(action, error)
    }

    fn name(&self) -> &'static str {
        "closure"
    }
}
