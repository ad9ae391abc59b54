//! # Logging error sink.
//!
//! [`LogWriter`] reports handler failures through `tracing`. It is the sink a
//! store uses unless another one is supplied to the builder.
//!
//! ## Output format
//! With a `tracing_subscriber::fmt` subscriber installed:
//! ```text
//! ERROR statehub: dispatch failed action="transfer" label="action_failed" error="error: insufficient funds"
//! ```

use tracing::error;

use crate::error::ActionError;
use crate::sinks::ErrorSink;

/// `tracing`-backed error sink.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogWriter;

impl ErrorSink for LogWriter {
    fn on_error(&self, action: &str, err: &ActionError) {
        error!(
            target: "statehub",
            action,
            label = err.as_label(),
            error = %err.as_message(),
            "dispatch failed"
        );
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
