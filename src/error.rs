//! Error types raised by action handlers.
//!
//! The store itself never fails: reads of absent keys yield `None`, deletes of
//! absent keys are no-ops and dispatching an unknown action does nothing.
//! The only error source is handler execution, described by [`ActionError`].
//!
//! [`ActionError`] provides helper methods (`as_label`, `as_message`) for
//! logging, mirroring what the default [`LogWriter`](crate::LogWriter) sink emits.

use thiserror::Error;

/// # Errors produced while running an action handler.
///
/// A handler error is never returned to the caller of
/// [`Store::dispatch`](crate::Store::dispatch); it is routed to the store's
/// [`ErrorSink`](crate::ErrorSink) instead. Writes made by the handler before
/// failing stay in effect.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// The handler asked for a positional argument that was not passed.
    #[error("argument {index} out of range (dispatched with {len} args)")]
    ArgOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of arguments passed to `dispatch`.
        len: usize,
    },

    /// The handler reported a failure.
    #[error("action failed: {error}")]
    Failed {
        /// The underlying error message.
        error: String,
    },

    /// The handler panicked; the panic was caught by the dispatcher.
    #[error("handler panicked: {info}")]
    Panicked {
        /// Panic payload rendered as text.
        info: String,
    },
}

impl ActionError {
    /// Shorthand for [`ActionError::Failed`].
    ///
    /// # Example
    /// ```
    /// use statehub::ActionError;
    ///
    /// let err = ActionError::fail("quota exceeded");
    /// assert_eq!(err.to_string(), "action failed: quota exceeded");
    /// ```
    pub fn fail(error: impl Into<String>) -> Self {
        ActionError::Failed {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use statehub::ActionError;
    ///
    /// let err = ActionError::ArgOutOfRange { index: 2, len: 1 };
    /// assert_eq!(err.as_label(), "action_arg_out_of_range");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ActionError::ArgOutOfRange { .. } => "action_arg_out_of_range",
            ActionError::Failed { .. } => "action_failed",
            ActionError::Panicked { .. } => "action_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ActionError::ArgOutOfRange { index, len } => {
                format!("arg index {index} out of range; len={len}")
            }
            ActionError::Failed { error } => format!("error: {error}"),
            ActionError::Panicked { info } => format!("panic: {info}"),
        }
    }
}
