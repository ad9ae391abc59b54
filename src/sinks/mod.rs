//! # Error sinks for failed dispatches.
//!
//! ```text
//! Store::dispatch(action, args)
//!     └─► handler(ctx) ── Err(e) / panic ──► ErrorSink::on_error(action, &e)
//!                                                 │
//!                                      ┌──────────┼──────────┐
//!                                      ▼          ▼          ▼
//!                                  LogWriter   closure    custom
//! ```

mod log;
mod sink;

pub use log::LogWriter;
pub use sink::ErrorSink;
