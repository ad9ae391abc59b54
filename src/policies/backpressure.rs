//! # Backpressure policies for subscriber relay buffers.
//!
//! [`Backpressure`] decides what `notify` does when a subscriber's relay
//! buffer is full.
//!
//! - [`Backpressure::Block`] waits for room (default).
//! - [`Backpressure::DropNewest`] drops the value for that subscriber only.
//! - [`Backpressure::Timeout`] waits up to a bound, then drops.
//!
//! ## Choosing the right policy
//!
//! **Lossless delivery** (every subscriber sees every write):
//! ```text
//! Backpressure::Block           → a stalled consumer stalls put/dispatch on that key
//! ```
//!
//! **Writers must never stall**:
//! ```text
//! Backpressure::DropNewest      → slow consumers miss values, writers keep going
//! ```
//!
//! **Bounded stall**:
//! ```text
//! Backpressure::Timeout(dur)    → wait at most `dur` per subscriber, then drop
//! ```
//!
//! Under `Block`, `notify` holds the topic's shared lock while waiting, so a
//! stalled consumer also delays subscribe/unsubscribe on the same key.

use std::time::Duration;

/// Policy applied when pushing a value into a full relay buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backpressure {
    /// Wait until the subscriber's buffer has room (default).
    Block,
    /// Drop the value for the full subscriber; others are unaffected.
    DropNewest,
    /// Wait up to the given duration, then drop the value for that subscriber.
    Timeout(Duration),
}

impl Backpressure {
    /// Returns `true` if this policy can lose values.
    #[inline]
    pub fn is_lossy(&self) -> bool {
        !matches!(self, Backpressure::Block)
    }
}

impl Default for Backpressure {
    /// Returns [`Backpressure::Block`].
    fn default() -> Self {
        Backpressure::Block
    }
}
