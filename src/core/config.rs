//! # Store configuration.
//!
//! Provides [`StoreConfig`] centralized settings for a [`Store`](crate::Store).
//!
//! ## Sentinel values
//! - `relay_capacity = 0` → clamped to 1 (a relay buffer always holds at least one value)

use crate::policies::Backpressure;

/// Default capacity of every subscriber's relay buffer.
pub const DEFAULT_RELAY_CAPACITY: usize = 16;

/// Configuration for a store instance.
///
/// ## Field semantics
/// - `relay_capacity`: Per-subscriber relay buffer size (min 1; clamped)
/// - `backpressure`: What `notify` does when a relay buffer is full
///
/// ## Notes
/// All fields are public. Prefer [`StoreConfig::relay_capacity_clamped`] over
/// reading `relay_capacity` directly.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Number of values a subscriber may have queued before backpressure applies.
    ///
    /// Values beyond this wait (or are dropped) according to `backpressure`.
    pub relay_capacity: usize,

    /// Policy for full relay buffers.
    pub backpressure: Backpressure,
}

impl StoreConfig {
    /// Returns the relay capacity clamped to a minimum of 1.
    #[inline]
    pub fn relay_capacity_clamped(&self) -> usize {
        self.relay_capacity.max(1)
    }
}

impl Default for StoreConfig {
    /// Default configuration:
    ///
    /// - `relay_capacity = 16`
    /// - `backpressure = Backpressure::Block` (lossless, writers wait for slow consumers)
    fn default() -> Self {
        Self {
            relay_capacity: DEFAULT_RELAY_CAPACITY,
            backpressure: Backpressure::default(),
        }
    }
}
