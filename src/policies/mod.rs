//! Delivery policies.
//!
//! ## Contents
//! - [`Backpressure`] what `notify` does when a subscriber's relay buffer is full
//!
//! ## Quick wiring
//! ```text
//! StoreConfig { relay_capacity, backpressure }
//!      └─► Topic::notify pushes each value into every relay buffer:
//!           - Block      → send().await
//!           - DropNewest → try_send()
//!           - Timeout(d) → send_timeout(d)
//! ```

mod backpressure;

pub use backpressure::Backpressure;
