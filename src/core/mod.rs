//! Store core: configuration, guarded maps and the store itself.
//!
//! The public API from this module is [`Store`], [`StoreBuilder`] and
//! [`StoreConfig`].
//!
//! Internal modules:
//! - [`guarded`]: reader/writer-locked map with atomic get-or-create;
//! - [`store`]: values, topics and handlers wired together;
//! - [`builder`]: injects configuration and the error sink;
//! - [`config`]: relay capacity and backpressure settings.

mod builder;
mod config;
mod guarded;
mod store;

pub use builder::StoreBuilder;
pub use config::{DEFAULT_RELAY_CAPACITY, StoreConfig};
pub use store::{Store, StoreValue};
