use std::marker::PhantomData;
use std::sync::Arc;

use crate::core::{Store, StoreConfig, StoreValue};
use crate::sinks::{ErrorSink, LogWriter};

/// Builder for constructing a [`Store`] with optional collaborators.
pub struct StoreBuilder<V> {
    cfg: StoreConfig,
    sink: Option<Arc<dyn ErrorSink>>,
    _values: PhantomData<fn() -> V>,
}

impl<V: StoreValue> StoreBuilder<V> {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: StoreConfig) -> Self {
        Self {
            cfg,
            sink: None,
            _values: PhantomData,
        }
    }

    /// Sets the sink that receives handler failures.
    ///
    /// Without one, failures are logged through [`LogWriter`].
    pub fn with_error_sink(mut self, sink: Arc<dyn ErrorSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Builds and returns the store.
    pub fn build(self) -> Store<V> {
        let sink = self.sink.unwrap_or_else(|| Arc::new(LogWriter));
        Store::from_parts(self.cfg, sink)
    }
}
