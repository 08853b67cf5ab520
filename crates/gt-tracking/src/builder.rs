//! Fluent builder for constructing a [`DynamicEntityRegistry`].

use crate::{DynamicEntityRegistry, RegistryObserver, TrackResult, TrackingConfig};

/// Fluent builder for a session-scoped [`DynamicEntityRegistry`].
///
/// # Optional inputs (have defaults)
///
/// | Method          | Default                      |
/// |-----------------|------------------------------|
/// | `.config(c)`    | `TrackingConfig::default()`  |
/// | `.observer(o)`  | no observers                 |
///
/// # Example
///
/// ```rust,ignore
/// let mut registry = RegistryBuilder::new()
///     .config(TrackingConfig::default().with_expiry(120_000))
///     .observer(MarkerBridge::new(tx))
///     .build()?;
/// ```
#[derive(Default)]
pub struct RegistryBuilder {
    config:    TrackingConfig,
    observers: Vec<Box<dyn RegistryObserver>>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: TrackingConfig) -> Self {
        self.config = config;
        self
    }

    /// Subscribe an observer as soon as the registry exists.  May be called
    /// any number of times; observers are notified in the order added.
    pub fn observer<O: RegistryObserver + 'static>(mut self, observer: O) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    /// Validate the config and return a ready registry.
    pub fn build(self) -> TrackResult<DynamicEntityRegistry> {
        let mut registry = DynamicEntityRegistry::new(self.config)?;
        for observer in self.observers {
            registry.subscribe_boxed(observer);
        }
        Ok(registry)
    }
}
