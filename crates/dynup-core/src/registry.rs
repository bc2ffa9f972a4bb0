//! Pluggable protocol registry
//!
//! Maps a provider's configuration key to its [`ProtocolFactory`], so new
//! providers can be added without touching the orchestrator. Provider
//! crates expose a `register()` function that installs their factories:
//!
//! ```rust,ignore
//! let registry = ProtocolRegistry::new();
//! dynup_protocols::register(&registry)?;
//!
//! let updater = registry.create("dyndns", &options, notifier)?;
//! ```

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::config::ProtocolOptions;
use crate::error::{Error, Result};
use crate::notify::Notifier;
use crate::protocol::UpdateProtocol;

/// Builds [`UpdateProtocol`] instances for one provider
///
/// This is the only extension point a new provider must implement.
pub trait ProtocolFactory: Send + Sync {
    /// Stable configuration key identifying the provider ("dyndns", ...)
    fn configuration_key(&self) -> &'static str;

    /// Build an updater for one managed hostname
    fn create(
        &self,
        options: &ProtocolOptions,
        notifier: Arc<dyn Notifier>,
    ) -> Result<UpdateProtocol>;
}

/// Registry of protocol factories, keyed by configuration key
///
/// Uses interior mutability with an RwLock, allowing concurrent lookups
/// and exclusive registration.
#[derive(Default)]
pub struct ProtocolRegistry {
    factories: RwLock<HashMap<&'static str, Arc<dyn ProtocolFactory>>>,
}

impl ProtocolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a protocol factory
    ///
    /// Registering two factories under the same key is a configuration
    /// error, reported here rather than silently overwriting.
    pub fn register(&self, factory: Arc<dyn ProtocolFactory>) -> Result<()> {
        let key = factory.configuration_key();
        let mut factories = self.factories.write().unwrap();
        if factories.contains_key(key) {
            return Err(Error::DuplicateProtocol(key.to_string()));
        }
        factories.insert(key, factory);
        Ok(())
    }

    /// Build an updater via the factory registered under `key`
    pub fn create(
        &self,
        key: &str,
        options: &ProtocolOptions,
        notifier: Arc<dyn Notifier>,
    ) -> Result<UpdateProtocol> {
        let factory = {
            let factories = self.factories.read().unwrap();
            factories
                .get(key)
                .cloned()
                .ok_or_else(|| Error::UnknownProtocol(key.to_string()))?
        };
        factory.create(options, notifier)
    }

    /// Check whether a key is registered
    pub fn has(&self, key: &str) -> bool {
        self.factories.read().unwrap().contains_key(key)
    }

    /// All registered configuration keys
    pub fn keys(&self) -> Vec<&'static str> {
        self.factories.read().unwrap().keys().copied().collect()
    }
}
