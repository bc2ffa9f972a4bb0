// # dynup-protocols
//
// Built-in provider profiles for the dynup update client.
//
// Each provider module exposes a stable configuration key, a profile
// constructor describing its wire shape, and a factory implementing
// `ProtocolFactory`. `register()` installs all built-ins into a
// registry:
//
// ```rust,ignore
// let registry = ProtocolRegistry::new();
// dynup_protocols::register(&registry)?;
// let updater = registry.create("duckdns", &options, notifier)?;
// ```

use std::sync::Arc;

use dynup_core::{ProtocolRegistry, Result};

pub mod duckdns;
pub mod dyndns;
pub mod dyndns2;
pub mod majimoto;
pub mod noip;

/// Register every built-in provider with a registry
pub fn register(registry: &ProtocolRegistry) -> Result<()> {
    registry.register(Arc::new(dyndns::DyndnsFactory))?;
    registry.register(Arc::new(noip::NoipFactory))?;
    registry.register(Arc::new(majimoto::MajimotoFactory))?;
    registry.register(Arc::new(duckdns::DuckdnsFactory))?;
    Ok(())
}
