//! Protocol handler for www.noip.com

use std::sync::Arc;

use dynup_core::{
    Notifier, ProtocolFactory, ProtocolOptions, ProviderProfile, Result, UpdateProtocol,
};

use crate::dyndns2;

/// Configuration key for this provider
pub const CONFIGURATION_KEY: &str = "noip";

const UPDATE_URL: &str = "https://dynupdate.no-ip.com/nic/update";

/// Profile for dynupdate.no-ip.com
pub fn profile() -> ProviderProfile {
    dyndns2::profile(CONFIGURATION_KEY, UPDATE_URL)
}

/// Factory for no-ip.com updaters
pub struct NoipFactory;

impl ProtocolFactory for NoipFactory {
    fn configuration_key(&self) -> &'static str {
        CONFIGURATION_KEY
    }

    fn create(
        &self,
        options: &ProtocolOptions,
        notifier: Arc<dyn Notifier>,
    ) -> Result<UpdateProtocol> {
        UpdateProtocol::new(profile(), options, notifier)
    }
}
