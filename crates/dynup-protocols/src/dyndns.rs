//! Protocol handler for dyndns.com

use std::sync::Arc;

use dynup_core::{
    Notifier, ProtocolFactory, ProtocolOptions, ProviderProfile, Result, UpdateProtocol,
};

use crate::dyndns2;

/// Configuration key for this provider
pub const CONFIGURATION_KEY: &str = "dyndns";

const UPDATE_URL: &str = "https://members.dyndns.org/nic/update";

/// Profile for members.dyndns.org
pub fn profile() -> ProviderProfile {
    dyndns2::profile(CONFIGURATION_KEY, UPDATE_URL)
}

/// Factory for dyndns.com updaters
pub struct DyndnsFactory;

impl ProtocolFactory for DyndnsFactory {
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

#[cfg(test)]
mod tests {
    use super::*;
    use dynup_core::NullNotifier;

    #[test]
    fn test_profile() {
        let p = profile();
        assert_eq!(p.key, "dyndns");
        assert_eq!(p.update_url, "https://members.dyndns.org/nic/update");
    }

    #[test]
    fn test_factory_requires_userid_and_password() {
        let options = ProtocolOptions::new("host.example.com").with_field("userid", "joe");
        let result = DyndnsFactory.create(&options, Arc::new(NullNotifier));
        assert!(result.is_err());

        let options = options.with_field("password", "hunter2");
        let updater = DyndnsFactory.create(&options, Arc::new(NullNotifier)).unwrap();
        assert_eq!(updater.hostname(), "host.example.com");
    }
}
