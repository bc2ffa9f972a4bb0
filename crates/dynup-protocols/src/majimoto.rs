//! Protocol handler for dyndns.majimoto.net
//!
//! Speaks the default vocabulary but authenticates with an API key sent
//! as the `key` query parameter instead of HTTP Basic.

use std::sync::Arc;

use dynup_core::{
    AuthScheme, HostnameParam, IpParamPolicy, Notifier, ProtocolFactory, ProtocolOptions,
    ProviderProfile, Result, UpdateProtocol,
};

/// Configuration key for this provider
pub const CONFIGURATION_KEY: &str = "majimoto";

const UPDATE_URL: &str = "https://dyndns.majimoto.net/nic/update";

/// Profile for dyndns.majimoto.net
pub fn profile() -> ProviderProfile {
    ProviderProfile {
        key: CONFIGURATION_KEY,
        update_url: UPDATE_URL.into(),
        credential_fields: &["key"],
        auth: AuthScheme::QueryParam { param: "key" },
        hostname: HostnameParam::Fqdn { param: "hostname" },
        ip: IpParamPolicy::OmitWhenUnknown { param: "myip" },
        grammar: None,
    }
}

/// Factory for majimoto updaters
pub struct MajimotoFactory;

impl ProtocolFactory for MajimotoFactory {
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
        assert_eq!(p.key, "majimoto");
        assert_eq!(p.auth, AuthScheme::QueryParam { param: "key" });
        assert_eq!(p.credential_fields, &["key"]);
    }

    #[test]
    fn test_factory_requires_key() {
        let options = ProtocolOptions::new("host.example.com");
        assert!(MajimotoFactory.create(&options, Arc::new(NullNotifier)).is_err());

        let options = options.with_field("key", "s3cret");
        assert!(MajimotoFactory.create(&options, Arc::new(NullNotifier)).is_ok());
    }
}
