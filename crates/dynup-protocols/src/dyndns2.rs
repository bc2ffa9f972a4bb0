//! The dyndns2 protocol family
//!
//! dyndns.org-compatible services share one wire shape: GET against a
//! `/nic/update` endpoint, HTTP Basic authentication, `hostname` and
//! `myip` query parameters (the latter omitted to let the service pick
//! the connecting address), and the default response vocabulary. Family
//! members differ only in their endpoint URL.

use dynup_core::{AuthScheme, HostnameParam, IpParamPolicy, ProviderProfile};

/// Profile for a dyndns2-compatible service at `update_url`
pub fn profile(key: &'static str, update_url: impl Into<String>) -> ProviderProfile {
    ProviderProfile {
        key,
        update_url: update_url.into(),
        credential_fields: &["userid", "password"],
        auth: AuthScheme::Basic,
        hostname: HostnameParam::Fqdn { param: "hostname" },
        ip: IpParamPolicy::OmitWhenUnknown { param: "myip" },
        grammar: None,
    }
}
