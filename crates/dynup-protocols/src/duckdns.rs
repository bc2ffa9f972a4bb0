//! Protocol handler for duckdns.org-compatible services
//!
//! Wire shape, from the duckdns.org site:
//!
//! `https://{DOMAIN}/update?domains={DOMAINLIST}&token={TOKEN}&ip={IP}`
//!
//! where `domains` carries the hostname's leading label, `token`
//! authenticates, and `ip` may be blank to request server-side address
//! detection.
//!
//! Responses do not speak the dyndns2 vocabulary: the body starts with
//! `OK` on success, and anything else (the empty body included) is
//! reported verbatim rather than mapped onto dyndns2 tokens.

use std::sync::Arc;

use dynup_core::classify::BodyToken;
use dynup_core::{
    AuthScheme, HostnameParam, IpParamPolicy, Notifier, ProtocolFactory, ProtocolOptions,
    ProviderProfile, Result, UpdateProtocol,
};

/// Configuration key for this provider
pub const CONFIGURATION_KEY: &str = "duckdns";

const UPDATE_URL: &str = "https://www.duckdns.org/update";

/// duckdns response vocabulary: `OK` prefix or bust
pub fn grammar(body: &str) -> BodyToken {
    if body.starts_with("OK") {
        BodyToken::Good
    } else {
        BodyToken::Other
    }
}

/// Profile for a duckdns-compatible service at `update_url`
pub fn profile_at(update_url: impl Into<String>) -> ProviderProfile {
    ProviderProfile {
        key: CONFIGURATION_KEY,
        update_url: update_url.into(),
        credential_fields: &["token"],
        auth: AuthScheme::QueryParam { param: "token" },
        hostname: HostnameParam::FirstLabel { param: "domains" },
        ip: IpParamPolicy::EmptyRequestsAutoDetect { param: "ip" },
        grammar: Some(grammar),
    }
}

/// Profile for duckdns.org itself
pub fn profile() -> ProviderProfile {
    profile_at(UPDATE_URL)
}

/// Factory for duckdns updaters
///
/// Honors an optional `url` option field, for self-hosted services that
/// speak the duckdns protocol.
pub struct DuckdnsFactory;

impl ProtocolFactory for DuckdnsFactory {
    fn configuration_key(&self) -> &'static str {
        CONFIGURATION_KEY
    }

    fn create(
        &self,
        options: &ProtocolOptions,
        notifier: Arc<dyn Notifier>,
    ) -> Result<UpdateProtocol> {
        let profile = match options.get("url") {
            Some(url) => {
                tracing::debug!("using custom duckdns endpoint '{}'", url);
                profile_at(url)
            }
            None => profile(),
        };
        UpdateProtocol::new(profile, options, notifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dynup_core::NullNotifier;

    #[test]
    fn test_grammar_accepts_ok_prefix_only() {
        assert_eq!(grammar("OK"), BodyToken::Good);
        assert_eq!(grammar("OK\n203.0.113.5\nUPDATED"), BodyToken::Good);
        assert_eq!(grammar("KO"), BodyToken::Other);
        // dyndns2 tokens mean nothing to this provider
        assert_eq!(grammar("good 203.0.113.5"), BodyToken::Other);
        assert_eq!(grammar(""), BodyToken::Other);
    }

    #[test]
    fn test_profile_shape() {
        let p = profile();
        assert_eq!(p.key, "duckdns");
        assert_eq!(p.update_url, "https://www.duckdns.org/update");
        assert_eq!(p.auth, AuthScheme::QueryParam { param: "token" });
        assert_eq!(p.hostname, HostnameParam::FirstLabel { param: "domains" });
        assert_eq!(
            p.ip,
            IpParamPolicy::EmptyRequestsAutoDetect { param: "ip" }
        );
    }

    #[test]
    fn test_factory_honors_url_override() {
        let options = ProtocolOptions::new("host.duckdns.org")
            .with_field("token", "abc-123")
            .with_field("url", "https://duck.example.org/update");
        let updater = DuckdnsFactory.create(&options, Arc::new(NullNotifier)).unwrap();
        assert_eq!(updater.profile().update_url, "https://duck.example.org/update");
    }

    #[test]
    fn test_factory_requires_token() {
        let options = ProtocolOptions::new("host.duckdns.org");
        assert!(DuckdnsFactory.create(&options, Arc::new(NullNotifier)).is_err());
    }
}
