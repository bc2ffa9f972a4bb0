//! Immutable provider descriptors
//!
//! A [`ProviderProfile`] describes one dynamic-DNS provider's request and
//! response shape as plain data: endpoint URL, required credential
//! fields, authentication scheme, query-parameter encoding, and an
//! optional response-grammar override. One shared orchestrator
//! ([`UpdateProtocol`](crate::protocol::UpdateProtocol)) is parameterized
//! by a profile instead of each provider subclassing the update logic.
//!
//! Profiles are immutable and may be shared read-only across all updater
//! instances of the same provider.

use crate::classify::{Grammar, dyndns2_grammar};

/// How an update request authenticates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// HTTP Basic from the `userid`/`password` option fields
    Basic,
    /// Secret sent as a query parameter; the option field carries the
    /// same name as the parameter (`token`, `key`, ...)
    QueryParam {
        /// Query parameter name
        param: &'static str,
    },
    /// No authentication
    None,
}

/// How the managed hostname rides on the query string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostnameParam {
    /// Full FQDN under the given parameter name
    Fqdn { param: &'static str },
    /// Only the leading label (duckdns-style `domains` parameter)
    FirstLabel { param: &'static str },
}

/// How the target IP rides on the query string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpParamPolicy {
    /// Omit the parameter entirely when no address is supplied
    OmitWhenUnknown { param: &'static str },
    /// Always send the parameter; an empty value asks the provider to
    /// detect the address server-side
    EmptyRequestsAutoDetect { param: &'static str },
}

/// Immutable descriptor of one provider's request/response shape
#[derive(Debug, Clone)]
pub struct ProviderProfile {
    /// Unique short name, doubling as the configuration key
    pub key: &'static str,

    /// Update endpoint
    pub update_url: String,

    /// Option fields that must be present at construction time
    pub credential_fields: &'static [&'static str],

    /// Authentication scheme
    pub auth: AuthScheme,

    /// Hostname encoding
    pub hostname: HostnameParam,

    /// IP encoding
    pub ip: IpParamPolicy,

    /// Response vocabulary override; `None` means the dyndns2 grammar
    pub grammar: Option<Grammar>,
}

impl ProviderProfile {
    /// The grammar used to classify this provider's responses
    pub fn response_grammar(&self) -> Grammar {
        self.grammar.unwrap_or(dyndns2_grammar)
    }
}
