//! Response classification
//!
//! Dynamic-DNS providers answer update requests with short, loosely
//! specified plaintext bodies ("good 1.2.3.4", "nochg", "911", ...).
//! [`classify`] maps a raw `(status, body)` pair to an [`Outcome`] using a
//! per-provider [`Grammar`]. It is a pure function: no I/O, no mutation,
//! deterministic.
//!
//! Most providers speak the dyndns2 vocabulary ([`dyndns2_grammar`]);
//! providers with a deviating token set (duckdns' bare `OK`, for example)
//! plug in their own grammar via
//! [`ProviderProfile::grammar`](crate::profile::ProviderProfile).

use std::net::IpAddr;

use crate::outcome::Outcome;

/// Token a grammar extracts from a 200-status response body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyToken {
    /// Update accepted
    Good,
    /// Address unchanged on the provider side
    NoChg,
    /// Unknown hostname
    NoHost,
    /// Client flagged as abusive
    Abuse,
    /// Provider-side failure
    ServiceFailure,
    /// Hostname not fully qualified
    NotFqdn,
    /// No token matched
    Other,
}

/// A provider response grammar: maps a raw body to a token
pub type Grammar = fn(&str) -> BodyToken;

/// The dyndns2 vocabulary, shared by dyndns.org-compatible services
///
/// Matching is case-sensitive and runs in priority order, first match
/// wins: some tokens overlap as prefixes. `good` is a prefix match since
/// services append the accepted address (`good 203.0.113.5`); the
/// remaining tokens require an exact body.
pub fn dyndns2_grammar(body: &str) -> BodyToken {
    if body.starts_with("good") {
        BodyToken::Good
    } else if body == "nochg" {
        BodyToken::NoChg
    } else if body == "nohost" {
        BodyToken::NoHost
    } else if body == "abuse" {
        BodyToken::Abuse
    } else if body == "911" {
        BodyToken::ServiceFailure
    } else if body == "notfqdn" {
        BodyToken::NotFqdn
    } else {
        BodyToken::Other
    }
}

/// Classify a provider response into an [`Outcome`]
///
/// A non-200 status dominates: the body is not inspected at all and the
/// status code is carried as the transport cause. Otherwise the grammar
/// tokenizes the body; an unmatched body becomes
/// [`Outcome::Unrecognized`] carrying the raw text.
///
/// `requested` is the address the caller asked for and becomes the
/// payload of `Success`/`NoChange` (`None` = server-side detection).
pub fn classify(status: u16, body: &str, requested: Option<IpAddr>, grammar: Grammar) -> Outcome {
    if status != 200 {
        return Outcome::TransportError {
            cause: format!("invalid http status code: {}", status),
        };
    }

    match grammar(body) {
        BodyToken::Good => Outcome::Success { ip: requested },
        BodyToken::NoChg => Outcome::NoChange { ip: requested },
        BodyToken::NoHost => Outcome::NoHost,
        BodyToken::Abuse => Outcome::Abuse,
        BodyToken::ServiceFailure => Outcome::ServiceFailure,
        BodyToken::NotFqdn => Outcome::NotFqdn,
        BodyToken::Other => Outcome::Unrecognized {
            body: body.to_string(),
        },
    }
}
