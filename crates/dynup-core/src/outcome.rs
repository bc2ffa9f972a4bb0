//! Classified results of update attempts
//!
//! An [`Outcome`] is constructed fresh for every `update()` call and handed
//! back to the caller; it is never stored. [`OutcomeKind`] is its fieldless
//! projection, used for state transitions and notification event names.

use std::fmt;
use std::net::IpAddr;

/// Result of one update attempt against a provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Provider accepted the update
    Success {
        /// The address that was requested (`None` = server-side detection)
        ip: Option<IpAddr>,
    },

    /// Provider reports the record already carried this address
    NoChange {
        /// The address that was requested
        ip: Option<IpAddr>,
    },

    /// Provider flagged this client as abusive
    Abuse,

    /// The hostname does not exist for this account
    NoHost,

    /// Provider-side failure (the classic `911` response)
    ServiceFailure,

    /// The configured hostname is not a fully qualified domain name
    NotFqdn,

    /// The response body matched no token of the provider's grammar
    Unrecognized {
        /// Raw response text, kept verbatim for diagnostics
        body: String,
    },

    /// The request produced no usable response: non-200 status, timeout,
    /// or connection failure
    TransportError {
        /// Status code or transport cause, as text
        cause: String,
    },
}

impl Outcome {
    /// The fieldless kind of this outcome
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Outcome::Success { .. } => OutcomeKind::Success,
            Outcome::NoChange { .. } => OutcomeKind::NoChange,
            Outcome::Abuse => OutcomeKind::Abuse,
            Outcome::NoHost => OutcomeKind::NoHost,
            Outcome::ServiceFailure => OutcomeKind::ServiceFailure,
            Outcome::NotFqdn => OutcomeKind::NotFqdn,
            Outcome::Unrecognized { .. } => OutcomeKind::Unrecognized,
            Outcome::TransportError { .. } => OutcomeKind::TransportError,
        }
    }

    /// Whether the provider considered the update acceptable
    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Success { .. } | Outcome::NoChange { .. })
    }
}

/// Fieldless projection of [`Outcome`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeKind {
    Success,
    NoChange,
    Abuse,
    NoHost,
    ServiceFailure,
    NotFqdn,
    Unrecognized,
    TransportError,
}

impl OutcomeKind {
    /// Stable label, used as notification event name and for display
    pub fn label(self) -> &'static str {
        match self {
            OutcomeKind::Success => "good",
            OutcomeKind::NoChange => "nochg",
            OutcomeKind::Abuse => "abuse",
            OutcomeKind::NoHost => "nohost",
            OutcomeKind::ServiceFailure => "911",
            OutcomeKind::NotFqdn => "notfqdn",
            OutcomeKind::Unrecognized => "unrecognized",
            OutcomeKind::TransportError => "transport-error",
        }
    }

    /// Whether this kind produces a user-visible notification
    ///
    /// Success and NoChange are deliberately silent to avoid flooding the
    /// notification sink on the common-case path.
    pub fn is_user_visible(self) -> bool {
        !matches!(self, OutcomeKind::Success | OutcomeKind::NoChange)
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
