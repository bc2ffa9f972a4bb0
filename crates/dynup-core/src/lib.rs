// # dynup-core
//
// Core library for the dynup dynamic-DNS update client.
//
// ## Architecture Overview
//
// Many providers, each with its own URL shape, authentication scheme and
// response vocabulary, are driven through one uniform lifecycle:
//
// - **classify**: pure mapping from a provider's raw `(status, body)`
//   to an `Outcome`, parameterized by a per-provider grammar
// - **UpdateState**: per-hostname health record (OK/FAILING, failure
//   streak, no-change streak) with an absolute transition table
// - **ProviderProfile**: immutable data describing one provider's
//   request/response shape
// - **UpdateProtocol**: the shared orchestrator (build request, perform
//   it, classify, apply transition, notify)
// - **ProtocolRegistry**: configuration-key → factory lookup for
//   pluggable providers
//
// ## Design Principles
//
// 1. **Data-driven dispatch**: one orchestrator parameterized by profile
//    values, no per-provider subclassing
// 2. **What happened vs. what to do about it**: the core reports
//    outcomes and counters; retry timing and backoff belong to the
//    caller
// 3. **No unhandled faults**: `update()` always returns an `Outcome`,
//    network failure included
// 4. **Per-instance state**: nothing mutable is shared across hostnames

pub mod classify;
pub mod config;
pub mod detect;
pub mod error;
pub mod notify;
pub mod outcome;
pub mod profile;
pub mod protocol;
pub mod registry;
pub mod state;

// Re-export core types for convenience
pub use classify::{BodyToken, Grammar, classify, dyndns2_grammar};
pub use config::ProtocolOptions;
pub use detect::IpDetector;
pub use error::{Error, Result};
pub use notify::{LogNotifier, Notifier, NullNotifier};
pub use outcome::{Outcome, OutcomeKind};
pub use profile::{AuthScheme, HostnameParam, IpParamPolicy, ProviderProfile};
pub use protocol::UpdateProtocol;
pub use registry::{ProtocolFactory, ProtocolRegistry};
pub use state::{HostStatus, UpdateState};
