//! Per-hostname health record
//!
//! [`UpdateState`] tracks what happened across repeated update attempts
//! for one managed hostname: a derived OK/FAILING status, a failure
//! streak, and a no-change streak. The counters exist so an external
//! scheduler can implement backoff or abuse-avoidance without this crate
//! making scheduling decisions itself.
//!
//! Each state is owned exclusively by its
//! [`UpdateProtocol`](crate::protocol::UpdateProtocol) instance. It is not
//! designed for concurrent mutation; drive one instance from one task at
//! a time.

use crate::outcome::{Outcome, OutcomeKind};

/// Derived health status of a managed hostname
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HostStatus {
    /// Last applied outcome was Success or NoChange
    #[default]
    Ok,
    /// Last applied outcome was anything else
    Failing,
}

/// Mutable health record for one managed hostname
#[derive(Debug, Clone, Default)]
pub struct UpdateState {
    status: HostStatus,
    fail_count: u32,
    nochg_count: u32,
    last_outcome: Option<OutcomeKind>,
}

impl UpdateState {
    /// Fresh state: OK, both counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Current derived status
    pub fn status(&self) -> HostStatus {
        self.status
    }

    /// Shorthand for `status() == HostStatus::Failing`
    pub fn is_failing(&self) -> bool {
        self.status == HostStatus::Failing
    }

    /// Consecutive failure-classified outcomes since the last reset
    pub fn fail_count(&self) -> u32 {
        self.fail_count
    }

    /// Consecutive NoChange outcomes since the last reset
    pub fn nochg_count(&self) -> u32 {
        self.nochg_count
    }

    /// Kind of the last applied outcome, for display ("nohost", ...)
    ///
    /// Auxiliary information only; [`status`](Self::status) is the single
    /// source of truth for health.
    pub fn last_outcome(&self) -> Option<OutcomeKind> {
        self.last_outcome
    }

    /// Apply one classified outcome
    ///
    /// Transition table:
    ///
    /// | kind           | status  | fail_count | nochg_count |
    /// |----------------|---------|------------|-------------|
    /// | Success        | Ok      | 0          | 0           |
    /// | NoChange       | Ok      | 0          | +1          |
    /// | Abuse          | Failing | 0          | 0           |
    /// | NoHost         | Failing | +1         | unchanged   |
    /// | ServiceFailure | Failing | +1         | unchanged   |
    /// | NotFqdn        | Failing | +1         | unchanged   |
    /// | Unrecognized   | Failing | unchanged  | unchanged   |
    /// | TransportError | Failing | unchanged  | unchanged   |
    pub fn apply(&mut self, outcome: &Outcome) {
        let kind = outcome.kind();
        match kind {
            OutcomeKind::Success => {
                self.status = HostStatus::Ok;
                self.fail_count = 0;
                self.nochg_count = 0;
            }
            OutcomeKind::NoChange => {
                self.status = HostStatus::Ok;
                self.fail_count = 0;
                self.nochg_count += 1;
            }
            OutcomeKind::Abuse => {
                self.status = HostStatus::Failing;
                self.fail_count = 0;
                self.nochg_count = 0;
            }
            OutcomeKind::NoHost | OutcomeKind::ServiceFailure | OutcomeKind::NotFqdn => {
                self.status = HostStatus::Failing;
                self.fail_count += 1;
            }
            OutcomeKind::Unrecognized | OutcomeKind::TransportError => {
                self.status = HostStatus::Failing;
            }
        }
        self.last_outcome = Some(kind);
    }
}
