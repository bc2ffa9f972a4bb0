//! IP discovery trait
//!
//! How the current public address is learned is a collaborator concern,
//! not part of the update core: the scheduler asks an [`IpDetector`] and
//! feeds the answer into
//! [`UpdateProtocol::update`](crate::protocol::UpdateProtocol::update).
//! The `dynup-ip-http` crate provides an HTTP-based implementation.

use std::net::IpAddr;

use async_trait::async_trait;

use crate::error::Result;

/// Discovers the host's current public IP address
#[async_trait]
pub trait IpDetector: Send + Sync {
    /// Return the current public address
    ///
    /// Implementations perform one bounded-time probe per call and must
    /// not cache failures; a failed probe is an [`Error::Detection`]
    /// (recoverable, the scheduler simply tries again later).
    ///
    /// [`Error::Detection`]: crate::Error::Detection
    async fn detect(&self) -> Result<IpAddr>;
}
