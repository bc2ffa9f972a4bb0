//! Error types for the update client
//!
//! This module defines all error types used throughout the crate.
//!
//! Note that a failed *update attempt* is not an error: providers report
//! failures in-band through [`crate::Outcome`]. The variants here cover
//! configuration and construction problems only.

use thiserror::Error;

/// Result type alias for dynup operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the update client
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors (missing credential fields, empty hostname, ...)
    #[error("configuration error: {0}")]
    Config(String),

    /// No factory registered under the requested configuration key
    #[error("unknown protocol: {0}")]
    UnknownProtocol(String),

    /// A factory with this configuration key is already registered
    #[error("protocol already registered: {0}")]
    DuplicateProtocol(String),

    /// IP discovery failed
    #[error("IP detection error: {0}")]
    Detection(String),

    /// HTTP client construction failed
    #[error("HTTP client error: {0}")]
    Http(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an IP detection error
    pub fn detection(msg: impl Into<String>) -> Self {
        Self::Detection(msg.into())
    }

    /// Create an HTTP client error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }
}
