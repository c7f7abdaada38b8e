//! Error types for the HTTP client.
//!
//! # Design
//! Only a timeout crosses the call boundary as `Err`: a caller has to be able
//! to tell "no answer arrived in time" apart from "the server answered with a
//! failure". Connection-level failures are ordinary outcomes and travel inside
//! the `Response` as a `TransportError`; non-2xx statuses are not errors at all.

use std::time::Duration;

use thiserror::Error;

/// Errors returned by `Http::execute` and the verb helpers.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// No response arrived within the configured timeout.
    #[error("request to {endpoint} timed out after {}s", .timeout.as_secs_f64())]
    Timeout { endpoint: String, timeout: Duration },

    /// A request body could not be serialized to JSON.
    #[error("request body serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl Error {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }
}

/// A failure below the HTTP layer, captured into `Response::transport_error`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The URL or a header could not form a valid request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// DNS resolution found no address for the host.
    #[error("host not found: {0}")]
    HostNotFound(String),

    /// The TCP connection could not be established.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("i/o error: {0}")]
    Io(String),

    #[error("transport error: {0}")]
    Other(String),
}

/// Invalid client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("timeout must be greater than zero")]
    InvalidTimeout,

    #[error("environment variable {var} has invalid value {value:?}")]
    InvalidEnv { var: String, value: String },
}
