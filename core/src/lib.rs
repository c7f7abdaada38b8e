//! Blocking HTTP client facade: one call per verb, one uniform `Response`.
//!
//! # Overview
//! Wraps request construction, header attachment, timeout handling and
//! response normalization around a pluggable `Transport` (ureq by default).
//! Build an `Http` once and call `get`/`post`/`put`/`patch`/`delete` on it,
//! or use the module-level functions, which share one process-wide client.
//!
//! # Design
//! - Every call returns `Result<Response, Error>`. Only a timeout is an
//!   `Err`; refused connections, DNS failures and non-2xx statuses all come
//!   back as a `Response` with `is_successful() == false`.
//! - `Response` headers are populated whenever the server answered and are
//!   empty only when nothing was received.
//! - No retry, pooling or redirect policy lives here; those belong to the
//!   transport or the caller.

use std::sync::OnceLock;
use std::time::Duration;

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;

pub use client::Http;
pub use config::ClientConfig;
pub use error::{ConfigError, Error, TransportError};
pub use http::{Header, HttpMethod, Request, Response, DEFAULT_CONTENT_TYPE};
pub use transport::{RawResponse, SendError, Transport, UreqTransport};

/// The process-wide client behind the module-level functions.
///
/// Starts from `ClientConfig::from_env`, falling back to the defaults when
/// the environment holds an invalid value.
pub fn shared() -> &'static Http {
    static SHARED: OnceLock<Http> = OnceLock::new();
    SHARED.get_or_init(|| {
        let config = ClientConfig::from_env().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "ignoring invalid environment configuration");
            ClientConfig::default()
        });
        Http::with_config(config).unwrap_or_default()
    })
}

/// Timeout used by the module-level functions.
pub fn timeout() -> Duration {
    shared().timeout()
}

/// Change the timeout for module-level calls started from now on.
pub fn set_timeout(timeout: Duration) -> Result<(), ConfigError> {
    shared().set_timeout(timeout)
}

pub fn execute(request: &Request) -> Result<Response, Error> {
    shared().execute(request)
}

pub fn get(endpoint: &str, headers: &[Header]) -> Result<Response, Error> {
    shared().get(endpoint, headers)
}

pub fn post(endpoint: &str, body: &str, headers: &[Header]) -> Result<Response, Error> {
    shared().post(endpoint, body, headers)
}

pub fn put(endpoint: &str, body: &str, headers: &[Header]) -> Result<Response, Error> {
    shared().put(endpoint, body, headers)
}

pub fn patch(endpoint: &str, body: &str, headers: &[Header]) -> Result<Response, Error> {
    shared().patch(endpoint, body, headers)
}

pub fn delete(endpoint: &str, body: &str, headers: &[Header]) -> Result<Response, Error> {
    shared().delete(endpoint, body, headers)
}

pub fn post_with(
    endpoint: &str,
    body: &str,
    content_type: &str,
    headers: &[Header],
) -> Result<Response, Error> {
    shared().post_with(endpoint, body, content_type, headers)
}

pub fn put_with(
    endpoint: &str,
    body: &str,
    content_type: &str,
    headers: &[Header],
) -> Result<Response, Error> {
    shared().put_with(endpoint, body, content_type, headers)
}

pub fn patch_with(
    endpoint: &str,
    body: &str,
    content_type: &str,
    headers: &[Header],
) -> Result<Response, Error> {
    shared().patch_with(endpoint, body, content_type, headers)
}

pub fn delete_with(
    endpoint: &str,
    body: &str,
    content_type: &str,
    headers: &[Header],
) -> Result<Response, Error> {
    shared().delete_with(endpoint, body, content_type, headers)
}
