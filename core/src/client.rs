//! Blocking HTTP client with one method per verb.
//!
//! # Design
//! `Http` owns its timeout and a `Transport`. Every call goes through
//! `execute`, which resolves the timeout once at the start, blocks on the
//! transport, and folds the outcome into a `Response`. A timeout is returned
//! as `Err(Error::Timeout)`; every other outcome, including a refused
//! connection or a 500, is an `Ok(Response)` the caller inspects.
//!
//! The timeout is stored atomically so `set_timeout` works through a shared
//! reference. Changing it only affects calls that start afterwards.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::config::ClientConfig;
use crate::error::{ConfigError, Error};
use crate::http::{Header, HttpMethod, Request, Response, DEFAULT_CONTENT_TYPE};
use crate::transport::{SendError, Transport, UreqTransport};

pub struct Http {
    timeout_ms: AtomicU64,
    transport: Box<dyn Transport>,
}

impl Http {
    /// A client with the default ten second timeout over ureq.
    pub fn new() -> Self {
        Self::from_parts(ClientConfig::default().timeout(), Box::new(UreqTransport::new()))
    }

    pub fn with_config(config: ClientConfig) -> Result<Self, ConfigError> {
        Self::with_transport(config, UreqTransport::new())
    }

    pub fn with_transport<T>(config: ClientConfig, transport: T) -> Result<Self, ConfigError>
    where
        T: Transport + 'static,
    {
        config.validate()?;
        Ok(Self::from_parts(config.timeout(), Box::new(transport)))
    }

    fn from_parts(timeout: Duration, transport: Box<dyn Transport>) -> Self {
        Self {
            timeout_ms: AtomicU64::new(duration_to_ms(timeout)),
            transport,
        }
    }

    /// The timeout applied to calls without a per-request override.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.load(Ordering::Relaxed))
    }

    /// Replace the timeout for calls started from now on.
    pub fn set_timeout(&self, timeout: Duration) -> Result<(), ConfigError> {
        let ms = duration_to_ms(timeout);
        if ms == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        self.timeout_ms.store(ms, Ordering::Relaxed);
        Ok(())
    }

    pub fn get(&self, endpoint: &str, headers: &[Header]) -> Result<Response, Error> {
        self.execute(&Request::new(HttpMethod::Get, endpoint).headers(headers.iter().cloned()))
    }

    /// POST `body` as `application/json`. Use `post_with` for another
    /// content type.
    pub fn post(&self, endpoint: &str, body: &str, headers: &[Header]) -> Result<Response, Error> {
        self.post_with(endpoint, body, DEFAULT_CONTENT_TYPE, headers)
    }

    pub fn put(&self, endpoint: &str, body: &str, headers: &[Header]) -> Result<Response, Error> {
        self.put_with(endpoint, body, DEFAULT_CONTENT_TYPE, headers)
    }

    pub fn patch(&self, endpoint: &str, body: &str, headers: &[Header]) -> Result<Response, Error> {
        self.patch_with(endpoint, body, DEFAULT_CONTENT_TYPE, headers)
    }

    pub fn delete(&self, endpoint: &str, body: &str, headers: &[Header]) -> Result<Response, Error> {
        self.delete_with(endpoint, body, DEFAULT_CONTENT_TYPE, headers)
    }

    pub fn post_with(
        &self,
        endpoint: &str,
        body: &str,
        content_type: &str,
        headers: &[Header],
    ) -> Result<Response, Error> {
        self.send_body(HttpMethod::Post, endpoint, body, content_type, headers)
    }

    pub fn put_with(
        &self,
        endpoint: &str,
        body: &str,
        content_type: &str,
        headers: &[Header],
    ) -> Result<Response, Error> {
        self.send_body(HttpMethod::Put, endpoint, body, content_type, headers)
    }

    pub fn patch_with(
        &self,
        endpoint: &str,
        body: &str,
        content_type: &str,
        headers: &[Header],
    ) -> Result<Response, Error> {
        self.send_body(HttpMethod::Patch, endpoint, body, content_type, headers)
    }

    pub fn delete_with(
        &self,
        endpoint: &str,
        body: &str,
        content_type: &str,
        headers: &[Header],
    ) -> Result<Response, Error> {
        self.send_body(HttpMethod::Delete, endpoint, body, content_type, headers)
    }

    fn send_body(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: &str,
        content_type: &str,
        headers: &[Header],
    ) -> Result<Response, Error> {
        let request = Request::new(method, endpoint)
            .headers(headers.iter().cloned())
            .body(body)
            .content_type(content_type);
        self.execute(&request)
    }

    /// Send `request` and normalize the outcome.
    pub fn execute(&self, request: &Request) -> Result<Response, Error> {
        let timeout = request.timeout_override().unwrap_or_else(|| self.timeout());
        let method = request.method();
        let endpoint = request.endpoint();

        tracing::debug!(
            method = %method,
            endpoint,
            headers = request.header_list().len(),
            timeout_ms = duration_to_ms(timeout),
            "sending request"
        );
        let started = Instant::now();

        match self.transport.send(request, timeout) {
            Ok(raw) => {
                tracing::debug!(
                    method = %method,
                    endpoint,
                    status = raw.status,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "response received"
                );
                Ok(Response::received(raw.status, raw.headers, raw.body))
            }
            Err(SendError::TimedOut) => {
                tracing::warn!(method = %method, endpoint, ?timeout, "request timed out");
                Err(Error::Timeout {
                    endpoint: endpoint.to_string(),
                    timeout,
                })
            }
            Err(SendError::Failed(error)) => {
                tracing::warn!(method = %method, endpoint, error = %error, "transport failure");
                Ok(Response::transport_failure(error))
            }
        }
    }
}

impl Default for Http {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Http {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Http")
            .field("timeout", &self.timeout())
            .finish_non_exhaustive()
    }
}

fn duration_to_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
