//! The transport seam and its default ureq implementation.
//!
//! # Design
//! `Http` never touches sockets itself. It hands a `Request` and the timeout
//! it resolved for that call to a `Transport`, which reports either what the
//! server sent (`RawResponse`) or why nothing usable came back (`SendError`).
//! Tests swap in a recording stub; production uses `UreqTransport`.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use ureq::typestate::WithBody;
use ureq::{Agent, RequestBuilder};

use crate::error::TransportError;
use crate::http::{Header, HttpMethod, Request};

/// What the server sent back, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Why a transport produced no response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendError {
    TimedOut,
    Failed(TransportError),
}

/// Performs the actual HTTP round-trip. Implementations block the calling
/// thread until the exchange completes, fails, or `timeout` elapses.
pub trait Transport: Send + Sync {
    fn send(&self, request: &Request, timeout: Duration) -> Result<RawResponse, SendError>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, request: &Request, timeout: Duration) -> Result<RawResponse, SendError> {
        (**self).send(request, timeout)
    }
}

/// Transport backed by a fresh `ureq::Agent` per call.
///
/// The agent lives only for the duration of `send` and is dropped on every
/// exit path, so no connection outlives the request that opened it.
#[derive(Debug, Clone, Copy, Default)]
pub struct UreqTransport;

impl UreqTransport {
    pub fn new() -> Self {
        Self
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &Request, timeout: Duration) -> Result<RawResponse, SendError> {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();

        let url = request.endpoint();
        let result = match request.method() {
            HttpMethod::Get => with_headers(agent.get(url), request).call(),
            HttpMethod::Post => send_body(with_headers(agent.post(url), request), request),
            HttpMethod::Put => send_body(with_headers(agent.put(url), request), request),
            HttpMethod::Patch => send_body(with_headers(agent.patch(url), request), request),
            HttpMethod::Delete => send_body(
                with_headers(agent.delete(url), request).force_send_body(),
                request,
            ),
        };
        let mut response = result.map_err(|e| classify(e, url))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        // The whole body is read; ureq's default 10 MiB cap is lifted.
        let bytes = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()
            .map_err(|e| classify(e, url))?;

        Ok(RawResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}

/// Append every caller header in order; `header` adds rather than replaces,
/// so repeated names all reach the wire.
fn with_headers<B>(mut builder: RequestBuilder<B>, request: &Request) -> RequestBuilder<B> {
    for header in forwarded_headers(request) {
        builder = builder.header(header.name(), header.value());
    }
    builder
}

/// Caller headers that go on the wire. On body-bearing methods the request's
/// content type wins, so a caller `Content-Type` header is dropped there.
fn forwarded_headers(request: &Request) -> impl Iterator<Item = &Header> {
    let body = request.method().carries_body();
    request
        .header_list()
        .iter()
        .filter(move |h| !(body && h.name().eq_ignore_ascii_case("content-type")))
}

fn send_body(
    builder: RequestBuilder<WithBody>,
    request: &Request,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    let body = request.outgoing_body().unwrap_or("");
    builder
        .content_type(request.content_type_value())
        .send(body.as_bytes())
}

/// Sort a ureq failure into timeout versus every other transport failure.
fn classify(error: ureq::Error, endpoint: &str) -> SendError {
    let failure = match error {
        ureq::Error::Timeout(_) => return SendError::TimedOut,
        ureq::Error::Io(e) => match e.kind() {
            io::ErrorKind::TimedOut => return SendError::TimedOut,
            io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted => {
                TransportError::ConnectionFailed(format!("{endpoint}: {e}"))
            }
            _ if is_lookup_failure(&e) => TransportError::HostNotFound(endpoint.to_string()),
            _ => TransportError::Io(format!("{endpoint}: {e}")),
        },
        ureq::Error::HostNotFound => TransportError::HostNotFound(endpoint.to_string()),
        ureq::Error::ConnectionFailed => TransportError::ConnectionFailed(endpoint.to_string()),
        ureq::Error::BadUri(uri) => TransportError::InvalidRequest(uri),
        ureq::Error::Http(e) => TransportError::InvalidRequest(e.to_string()),
        other => TransportError::Other(format!("{endpoint}: {other}")),
    };
    SendError::Failed(failure)
}

/// Name resolution surfaces from std as an uncategorized I/O error; its
/// message is the only stable marker.
fn is_lookup_failure(error: &io::Error) -> bool {
    error
        .to_string()
        .starts_with("failed to lookup address information")
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "http://example.test/";

    #[test]
    fn timeout_is_its_own_class() {
        let err = ureq::Error::Timeout(ureq::Timeout::Global);
        assert_eq!(classify(err, URL), SendError::TimedOut);

        let err = ureq::Error::Io(io::Error::new(io::ErrorKind::TimedOut, "slow"));
        assert_eq!(classify(err, URL), SendError::TimedOut);
    }

    #[test]
    fn refused_connection_is_connection_failure() {
        let err = ureq::Error::Io(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"));
        assert!(matches!(
            classify(err, URL),
            SendError::Failed(TransportError::ConnectionFailed(_))
        ));
        assert!(matches!(
            classify(ureq::Error::ConnectionFailed, URL),
            SendError::Failed(TransportError::ConnectionFailed(_))
        ));
    }

    #[test]
    fn dns_failure_names_endpoint() {
        assert_eq!(
            classify(ureq::Error::HostNotFound, "https://unroutable.invalid/"),
            SendError::Failed(TransportError::HostNotFound(
                "https://unroutable.invalid/".to_string()
            ))
        );
    }

    #[test]
    fn bad_uri_is_invalid_request() {
        let err = ureq::Error::BadUri("nope".to_string());
        assert_eq!(
            classify(err, "nope"),
            SendError::Failed(TransportError::InvalidRequest("nope".to_string()))
        );
    }

    #[test]
    fn other_io_errors_are_io() {
        let err = ureq::Error::Io(io::Error::new(io::ErrorKind::UnexpectedEof, "eof"));
        assert!(matches!(
            classify(err, URL),
            SendError::Failed(TransportError::Io(_))
        ));
    }

    #[test]
    fn failed_lookup_is_host_not_found() {
        let err = ureq::Error::Io(io::Error::new(
            io::ErrorKind::Other,
            "failed to lookup address information: Name or service not known",
        ));
        assert_eq!(
            classify(err, "https://unroutable.invalid/"),
            SendError::Failed(TransportError::HostNotFound(
                "https://unroutable.invalid/".to_string()
            ))
        );
    }

    #[test]
    fn caller_content_type_dropped_on_body_methods() {
        let headers = [("Content-Type", "text/csv"), ("X-Keep", "1")];
        let post = Request::new(HttpMethod::Post, URL).headers(headers);
        let names: Vec<_> = forwarded_headers(&post).map(Header::name).collect();
        assert_eq!(names, vec!["X-Keep"]);

        let get = Request::new(HttpMethod::Get, URL).headers(headers);
        let names: Vec<_> = forwarded_headers(&get).map(Header::name).collect();
        assert_eq!(names, vec!["Content-Type", "X-Keep"]);
    }
}
