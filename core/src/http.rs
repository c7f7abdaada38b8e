//! Plain-data request and response types.
//!
//! # Design
//! `Request` describes one call as data: the `Http` client hands it to a
//! `Transport`, which performs the I/O, and turns whatever comes back into a
//! `Response`. Keeping both sides as owned values means a response can be
//! moved freely between threads and outlives the client that produced it.
//!
//! `Response` is built only inside this crate and exposes read-only
//! accessors, so a value the caller holds always reflects exactly one
//! request attempt.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Error, TransportError};

/// Content type used for request bodies unless the caller picks another.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether a body is sent with this method. GET never carries one.
    pub fn carries_body(&self) -> bool {
        !matches!(self, HttpMethod::Get)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single request header. Duplicate names are legal and kept in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    name: String,
    value: String,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl<K: Into<String>, V: Into<String>> From<(K, V)> for Header {
    fn from((name, value): (K, V)) -> Self {
        Header::new(name, value)
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone)]
pub struct Request {
    method: HttpMethod,
    endpoint: String,
    headers: Vec<Header>,
    body: Option<String>,
    content_type: String,
    timeout: Option<Duration>,
}

impl Request {
    pub fn new(method: HttpMethod, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            headers: Vec::new(),
            body: None,
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            timeout: None,
        }
    }

    /// Append a header. Earlier headers with the same name are kept.
    pub fn header(mut self, header: impl Into<Header>) -> Self {
        self.headers.push(header.into());
        self
    }

    pub fn headers<I>(mut self, headers: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Header>,
    {
        self.headers.extend(headers.into_iter().map(Into::into));
        self
    }

    /// Set the UTF-8 text body. Ignored for GET.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `value` as the JSON body.
    pub fn json_body<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self, Error> {
        self.body = Some(serde_json::to_string(value)?);
        self.content_type = DEFAULT_CONTENT_TYPE.to_string();
        Ok(self)
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Override the client timeout for this request only.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn header_list(&self) -> &[Header] {
        &self.headers
    }

    /// The body to put on the wire: `None` for GET, the empty string for a
    /// body-bearing method that was given no body.
    pub fn outgoing_body(&self) -> Option<&str> {
        if self.method.carries_body() {
            Some(self.body.as_deref().unwrap_or(""))
        } else {
            None
        }
    }

    pub fn content_type_value(&self) -> &str {
        &self.content_type
    }

    pub fn timeout_override(&self) -> Option<Duration> {
        self.timeout
    }
}

/// The outcome of one request attempt.
///
/// A response with a status code was received from the server; one without
/// a status code failed below HTTP and carries a `TransportError` instead.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    body: String,
    headers: BTreeMap<String, Vec<String>>,
    is_successful: bool,
    status_code: Option<u16>,
    transport_error: Option<TransportError>,
}

impl Response {
    /// Normalize a response the server actually sent. Header names are
    /// lower-cased; repeated headers collect their values in arrival order.
    pub(crate) fn received(status: u16, headers: Vec<(String, String)>, body: String) -> Self {
        let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (name, value) in headers {
            grouped.entry(name.to_ascii_lowercase()).or_default().push(value);
        }
        Self {
            body,
            headers: grouped,
            is_successful: (200..=299).contains(&status),
            status_code: Some(status),
            transport_error: None,
        }
    }

    pub(crate) fn transport_failure(error: TransportError) -> Self {
        Self {
            body: String::new(),
            headers: BTreeMap::new(),
            is_successful: false,
            status_code: None,
            transport_error: Some(error),
        }
    }

    /// True iff a response arrived with a 2xx status.
    pub fn is_successful(&self) -> bool {
        self.is_successful
    }

    /// `None` when no response was received.
    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn into_body(self) -> String {
        self.body
    }

    pub fn headers(&self) -> &BTreeMap<String, Vec<String>> {
        &self.headers
    }

    /// First value of the named header, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn transport_error(&self) -> Option<&TransportError> {
        self.transport_error.as_ref()
    }

    /// Deserialize the body as JSON, whatever the status code.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}
