//! HTTP transport types and the transport seam.
//!
//! # Design
//! Requests and responses are plain data. `NetClient` builds `HttpRequest`
//! values and classifies `HttpResponse` values without touching the network;
//! a `Transport` performs the actual round-trip. A non-2xx status is a normal
//! response here, never an `Err`, so status interpretation stays in the
//! client.

use std::future::Future;
use std::time::Duration;

use bytes::Bytes;

use crate::error::TransportError;
use crate::headers::{HeaderSet, CONTENT_TYPE};
use crate::multipart::MultipartForm;
use crate::types::OCTET_STREAM;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serialized request body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestBody {
    #[default]
    Empty,
    Text(String),
    /// The transport picks the boundary and sets the `Content-Type` header.
    Multipart(MultipartForm),
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HeaderSet,
    pub body: RequestBody,
    /// Upper bound on the network wait. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: HeaderSet,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: u16, status_text: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            headers: HeaderSet::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE)
    }

    /// True when the declared media type is `application/octet-stream`,
    /// ignoring parameters and case.
    pub fn is_octet_stream(&self) -> bool {
        self.content_type()
            .map(|ct| ct.split(';').next().unwrap_or_default().trim())
            .is_some_and(|essence| essence.eq_ignore_ascii_case(OCTET_STREAM))
    }
}

/// Executes one request against the network.
///
/// Implementations must return non-success statuses as `Ok` responses and
/// reserve `Err` for failures to complete the exchange.
pub trait Transport: Send + Sync {
    fn issue(&self, request: HttpRequest) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

impl<T: Transport> Transport for std::sync::Arc<T> {
    fn issue(&self, request: HttpRequest) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send {
        (**self).issue(request)
    }
}
