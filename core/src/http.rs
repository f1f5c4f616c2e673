//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. `EmployeeClient` builds
//! `HttpRequest` values and parses `HttpResponse` values; a `Transport`
//! supplied by the host performs the actual round-trip. Tests swap in a
//! scripted transport, the façade plugs in a real HTTP agent.

use crate::error::TransportError;

/// HTTP method for a request. The upstream API only needs these three.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
///
/// Any response that carried a status line, 4xx and 5xx included, is an
/// `HttpResponse`. Only failures to get a response at all are transport errors.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes one `HttpRequest` against the network.
///
/// Implementations must return `Err` only for connectivity failures
/// (refused connection, DNS, timeout). Calls are independent; implementations
/// hold no per-request state.
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}
