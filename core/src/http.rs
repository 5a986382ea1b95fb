//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The core
//! crate builds `HttpRequest` values and parses `HttpResponse` values without
//! ever touching the network. The host executes the round-trip, either by
//! hand or through a [`Transport`] implementation handed to the stores.
//!
//! All fields use owned types (`String`, `Vec`) so values can be moved to
//! whatever executes the request without lifetime concerns.

use thiserror::Error;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An HTTP request described as plain data.
///
/// Built by `UserClient::build_*` methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
///
/// Constructed by the host after executing an `HttpRequest`, then passed
/// to `UserClient::parse_*` or a store's `resolve`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// Any status in the 2xx range counts as success, regardless of body.
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

/// The round-trip itself failed: no status was received.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("transport failed: {0}")]
pub struct TransportError(pub String);

/// Executes one request against the remote resource.
///
/// Implementations must issue exactly one request per call and must not
/// retry. Non-2xx statuses are returned as `Ok`; only a missing response is
/// an `Err`.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}
