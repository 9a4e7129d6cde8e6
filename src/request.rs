//! The inbound request type routes are matched against and handlers receive.
//!
//! A thin wrapper around [`http::Request`] rather than a bespoke type: the teacher
//! builds its own request/response pair in `src/server/request.rs` on top of raw HTTP
//! parsing, but this crate is router-only (spec.md Non-goals — no listener, no wire
//! parsing), so there is nothing left to wrap except the header/method/path data `http`
//! already models well. Body is kept as raw bytes; JSON decoding is left to handlers.
//!
//! The path is percent-decoded once at construction, the way a listener sitting in
//! front of a router (e.g. `webnis-server`'s `routematcher`, in the retrieval pack's
//! `other_examples/`) typically decodes before matching, so a constraint pattern never
//! has to account for `%2F`-style escaping of a literal segment.

use crate::ids::RequestId;
use http::{HeaderMap, Method};

/// An inbound HTTP request, already parsed by whatever transport sits in front of the
/// router.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    path: String,
    headers: HeaderMap,
    body: Vec<u8>,
    request_id: RequestId,
}

impl Request {
    /// Build a request from its parts, generating a fresh [`RequestId`] for it.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>, headers: HeaderMap, body: Vec<u8>) -> Self {
        let request_id = RequestId::from_header_or_new(
            headers
                .get("x-request-id")
                .and_then(|v| v.to_str().ok()),
        );
        let path = path.into();
        let path = urlencoding::decode(&path)
            .map(|decoded| decoded.into_owned())
            .unwrap_or(path);
        Self {
            method,
            path,
            headers,
            body,
            request_id,
        }
    }

    /// Convenience constructor for a bodyless `GET` request, primarily used by tests.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path, HeaderMap::new(), Vec::new())
    }

    /// The request method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The request path, not including the query string.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The request's headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The raw request body.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// This request's correlation id, either carried over from an `X-Request-Id` header
    /// or freshly generated.
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Whether this request identifies itself as an AJAX call via
    /// `X-Requested-With: XMLHttpRequest`, per spec.md §4.8's content-negotiation rule.
    #[must_use]
    pub fn is_ajax(&self, header_name: &str) -> bool {
        self.headers
            .get(header_name)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.eq_ignore_ascii_case("XMLHttpRequest"))
    }

    /// Whether the request's `Accept` header prefers `application/json`.
    #[must_use]
    pub fn wants_json(&self) -> bool {
        self.headers
            .get(http::header::ACCEPT)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("application/json"))
    }
}
