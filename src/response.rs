//! Outbound responses and the coercion trait that builds them from handler return values.
//!
//! spec.md §4.8 describes dynamic-language response coercion: a handler may return an
//! already-built response (passed through unchanged), a string or number (wrapped as
//! text), a bool/sequence/map (serialized as JSON), or nothing (an empty 200). Rust
//! handlers return a single concrete type, so the coercion table becomes a trait each
//! returnable type implements — the same shape as `axum`'s `IntoResponse`, which the
//! retrieval pack's `bayesrs-parti_axum_svc` example leans on for exactly this purpose.

use crate::ids::RequestId;
use http::{HeaderMap, HeaderValue, StatusCode};
use serde::Serialize;

/// An outbound HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl Response {
    /// Build a response from its parts.
    #[must_use]
    pub fn new(status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// An empty response with the given status and no body, per spec.md §4.8's `void`
    /// coercion rule.
    #[must_use]
    pub fn empty(status: StatusCode) -> Self {
        Self::new(status, HeaderMap::new(), Vec::new())
    }

    /// A `200 OK` text response with `Content-Type: text/plain`.
    #[must_use]
    pub fn text(body: impl Into<String>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            http::header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        Self::new(StatusCode::OK, headers, body.into().into_bytes())
    }

    /// A `200 OK` JSON response with `Content-Type: application/json`.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if `value` fails to serialize.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        let body = serde_json::to_vec(value)?;
        let mut headers = HeaderMap::new();
        headers.insert(
            http::header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        Ok(Self::new(StatusCode::OK, headers, body))
    }

    /// Attach the request's correlation id as an `X-Request-Id` response header, mirroring
    /// the id back to the caller the way the teacher's request/response pair does.
    #[must_use]
    pub fn with_request_id(mut self, id: RequestId) -> Self {
        if let Ok(value) = id.to_string().parse() {
            self.headers.insert("x-request-id", value);
        }
        self
    }

    /// Override the response's status code.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Set a header, silently dropping the header if `value` is not a legal header value.
    #[must_use]
    pub fn with_header(mut self, name: impl http::header::IntoHeaderName, value: &str) -> Self {
        if let Ok(value) = value.parse() {
            self.headers.insert(name, value);
        }
        self
    }

    /// The response's status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The response's headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The response's body.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

/// Coerces a handler's return value into a [`Response`], per spec.md §4.8.
pub trait IntoResponse {
    /// Perform the coercion.
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response {
        self
    }
}

impl IntoResponse for String {
    fn into_response(self) -> Response {
        Response::text(self)
    }
}

impl IntoResponse for &str {
    fn into_response(self) -> Response {
        Response::text(self.to_string())
    }
}

impl IntoResponse for () {
    fn into_response(self) -> Response {
        Response::empty(StatusCode::OK)
    }
}

impl IntoResponse for bool {
    fn into_response(self) -> Response {
        Response::json(&self).unwrap_or_else(|_| Response::empty(StatusCode::INTERNAL_SERVER_ERROR))
    }
}

impl IntoResponse for i64 {
    fn into_response(self) -> Response {
        Response::text(self.to_string())
    }
}

impl IntoResponse for serde_json::Value {
    fn into_response(self) -> Response {
        Response::json(&self).unwrap_or_else(|_| Response::empty(StatusCode::INTERNAL_SERVER_ERROR))
    }
}

impl<T> IntoResponse for Vec<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        Response::json(&self).unwrap_or_else(|_| Response::empty(StatusCode::INTERNAL_SERVER_ERROR))
    }
}

/// A handler that can fail renders either leg through [`IntoResponse`] itself: the
/// "failure propagated from the handler" spec.md §7 describes becomes a response the
/// handler's own error type chooses how to render, rather than a Rust error bubbling out
/// of [`crate::router::RouteCollection::dispatch`] for a caller to interpret.
impl<T, E> IntoResponse for Result<T, E>
where
    T: IntoResponse,
    E: IntoResponse,
{
    fn into_response(self) -> Response {
        match self {
            Ok(value) => value.into_response(),
            Err(error) => error.into_response(),
        }
    }
}
