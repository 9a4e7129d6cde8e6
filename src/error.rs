//! The router's own structured error taxonomy.
//!
//! Grounded on `RouteMatchError` in
//! `examples/DanielSarmiento04-kairos-rs/crates/kairos-rs/src/utils/route_matcher.rs` —
//! another request-routing crate in the retrieval pack that models named error kinds
//! with `thiserror` rather than bare strings. The teacher (`BRRTRouter`) itself leans on
//! `anyhow::Error`/`String` for its own internals, but spec.md §7 requires the matcher
//! and dispatcher to distinguish `NoRouteForRequest` from `MethodNotAllowed` from
//! `InvalidTemplate` etc. as named kinds a caller can match on, which a stringly-typed
//! error cannot express without downstream parsing.

use http::Method;
use thiserror::Error;

/// Errors surfaced while compiling, declaring, or matching routes.
///
/// Declaration-time variants ([`RouterError::InvalidTemplate`]) abort the declaration
/// that produced them. Matching-time variants
/// ([`RouterError::NoRouteForRequest`]/[`RouterError::MethodNotAllowed`]) are caught at
/// the [`crate::router::Router`] façade boundary and converted into HTTP responses
/// rather than propagated; see spec.md §6-§7.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouterError {
    /// A URI template was malformed, or declared the same segment name twice.
    #[error("invalid route template {template:?}: {reason}")]
    InvalidTemplate {
        /// The offending template string.
        template: String,
        /// Human-readable description of what made it invalid.
        reason: String,
    },

    /// No declared route's path matched the request.
    #[error("no route matches path {path:?}")]
    NoRouteForRequest {
        /// The request path that failed to match any route.
        path: String,
    },

    /// A route's path matched but none of the matching routes support the request's
    /// method.
    #[error("method {method} not allowed for {path:?}; supported: {supported:?}")]
    MethodNotAllowed {
        /// The request path that matched on at least one route.
        path: String,
        /// The method the caller attempted.
        method: Method,
        /// The union of methods supported by routes whose path matched.
        supported: Vec<Method>,
    },

    /// A string or pair handler named a controller the [`crate::controller::ControllerRegistry`]
    /// has no entry for.
    #[error("unknown controller {0:?}")]
    UnknownController(String),

    /// A string or pair handler named a method the resolved controller does not expose.
    #[error("unknown method {method:?} on controller {controller:?}")]
    UnknownMethod {
        /// The controller identifier that was resolved.
        controller: String,
        /// The method name that controller does not implement.
        method: String,
    },

    /// A handler asked the [`crate::resolver::ResolverRegistry`] for a type with no
    /// registered resolver.
    #[error("no resolver registered for requested type")]
    UnresolvedParameterType,

    /// A route named a middleware identifier the
    /// [`crate::middleware::MiddlewareRegistry`] has no entry for.
    #[error("unknown middleware {0:?}")]
    UnknownMiddleware(String),
}

/// Convenience alias used throughout the crate for fallible router operations.
pub type Result<T> = std::result::Result<T, RouterError>;
