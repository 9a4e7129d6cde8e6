//! # switchyard
//!
//! **switchyard** is a declarative HTTP request router: a route table built from URI
//! templates with named and optional segments, per-segment regex constraints, nested
//! declaration groups, and a short-circuiting middleware chain, with no listener or wire
//! parsing of its own.
//!
//! ## Architecture
//!
//! - [`pattern`] — compiles a URI template plus its constraint map into an anchored,
//!   Unicode-aware [`regex::Regex`] with named capture groups.
//! - [`matching`] — applies a compiled matcher to a request path and exposes the
//!   resulting named captures.
//! - [`route`] — a single declared endpoint: methods, template, constraints, middleware,
//!   namespace, and a handler descriptor.
//! - [`router`] — the [`router::Router`] façade used to declare nested route groups
//!   ([`router::GroupScope`]/[`router::GroupStack`]) and dispatch requests against the
//!   assembled [`router::RouteCollection`].
//! - [`resolver`] — type-keyed parameter resolution for handlers that pull typed values
//!   out of a [`matching::MatchResult`] instead of receiving them pre-bound.
//! - [`extract`] — the [`extract::Path`] convenience extractor, binding every named
//!   capture onto one `Deserialize` struct in a single call.
//! - [`controller`] — resolves `"Controller@method"`/`[controller, method]` handler
//!   declarations against a registry of pre-registered callables.
//! - [`middleware`] — the onion-style middleware chain, plus named groups and aliases
//!   that expand to a flat list of registered entries at dispatch time.
//! - [`request`]/[`response`] — the inbound request type and the outbound response type,
//!   including the [`response::IntoResponse`] coercion trait.
//! - [`ids`] — [`ids::RequestId`], a ULID-backed correlation id threaded through tracing
//!   events and mirrored back as an `X-Request-Id` response header.
//! - [`error`] — the [`error::RouterError`] taxonomy every fallible operation in this
//!   crate returns.
//!
//! ## Example
//!
//! ```
//! use switchyard::{HandlerSpec, Request, Response, Router};
//!
//! let mut router = Router::new();
//! router
//!     .get("/ping", HandlerSpec::callable(|_, _, _| Response::text("pong")))
//!     .unwrap();
//!
//! let response = router.dispatch(&Request::get("/ping")).unwrap();
//! assert_eq!(response.body(), b"pong");
//! ```

pub mod controller;
pub mod error;
pub mod extract;
pub mod ids;
pub mod matching;
pub mod middleware;
pub mod pattern;
pub mod request;
pub mod resolver;
pub mod response;
pub mod route;
pub mod router;

pub use controller::{Action, ControllerRegistry};
pub use error::{Result, RouterError};
pub use extract::Path;
pub use ids::RequestId;
pub use matching::MatchResult;
pub use middleware::{Middleware, MiddlewareRegistry, Next};
pub use pattern::{CompiledMatcher, Constraint, ConstraintMap};
pub use request::Request;
pub use resolver::{ResolveContext, ResolverRegistry};
pub use response::{IntoResponse, Response};
pub use route::{HandlerSpec, Route};
pub use router::{GroupScope, GroupStack, RouteCollection, Router, RouterConfig};
