//! Ordered route table with match-and-dispatch, method-negotiation, and OPTIONS
//! pre-flight (spec.md §4.5).
//!
//! Grounds in the linear-scan shape of the teacher's former `Router::route` (deleted
//! `src/router/core.rs`): declaration order is preserved and the first path+method match
//! wins (spec.md §8 property 4/S6). What the teacher's version didn't need — because
//! OpenAPI specs don't redeclare a path under two methods with ambiguous precedence in
//! the same way — is the method-not-allowed/OPTIONS distinction spec.md §4.5 requires;
//! that logic is new here, grounded on spec.md's own algorithm rather than teacher code.

use crate::error::{Result, RouterError};
use crate::matching::MatchResult;
use crate::request::Request;
use crate::response::Response;
use crate::resolver::ResolverRegistry;
use crate::controller::ControllerRegistry;
use crate::middleware::MiddlewareRegistry;
use crate::route::Route;
use crate::router::facade::RouterConfig;
use http::{Method, StatusCode};
use std::collections::HashSet;

/// Ordered collection of declared routes. `add` appends; declaration order is the order
/// routes are tried in at match time (spec.md §4.5, §5).
#[derive(Clone, Default)]
pub struct RouteCollection {
    routes: Vec<Route>,
}

impl RouteCollection {
    /// An empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route, preserving declaration order.
    pub fn add(&mut self, route: Route) {
        self.routes.push(route);
    }

    /// The declared routes, in declaration order.
    #[must_use]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub(crate) fn last_mut(&mut self) -> Option<&mut Route> {
        self.routes.last_mut()
    }

    /// Log the declared route table at `info`, grounded on the teacher's
    /// `dump_routes` debug helper (`src/router/core.rs`). Operational visibility only —
    /// not a spec.md operation.
    pub fn dump(&self) {
        tracing::info!(route_count = self.routes.len(), "route table");
        for route in &self.routes {
            tracing::info!(uri = route.uri(), methods = ?route.methods(), "declared route");
        }
    }

    /// Find the first route whose path and method both match, or classify the failure
    /// as [`RouterError::NoRouteForRequest`] (no path matched at all) or
    /// [`RouterError::MethodNotAllowed`] (a path matched, but not for this method),
    /// carrying the union of methods supported by every path-matching route in
    /// first-seen order (spec.md §4.5 steps 1-4).
    ///
    /// # Errors
    ///
    /// See above.
    pub fn try_match(&self, request: &Request) -> Result<(&Route, MatchResult)> {
        let mut path_candidates = Vec::new();
        for route in &self.routes {
            let matched = route.match_path(request.path());
            if !matched.matched() {
                continue;
            }
            if route.supports(request.method()) {
                return Ok((route, matched));
            }
            path_candidates.push(route);
        }

        if path_candidates.is_empty() {
            return Err(RouterError::NoRouteForRequest {
                path: request.path().to_string(),
            });
        }

        Err(RouterError::MethodNotAllowed {
            path: request.path().to_string(),
            method: request.method().clone(),
            supported: union_methods(&path_candidates),
        })
    }

    /// Match `request` and dispatch it, per spec.md §4.5/§6. Returns a fully-formed
    /// [`Response`] for every outcome except a handler-resolution failure
    /// ([`RouterError::UnknownController`]/[`RouterError::UnknownMethod`]/
    /// [`RouterError::UnresolvedParameterType`]/[`RouterError::UnknownMiddleware`]),
    /// which propagates unchanged (spec.md §7 — handler-internal errors are not
    /// auto-converted, unlike 404/405).
    ///
    /// # Errors
    ///
    /// See above.
    pub fn dispatch(
        &self,
        request: &Request,
        resolvers: &ResolverRegistry,
        controllers: &ControllerRegistry,
        middlewares: &MiddlewareRegistry,
        config: &RouterConfig,
    ) -> Result<Response> {
        let ajax = wants_json(request, config);
        match self.try_match(request) {
            Ok((route, matched)) => {
                tracing::debug!(
                    request_id = %request.request_id(),
                    method = %request.method(),
                    path = request.path(),
                    uri = route.uri(),
                    "route matched"
                );
                route.run(&matched, request, resolvers, controllers, middlewares)
            }
            Err(RouterError::NoRouteForRequest { path }) => {
                tracing::warn!(
                    request_id = %request.request_id(),
                    method = %request.method(),
                    %path,
                    "no route for request"
                );
                Ok(not_found(ajax))
            }
            Err(RouterError::MethodNotAllowed {
                path, supported, ..
            }) => {
                if *request.method() == Method::OPTIONS {
                    tracing::debug!(
                        request_id = %request.request_id(),
                        %path,
                        "answering OPTIONS pre-flight"
                    );
                    Ok(options_response(ajax, &supported))
                } else {
                    tracing::warn!(
                        request_id = %request.request_id(),
                        method = %request.method(),
                        %path,
                        supported = ?supported,
                        "method not allowed"
                    );
                    Ok(method_not_allowed(ajax, &supported))
                }
            }
            Err(other) => Err(other),
        }
    }
}

fn union_methods(routes: &[&Route]) -> Vec<Method> {
    let mut seen = HashSet::new();
    let mut supported = Vec::new();
    for route in routes {
        for method in route.methods() {
            if seen.insert(method.clone()) {
                supported.push(method.clone());
            }
        }
    }
    supported
}

fn wants_json(request: &Request, config: &RouterConfig) -> bool {
    request.is_ajax(config.ajax_header_name.as_str()) || request.wants_json()
}

fn methods_csv(methods: &[Method]) -> String {
    methods
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn not_found(ajax: bool) -> Response {
    if ajax {
        let body = serde_json::json!({
            "ok": false,
            "message": "Unknown resource.",
            "status": 404,
        });
        Response::json(&body)
            .unwrap_or_else(|_| Response::empty(StatusCode::INTERNAL_SERVER_ERROR))
            .with_status(StatusCode::NOT_FOUND)
    } else {
        Response::text("Not found.").with_status(StatusCode::NOT_FOUND)
    }
}

fn method_not_allowed(ajax: bool, supported: &[Method]) -> Response {
    let csv = methods_csv(supported);
    let resp = if ajax {
        let body = serde_json::json!({
            "ok": false,
            "message": "Method not allowed.",
            "status": 405,
            "allowed": supported.iter().map(Method::as_str).collect::<Vec<_>>(),
        });
        Response::json(&body)
            .unwrap_or_else(|_| Response::empty(StatusCode::INTERNAL_SERVER_ERROR))
            .with_status(StatusCode::METHOD_NOT_ALLOWED)
    } else {
        Response::text(csv.clone()).with_status(StatusCode::METHOD_NOT_ALLOWED)
    };
    resp.with_header(http::header::ALLOW, &csv)
}

fn options_response(ajax: bool, supported: &[Method]) -> Response {
    let csv = methods_csv(supported);
    let resp = if ajax {
        let body: Vec<&str> = supported.iter().map(Method::as_str).collect();
        Response::json(&body).unwrap_or_else(|_| Response::empty(StatusCode::OK))
    } else {
        Response::text(csv.clone())
    };
    resp.with_header(http::header::ALLOW, &csv)
        .with_header("access-control-allow-methods", &csv)
}
