//! A bearer-token middleware demonstrating the chain's short-circuit behavior.
//!
//! Grounded on the teacher's former `src/middleware/auth.rs`, which likewise rejected
//! requests missing a recognized credential before the handler ran. Kept deliberately
//! simple — a fixed set of accepted tokens rather than JWT/OAuth2 verification, which is
//! out of scope for a routing core (spec.md Non-goals).

use super::{Middleware, Next};
use crate::matching::MatchResult;
use crate::request::Request;
use crate::response::Response;
use http::StatusCode;
use std::collections::HashSet;

/// Rejects requests whose `Authorization: Bearer <token>` header is missing or not in
/// the configured set of accepted tokens.
pub struct AuthMiddleware {
    accepted_tokens: HashSet<String>,
}

impl AuthMiddleware {
    /// Build a middleware that accepts exactly the given tokens.
    #[must_use]
    pub fn new(accepted_tokens: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            accepted_tokens: accepted_tokens.into_iter().map(Into::into).collect(),
        }
    }

    fn token_from(request: &Request) -> Option<&str> {
        request
            .headers()
            .get(http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
    }
}

impl Middleware for AuthMiddleware {
    fn handle(&self, request: &Request, matched: &MatchResult, next: Next<'_>) -> Response {
        match Self::token_from(request) {
            Some(token) if self.accepted_tokens.contains(token) => next(request, matched),
            _ => Response::empty(StatusCode::UNAUTHORIZED),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::{CompiledMatcher, ConstraintMap};
    use http::HeaderMap;

    fn matched() -> MatchResult {
        let matcher = CompiledMatcher::compile("/a", &ConstraintMap::new()).unwrap();
        MatchResult::apply(&matcher, "/a")
    }

    #[test]
    fn missing_token_is_rejected() {
        let mw = AuthMiddleware::new(["secret"]);
        let matched = matched();
        let req = Request::get("/a");
        let resp = mw.handle(&req, &matched, Box::new(|_, _| Response::text("ok")));
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn accepted_token_reaches_handler() {
        let mw = AuthMiddleware::new(["secret"]);
        let matched = matched();
        let mut headers = HeaderMap::new();
        headers.insert(http::header::AUTHORIZATION, "Bearer secret".parse().unwrap());
        let req = Request::new(http::Method::GET, "/a", headers, Vec::new());
        let resp = mw.handle(&req, &matched, Box::new(|_, _| Response::text("ok")));
        assert_eq!(resp.body(), b"ok");
    }

    #[test]
    fn wrong_token_is_rejected() {
        let mw = AuthMiddleware::new(["secret"]);
        let matched = matched();
        let mut headers = HeaderMap::new();
        headers.insert(http::header::AUTHORIZATION, "Bearer wrong".parse().unwrap());
        let req = Request::new(http::Method::GET, "/a", headers, Vec::new());
        let resp = mw.handle(&req, &matched, Box::new(|_, _| panic!("must not run")));
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
