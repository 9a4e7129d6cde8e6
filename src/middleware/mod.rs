//! Middleware chain execution (spec.md §4.7).
//!
//! The teacher's own middleware trait (formerly `src/middleware/core.rs`) is a
//! before/after hook pair that mutates a shared request/response in place and returns a
//! `bool` to continue or short-circuit. spec.md §4.7 instead describes a linked chain of
//! handlers, each given an explicit `next` continuation it may call zero or one times —
//! the same "onion" model Tower and Actix middleware use. Short-circuiting here means
//! simply not calling `next`, which composes more predictably than a mutate-and-signal
//! `bool` when middleware is layered several deep.

mod auth;

pub use auth::AuthMiddleware;

use crate::error::{Result, RouterError};
use crate::matching::MatchResult;
use crate::request::Request;
use crate::response::Response;
use std::collections::HashMap;
use std::sync::Arc;

/// The remainder of the chain, to be invoked at most once by a [`Middleware`].
pub type Next<'a> = Box<dyn FnOnce(&Request, &MatchResult) -> Response + 'a>;

/// A single link in a route's middleware chain.
///
/// Implementors inspect (and may reject) the request before calling `next`, and may
/// inspect (and rewrite) the response `next` produces. Not calling `next` at all
/// short-circuits the chain — the handler, and every middleware after this one, never
/// runs (spec.md §4.7, scenario S4).
pub trait Middleware: Send + Sync {
    /// Run this middleware, optionally delegating to the rest of the chain via `next`.
    fn handle(&self, request: &Request, matched: &MatchResult, next: Next<'_>) -> Response;
}

/// Registry of named middleware, resolved against a route's declared middleware-name
/// list at dispatch time (spec.md §4.7's "middleware identified by name, group, or
/// alias").
///
/// Groups and aliases are indirection, not middleware themselves: a group names an
/// ordered set of other identifiers (which may themselves be groups or aliases); an
/// alias renames a single identifier. Both are expanded recursively at dispatch time
/// into the flat list of leaf names actually registered via [`Self::register`].
#[derive(Clone, Default)]
pub struct MiddlewareRegistry {
    entries: HashMap<String, Arc<dyn Middleware>>,
    aliases: HashMap<String, String>,
    groups: HashMap<String, Vec<String>>,
}

impl MiddlewareRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            aliases: HashMap::new(),
            groups: HashMap::new(),
        }
    }

    /// Register a middleware under `name`, replacing any previous registration.
    pub fn register(&mut self, name: impl Into<String>, middleware: impl Middleware + 'static) {
        self.entries.insert(name.into(), Arc::new(middleware));
    }

    /// Register `name` as standing in for `target`, recursively (spec.md §4.7).
    pub fn register_alias(&mut self, name: impl Into<String>, target: impl Into<String>) {
        self.aliases.insert(name.into(), target.into());
    }

    /// Register `name` as standing for the ordered set `members`, each of which may
    /// itself be a leaf middleware name, an alias, or another group (spec.md §4.7).
    pub fn register_group(&mut self, name: impl Into<String>, members: Vec<String>) {
        self.groups.insert(name.into(), members);
    }

    /// Recursively expand `names` into the flat, ordered list of leaf middleware names
    /// they denote.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::UnknownMiddleware`] if expanding an identifier would
    /// revisit an identifier already being expanded (an alias/group cycle).
    pub fn expand(&self, names: &[String]) -> Result<Vec<String>> {
        let mut out = Vec::new();
        let mut visiting = Vec::new();
        for name in names {
            self.expand_one(name, &mut visiting, &mut out)?;
        }
        Ok(out)
    }

    fn expand_one(
        &self,
        name: &str,
        visiting: &mut Vec<String>,
        out: &mut Vec<String>,
    ) -> Result<()> {
        if visiting.iter().any(|seen| seen == name) {
            return Err(RouterError::UnknownMiddleware(name.to_string()));
        }
        if let Some(target) = self.aliases.get(name) {
            visiting.push(name.to_string());
            self.expand_one(target, visiting, out)?;
            visiting.pop();
            return Ok(());
        }
        if let Some(members) = self.groups.get(name) {
            visiting.push(name.to_string());
            for member in members {
                self.expand_one(member, visiting, out)?;
            }
            visiting.pop();
            return Ok(());
        }
        out.push(name.to_string());
        Ok(())
    }

    /// Resolve `names` in order (expanding groups and aliases first) and run the full
    /// chain around `handler`, short-circuiting as soon as some middleware declines to
    /// call `next`.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::UnknownMiddleware`] if any identifier in `names` expands
    /// to a leaf name with no registered entry, or if a cycle is detected while
    /// expanding.
    pub fn run(
        &self,
        names: &[String],
        request: &Request,
        matched: &MatchResult,
        handler: &dyn Fn(&Request, &MatchResult) -> Response,
    ) -> Result<Response> {
        let expanded = self.expand(names)?;
        let chain = expanded
            .iter()
            .map(|name| {
                self.entries
                    .get(name)
                    .cloned()
                    .ok_or_else(|| RouterError::UnknownMiddleware(name.clone()))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(run_chain(&chain, request, matched, handler))
    }
}

fn run_chain(
    chain: &[Arc<dyn Middleware>],
    request: &Request,
    matched: &MatchResult,
    handler: &dyn Fn(&Request, &MatchResult) -> Response,
) -> Response {
    match chain.split_first() {
        Some((first, rest)) => {
            let next: Next<'_> = Box::new(move |req, m| run_chain(rest, req, m, handler));
            first.handle(request, matched, next)
        }
        None => handler(request, matched),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::{CompiledMatcher, ConstraintMap};
    use http::StatusCode;

    struct PassThrough;
    impl Middleware for PassThrough {
        fn handle(&self, request: &Request, matched: &MatchResult, next: Next<'_>) -> Response {
            next(request, matched)
        }
    }

    struct ShortCircuit;
    impl Middleware for ShortCircuit {
        fn handle(&self, _request: &Request, _matched: &MatchResult, _next: Next<'_>) -> Response {
            Response::empty(StatusCode::FORBIDDEN)
        }
    }

    fn fixture() -> (MatchResult, Request) {
        let matcher = CompiledMatcher::compile("/a", &ConstraintMap::new()).unwrap();
        let matched = MatchResult::apply(&matcher, "/a");
        (matched, Request::get("/a"))
    }

    #[test]
    fn empty_chain_runs_handler_directly() {
        let registry = MiddlewareRegistry::new();
        let (matched, request) = fixture();
        let resp = registry
            .run(&[], &request, &matched, &|_, _| Response::text("ok"))
            .unwrap();
        assert_eq!(resp.body(), b"ok");
    }

    #[test]
    fn pass_through_middleware_reaches_handler() {
        let mut registry = MiddlewareRegistry::new();
        registry.register("pass", PassThrough);
        let (matched, request) = fixture();
        let resp = registry
            .run(
                &["pass".to_string()],
                &request,
                &matched,
                &|_, _| Response::text("ok"),
            )
            .unwrap();
        assert_eq!(resp.body(), b"ok");
    }

    #[test]
    fn short_circuiting_middleware_prevents_handler_from_running() {
        let mut registry = MiddlewareRegistry::new();
        registry.register("gate", ShortCircuit);
        registry.register("pass", PassThrough);
        let (matched, request) = fixture();
        let resp = registry
            .run(
                &["gate".to_string(), "pass".to_string()],
                &request,
                &matched,
                &|_, _| panic!("handler must not run"),
            )
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn unknown_middleware_name_is_reported() {
        let registry = MiddlewareRegistry::new();
        let (matched, request) = fixture();
        let err = registry
            .run(&["ghost".to_string()], &request, &matched, &|_, _| {
                Response::text("ok")
            })
            .unwrap_err();
        assert!(matches!(err, RouterError::UnknownMiddleware(name) if name == "ghost"));
    }

    #[test]
    fn alias_resolves_to_its_target() {
        let mut registry = MiddlewareRegistry::new();
        registry.register("pass", PassThrough);
        registry.register_alias("web", "pass");
        assert_eq!(registry.expand(&["web".to_string()]).unwrap(), vec!["pass"]);
    }

    #[test]
    fn group_expands_to_its_ordered_members() {
        let mut registry = MiddlewareRegistry::new();
        registry.register("gate", ShortCircuit);
        registry.register("pass", PassThrough);
        registry.register_group("web", vec!["gate".to_string(), "pass".to_string()]);
        assert_eq!(
            registry.expand(&["web".to_string()]).unwrap(),
            vec!["gate", "pass"]
        );
    }

    #[test]
    fn group_members_may_themselves_be_aliases_or_nested_groups() {
        let mut registry = MiddlewareRegistry::new();
        registry.register("pass", PassThrough);
        registry.register_alias("p", "pass");
        registry.register_group("inner", vec!["p".to_string()]);
        registry.register_group("outer", vec!["inner".to_string(), "p".to_string()]);
        assert_eq!(
            registry.expand(&["outer".to_string()]).unwrap(),
            vec!["pass", "pass"]
        );
    }

    #[test]
    fn alias_cycle_is_reported_as_unknown_middleware() {
        let mut registry = MiddlewareRegistry::new();
        registry.register_alias("a", "b");
        registry.register_alias("b", "a");
        let err = registry.expand(&["a".to_string()]).unwrap_err();
        assert!(matches!(err, RouterError::UnknownMiddleware(_)));
    }

    #[test]
    fn group_running_through_dispatch_runs_expanded_members_in_order() {
        let mut registry = MiddlewareRegistry::new();
        registry.register("gate", ShortCircuit);
        registry.register("pass", PassThrough);
        registry.register_group("web", vec!["gate".to_string(), "pass".to_string()]);
        let (matched, request) = fixture();
        let resp = registry
            .run(&["web".to_string()], &request, &matched, &|_, _| {
                panic!("handler must not run")
            })
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }
}
