//! Controller resolution for `"Controller@method"`-style handler declarations.
//!
//! spec.md §4.3 describes string and `[controller, method]` pair handlers resolved
//! through a dependency-injection container: the container builds a controller instance
//! and invokes the named method on it. Rust has no runtime container that can
//! instantiate an arbitrary named type, and building one would mean re-implementing a DI
//! framework — well outside a routing core. Instead, callables are registered ahead of
//! time under the same `"Controller@method"` key spec.md's notation already uses; the
//! registry is a direct lookup rather than an instantiate-then-invoke container (see
//! `SPEC_FULL.md` REDESIGN FLAGS §3).

use crate::error::{Result, RouterError};
use crate::matching::MatchResult;
use crate::request::Request;
use crate::resolver::ResolverRegistry;
use crate::response::Response;
use std::collections::HashMap;
use std::sync::Arc;

/// A controller action: given the request, its match result, and the resolver registry
/// for any further parameter extraction, produce a response.
pub type Action = Arc<dyn Fn(&Request, &MatchResult, &ResolverRegistry) -> Response + Send + Sync>;

/// Maps `"Controller@method"` keys to registered actions.
#[derive(Clone, Default)]
pub struct ControllerRegistry {
    actions: HashMap<String, Action>,
}

impl ControllerRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            actions: HashMap::new(),
        }
    }

    /// Register an action under `controller` and `method`, addressable later as
    /// `"controller@method"`.
    pub fn register<F>(&mut self, controller: &str, method: &str, action: F)
    where
        F: Fn(&Request, &MatchResult, &ResolverRegistry) -> Response + Send + Sync + 'static,
    {
        self.actions
            .insert(format!("{controller}@{method}"), Arc::new(action));
    }

    /// Resolve `controller` and `method` to a registered action.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::UnknownController`] if no action is registered under the
    /// controller at all, or [`RouterError::UnknownMethod`] if the controller is known
    /// under a different method but not this one.
    pub fn resolve(&self, controller: &str, method: &str) -> Result<Action> {
        let key = format!("{controller}@{method}");
        if let Some(action) = self.actions.get(&key) {
            return Ok(action.clone());
        }
        let controller_known = self
            .actions
            .keys()
            .any(|k| k.starts_with(&format!("{controller}@")));
        if controller_known {
            Err(RouterError::UnknownMethod {
                controller: controller.to_string(),
                method: method.to_string(),
            })
        } else {
            Err(RouterError::UnknownController(controller.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_registered_action() {
        let mut registry = ControllerRegistry::new();
        registry.register("Users", "index", |_, _, _| Response::text("ok"));
        let action = registry.resolve("Users", "index").unwrap();
        let resp = action(&Request::get("/"), &MatchResult::none(), &ResolverRegistry::empty());
        assert_eq!(resp.body(), b"ok");
    }

    #[test]
    fn unknown_controller_is_reported() {
        let registry = ControllerRegistry::new();
        let err = registry.resolve("Ghost", "index").unwrap_err();
        assert!(matches!(err, RouterError::UnknownController(c) if c == "Ghost"));
    }

    #[test]
    fn known_controller_unknown_method_is_reported() {
        let mut registry = ControllerRegistry::new();
        registry.register("Users", "index", |_, _, _| Response::text("ok"));
        let err = registry.resolve("Users", "destroy").unwrap_err();
        assert!(matches!(
            err,
            RouterError::UnknownMethod { controller, method }
                if controller == "Users" && method == "destroy"
        ));
    }
}
