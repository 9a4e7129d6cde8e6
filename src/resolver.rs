//! Type-keyed parameter resolution (spec.md §4.6).
//!
//! spec.md describes the registry as `typeName: String → resolverFn`. Rust has no
//! runtime string name for a parameter's declared type that would be meaningful across
//! crates, but it does have [`std::any::TypeId`] — a process-wide, collision-free key
//! for "this exact Rust type" that is *exactly* what spec.md's "type-keyed mapping from a
//! declared parameter type to a producing function" asks for, just expressed with
//! Rust's own type system instead of a string the host language had to invent because it
//! lacked one. See `SPEC_FULL.md` REDESIGN FLAGS §1 for the full reasoning; this is the
//! crate's only departure from a literal string-keyed registry.

use crate::error::{Result, RouterError};
use crate::matching::MatchResult;
use crate::request::Request;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

/// Everything a resolver needs to produce a value for one handler parameter.
pub struct ResolveContext<'a> {
    /// The raw captured string for this segment, if the route declared one under `name`.
    pub raw: Option<&'a str>,
    /// The full match result, in case a resolver wants more than the single named
    /// segment (e.g. composing several captures into one value).
    pub matched: &'a MatchResult,
    /// The inbound request, available to resolvers that need headers or the body.
    pub request: &'a Request,
    /// The parameter name the handler declared, as spec.md §4.3 step 3 describes.
    pub name: &'a str,
    /// The parameter's positional index among the handler's declared parameters.
    pub index: usize,
}

type BoxedResolver = Arc<dyn Fn(&ResolveContext) -> Box<dyn Any + Send> + Send + Sync>;

/// Process-wide (or, as spec.md §9 suggests, router-scoped) mapping from a declared
/// parameter type to the function that produces a value of that type.
///
/// Installed at boot and read-only thereafter (spec.md §5): entries are registered
/// before the first [`crate::router::RouteCollection::dispatch`] call and never
/// mutated concurrently with matching.
#[derive(Clone, Default)]
pub struct ResolverRegistry {
    resolvers: HashMap<TypeId, BoxedResolver>,
}

impl ResolverRegistry {
    /// An empty registry with no resolvers installed, not even the defaults below.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            resolvers: HashMap::new(),
        }
    }

    /// A registry pre-populated with the default resolvers spec.md §4.6 tabulates for
    /// `string`, `integer`, `boolean`, and `array`.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register::<String, _>(|ctx| ctx.raw.unwrap_or("").to_string());
        registry.register::<i64, _>(|ctx| ctx.raw.and_then(|v| v.parse::<i64>().ok()).unwrap_or(0));
        registry.register::<bool, _>(|ctx| {
            ctx.raw
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "true" | "1" | "yes" | "on"))
                .unwrap_or(false)
        });
        registry.register::<Vec<String>, _>(|ctx| match ctx.raw {
            Some(raw) if raw.contains(',') => {
                raw.split(',').map(|s| s.trim().to_string()).collect()
            }
            Some(raw) if raw.contains('|') => {
                raw.split('|').map(|s| s.trim().to_string()).collect()
            }
            Some(raw) => vec![raw.to_string()],
            None => Vec::new(),
        });
        registry
    }

    /// Register a resolver for `T`. Replaces any resolver previously registered for the
    /// same type.
    pub fn register<T, F>(&mut self, resolver: F)
    where
        T: Send + 'static,
        F: Fn(&ResolveContext) -> T + Send + Sync + 'static,
    {
        self.resolvers.insert(
            TypeId::of::<T>(),
            Arc::new(move |ctx| Box::new(resolver(ctx)) as Box<dyn Any + Send>),
        );
    }

    /// Whether a resolver is registered for `T`.
    #[must_use]
    pub fn resolves<T: 'static>(&self) -> bool {
        self.resolvers.contains_key(&TypeId::of::<T>())
    }

    /// Invoke the resolver registered for `T`.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::UnresolvedParameterType`] if no resolver is registered for
    /// `T`, matching spec.md §4.3 step 3's `UnresolvedParameterType` failure.
    pub fn invoke<T: Send + 'static>(&self, ctx: &ResolveContext) -> Result<T> {
        let resolver = self
            .resolvers
            .get(&TypeId::of::<T>())
            .ok_or(RouterError::UnresolvedParameterType)?;
        let boxed = resolver(ctx);
        boxed
            .downcast::<T>()
            .map(|v| *v)
            .map_err(|_| RouterError::UnresolvedParameterType)
    }

    /// Resolve the single named segment `name` to `T`, building the
    /// [`ResolveContext`] for the caller.
    ///
    /// This is the shape spec.md §9's design note describes handlers using directly
    /// where the host language has no reflection over a handler's formal parameters
    /// (see `SPEC_FULL.md` REDESIGN FLAGS §1): a callable handler already holds
    /// `(request, matched, resolvers)` and calls `resolvers.resolve::<T>("id", request,
    /// matched)` instead of receiving a pre-resolved argument. `index` is fixed at `0`
    /// since handlers here are not declared with an ordered parameter list for the
    /// registry to report a position from.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Self::invoke`].
    pub fn resolve<T: Send + 'static>(
        &self,
        name: &str,
        request: &Request,
        matched: &MatchResult,
    ) -> Result<T> {
        let ctx = ResolveContext {
            raw: matched.named(name),
            matched,
            request,
            name,
            index: 0,
        };
        self.invoke(&ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::{CompiledMatcher, ConstraintMap};
    use crate::request::Request;

    fn ctx<'a>(raw: Option<&'a str>, matched: &'a MatchResult, request: &'a Request) -> ResolveContext<'a> {
        ResolveContext {
            raw,
            matched,
            request,
            name: "id",
            index: 0,
        }
    }

    #[test]
    fn string_resolver_defaults_to_empty_on_absence() {
        let registry = ResolverRegistry::with_defaults();
        let matcher = CompiledMatcher::compile("/a", &ConstraintMap::new()).unwrap();
        let matched = MatchResult::apply(&matcher, "/a");
        let request = Request::get("/a");
        let value: String = registry.invoke(&ctx(None, &matched, &request)).unwrap();
        assert_eq!(value, "");
    }

    #[test]
    fn integer_resolver_parses_or_defaults_to_zero() {
        let registry = ResolverRegistry::with_defaults();
        let matcher = CompiledMatcher::compile("/a", &ConstraintMap::new()).unwrap();
        let matched = MatchResult::apply(&matcher, "/a");
        let request = Request::get("/a");
        let ok: i64 = registry.invoke(&ctx(Some("42"), &matched, &request)).unwrap();
        assert_eq!(ok, 42);
        let bad: i64 = registry
            .invoke(&ctx(Some("not-a-number"), &matched, &request))
            .unwrap();
        assert_eq!(bad, 0);
    }

    #[test]
    fn boolean_resolver_accepts_common_truthy_tokens() {
        let registry = ResolverRegistry::with_defaults();
        let matcher = CompiledMatcher::compile("/a", &ConstraintMap::new()).unwrap();
        let matched = MatchResult::apply(&matcher, "/a");
        let request = Request::get("/a");
        for truthy in ["true", "1", "yes", "on", "TRUE", "On"] {
            let v: bool = registry
                .invoke(&ctx(Some(truthy), &matched, &request))
                .unwrap();
            assert!(v, "{truthy} should resolve truthy");
        }
        let v: bool = registry
            .invoke(&ctx(Some("nope"), &matched, &request))
            .unwrap();
        assert!(!v);
    }

    #[test]
    fn array_resolver_splits_list_shaped_values() {
        let registry = ResolverRegistry::with_defaults();
        let matcher = CompiledMatcher::compile("/a", &ConstraintMap::new()).unwrap();
        let matched = MatchResult::apply(&matcher, "/a");
        let request = Request::get("/a");
        let v: Vec<String> = registry
            .invoke(&ctx(Some("a,b,c"), &matched, &request))
            .unwrap();
        assert_eq!(v, vec!["a", "b", "c"]);
        let v: Vec<String> = registry.invoke(&ctx(Some("solo"), &matched, &request)).unwrap();
        assert_eq!(v, vec!["solo"]);
    }

    #[test]
    fn resolve_convenience_looks_up_named_segment() {
        let registry = ResolverRegistry::with_defaults();
        let matcher = CompiledMatcher::compile("/users/{id}", &ConstraintMap::new()).unwrap();
        let matched = MatchResult::apply(&matcher, "/users/42");
        let request = Request::get("/users/42");
        let id: i64 = registry.resolve("id", &request, &matched).unwrap();
        assert_eq!(id, 42);
    }

    #[test]
    fn unregistered_type_reports_unresolved() {
        let registry = ResolverRegistry::empty();
        let matcher = CompiledMatcher::compile("/a", &ConstraintMap::new()).unwrap();
        let matched = MatchResult::apply(&matcher, "/a");
        let request = Request::get("/a");
        let err = registry.invoke::<String>(&ctx(None, &matched, &request)).unwrap_err();
        assert_eq!(err, RouterError::UnresolvedParameterType);
    }
}
