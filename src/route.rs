//! A single declared endpoint (spec.md §4.3).
//!
//! Grounds in the same shape the teacher's former `Route` (in the deleted
//! `src/router/core.rs`) used — methods, template, compiled matcher, and a handler
//! descriptor bundled together and treated as immutable once matching starts.

use crate::controller::{Action, ControllerRegistry};
use crate::error::Result;
use crate::matching::MatchResult;
use crate::middleware::MiddlewareRegistry;
use crate::pattern::{CompiledMatcher, Constraint, ConstraintMap};
use crate::request::Request;
use crate::resolver::ResolverRegistry;
use crate::response::Response;
use http::Method;
use std::sync::Arc;

/// Separator used to join an effective namespace onto a string handler's controller
/// reference, and between nested group namespaces (spec.md §3/§4.4).
pub(crate) const NAMESPACE_SEPARATOR: &str = "\\";

/// The method name assumed for a string handler with no `@method` suffix.
const INVOKABLE_ENTRY: &str = "__invoke";

/// How a route's target was declared, before namespace resolution.
pub enum HandlerSpec {
    /// `"Controller@method"`, or bare `"Controller"` (implying [`INVOKABLE_ENTRY`]).
    ControllerString(String),
    /// `[controllerId, methodName]` — declared already split, bypassing namespacing.
    ControllerPair(String, String),
    /// An inline callable, resolved with no controller lookup at all.
    Callable(Action),
}

impl HandlerSpec {
    /// Build a [`HandlerSpec::Callable`] from a plain closure, without requiring the
    /// caller to wrap it in an `Arc` by hand.
    pub fn callable<F>(f: F) -> Self
    where
        F: Fn(&Request, &MatchResult, &ResolverRegistry) -> Response + Send + Sync + 'static,
    {
        Self::Callable(Arc::new(f))
    }
}

/// A handler, split into its dispatchable form but not yet namespaced.
///
/// The namespace prefix is applied at [`Route::run`] time, against whatever namespace is
/// current on the route then — not baked in here — so [`Route::set_namespace`] actually
/// changes where a `ControllerString` handler resolves, even after the route was built.
#[derive(Clone)]
enum Handler {
    /// `raw_controller` is namespaced at dispatch time iff `apply_namespace`; a
    /// `ControllerPair` handler (`apply_namespace = false`) bypasses namespacing
    /// entirely, as declared.
    Controller {
        raw_controller: String,
        method: String,
        apply_namespace: bool,
    },
    Callable(Action),
}

fn split_handler(spec: HandlerSpec) -> Handler {
    match spec {
        HandlerSpec::Callable(action) => Handler::Callable(action),
        HandlerSpec::ControllerPair(controller, method) => Handler::Controller {
            raw_controller: controller,
            method,
            apply_namespace: false,
        },
        HandlerSpec::ControllerString(raw) => {
            let (controller, method) = match raw.split_once('@') {
                Some((c, m)) => (c.to_string(), m.to_string()),
                None => (raw, INVOKABLE_ENTRY.to_string()),
            };
            Handler::Controller {
                raw_controller: controller,
                method,
                apply_namespace: true,
            }
        }
    }
}

/// One declared endpoint: methods, URI template, constraints, middleware, namespace, and
/// a handler descriptor. Owns its compiled matcher.
///
/// Immutable at matching time: the fluent setters below are meant to be called only
/// during declaration, before the route is added to a
/// [`crate::router::RouteCollection`] that has started serving requests (spec.md
/// §3 invariants).
#[derive(Clone)]
pub struct Route {
    methods: Vec<Method>,
    uri: String,
    matcher: CompiledMatcher,
    constraints: ConstraintMap,
    namespace: String,
    middleware: Vec<String>,
    handler: Handler,
    name: Option<String>,
    case_sensitive: bool,
}

impl Route {
    /// Declare a route. `methods` must be non-empty and is kept in declaration order
    /// (spec.md §8 property 7/S3 — the `Allow` header reflects that order); `GET` implies
    /// `HEAD` is expected to already be present in the list (the
    /// [`crate::router::Router`] façade adds it). Duplicate methods are collapsed,
    /// keeping the first occurrence's position.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RouterError::InvalidTemplate`] if `uri` is malformed.
    pub fn new(
        methods: Vec<Method>,
        uri: impl Into<String>,
        constraints: ConstraintMap,
        namespace: impl Into<String>,
        middleware: Vec<String>,
        handler_spec: HandlerSpec,
    ) -> Result<Self> {
        let uri = uri.into();
        let namespace = namespace.into();
        let matcher = CompiledMatcher::compile(&uri, &constraints)?;
        let handler = split_handler(handler_spec);
        let mut deduped = Vec::with_capacity(methods.len());
        for method in methods {
            if !deduped.contains(&method) {
                deduped.push(method);
            }
        }
        Ok(Self {
            methods: deduped,
            uri,
            matcher,
            constraints,
            namespace,
            middleware,
            handler,
            name: None,
            case_sensitive: true,
        })
    }

    /// Recompile the matcher with case-insensitive literal matching. Used by the
    /// [`crate::router::Router`] façade when [`crate::router::RouterConfig::case_sensitive`]
    /// is `false`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RouterError::InvalidTemplate`] under the same conditions
    /// as [`Route::where_`].
    pub fn set_case_sensitive(&mut self, case_sensitive: bool) -> Result<&mut Self> {
        self.case_sensitive = case_sensitive;
        self.matcher =
            CompiledMatcher::compile_with_case(&self.uri, &self.constraints, case_sensitive)?;
        Ok(self)
    }

    /// Attach or replace a constraint for `name`, recompiling the matcher.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RouterError::InvalidTemplate`] if the new constraint set
    /// makes the template fail to compile (it never does on its own, but a future
    /// constraint pattern containing unbalanced groups could).
    pub fn where_(&mut self, name: impl Into<String>, pattern: impl Into<String>, required: Option<bool>) -> Result<&mut Self> {
        self.constraints
            .insert(name.into(), Constraint::new(pattern, required));
        self.matcher =
            CompiledMatcher::compile_with_case(&self.uri, &self.constraints, self.case_sensitive)?;
        Ok(self)
    }

    /// Replace the route's namespace. A `"Controller@method"`/bare-`"Controller"` handler
    /// is namespaced against whatever is current at dispatch time (see [`Route::run`]),
    /// so this observably changes where such a handler resolves; a `[controller,
    /// method]` pair handler bypasses namespacing entirely and is unaffected.
    pub fn set_namespace(&mut self, namespace: impl Into<String>) -> &mut Self {
        self.namespace = namespace.into();
        self
    }

    /// Replace the route's middleware list.
    pub fn set_middlewares(&mut self, middleware: Vec<String>) -> &mut Self {
        self.middleware = middleware;
        self
    }

    /// Replace the route's constraint map wholesale, recompiling the matcher.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RouterError::InvalidTemplate`] under the same conditions
    /// as [`Route::where_`].
    pub fn set_constraints(&mut self, constraints: ConstraintMap) -> Result<&mut Self> {
        self.matcher =
            CompiledMatcher::compile_with_case(&self.uri, &constraints, self.case_sensitive)?;
        self.constraints = constraints;
        Ok(self)
    }

    /// Attach a logical name to the route.
    pub fn name(&mut self, id: impl Into<String>) -> &mut Self {
        self.name = Some(id.into());
        self
    }

    /// The route's logical name, if one was set.
    #[must_use]
    pub fn name_ref(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Whether `method` is in the route's method set.
    #[must_use]
    pub fn supports(&self, method: &Method) -> bool {
        self.methods.contains(method)
    }

    /// The route's declared methods, in declaration order (spec.md §8 property 7).
    #[must_use]
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    /// The original URI template.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Match `path` against the route's compiled matcher.
    #[must_use]
    pub fn match_path(&self, path: &str) -> MatchResult {
        MatchResult::apply(&self.matcher, path)
    }

    /// Execute the middleware chain, ultimately invoking the resolved handler, and
    /// return its coerced response (spec.md §4.3 `run`).
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RouterError::UnknownController`] or
    /// [`crate::error::RouterError::UnknownMethod`] if a controller-string/pair handler
    /// fails to resolve, or [`crate::error::RouterError::UnknownMiddleware`] if a
    /// declared middleware name has no registered entry.
    pub fn run(
        &self,
        matched: &MatchResult,
        request: &Request,
        resolvers: &ResolverRegistry,
        controllers: &ControllerRegistry,
        middlewares: &MiddlewareRegistry,
    ) -> Result<Response> {
        let action: Action = match &self.handler {
            Handler::Callable(action) => Arc::clone(action),
            Handler::Controller {
                raw_controller,
                method,
                apply_namespace,
            } => {
                let controller = if *apply_namespace && !self.namespace.is_empty() {
                    format!("{}{NAMESPACE_SEPARATOR}{raw_controller}", self.namespace)
                } else {
                    raw_controller.clone()
                };
                controllers.resolve(&controller, method)?
            }
        };

        let dispatch = move |req: &Request, mr: &MatchResult| action(req, mr, resolvers);
        middlewares.run(&self.middleware, request, matched, &dispatch)
    }
}
