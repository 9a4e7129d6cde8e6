//! The public entry point for declaring and dispatching routes (spec.md §5, §6).
//!
//! Grounds on the teacher's former `Router` (deleted `src/router/core.rs`), which bundled
//! a route table with the registries a request needs resolved against it. This version
//! adds the nested [`GroupScope`] declaration style and threads a [`RouterConfig`]
//! through to matching and content negotiation, which the teacher's OpenAPI-driven
//! router never needed since it had no nested-group or case-folding concept.

use crate::controller::ControllerRegistry;
use crate::error::Result;
use crate::middleware::MiddlewareRegistry;
use crate::pattern::ConstraintMap;
use crate::request::Request;
use crate::resolver::ResolverRegistry;
use crate::response::Response;
use crate::route::{HandlerSpec, Route};
use crate::router::collection::RouteCollection;
use crate::router::group::{GroupScope, GroupStack};
use http::{HeaderName, Method};

/// Router-wide configuration (spec.md §5 `RouterConfig`).
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Whether literal URI segments are matched case-sensitively. Defaults to `true`.
    pub case_sensitive: bool,
    /// The header inspected to detect an AJAX request for content negotiation on
    /// auto-generated 404/405/OPTIONS responses (spec.md §4.8). Defaults to
    /// `X-Requested-With`.
    pub ajax_header_name: HeaderName,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            ajax_header_name: HeaderName::from_static("x-requested-with"),
        }
    }
}

/// The declarative router façade: declare routes (optionally nested in [`GroupScope`]
/// blocks), register resolvers/controllers/middleware, then dispatch requests against
/// the assembled table.
pub struct Router {
    config: RouterConfig,
    collection: RouteCollection,
    group_stack: GroupStack,
    resolvers: ResolverRegistry,
    controllers: ControllerRegistry,
    middlewares: MiddlewareRegistry,
}

impl Router {
    /// A router with default configuration and the default resolver set (spec.md
    /// §4.6's `string`/`integer`/`boolean`/`array` resolvers pre-installed).
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: RouterConfig::default(),
            collection: RouteCollection::new(),
            group_stack: GroupStack::new(),
            resolvers: ResolverRegistry::with_defaults(),
            controllers: ControllerRegistry::new(),
            middlewares: MiddlewareRegistry::new(),
        }
    }

    /// A router built from an explicit [`RouterConfig`].
    #[must_use]
    pub fn with_config(config: RouterConfig) -> Self {
        Self {
            config,
            ..Self::new()
        }
    }

    /// The router's active configuration.
    #[must_use]
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// The router's declared route table, for introspection or `dump_routes`-style
    /// tooling.
    #[must_use]
    pub fn routes(&self) -> &[Route] {
        self.collection.routes()
    }

    /// Log the declared route table at `info` (see [`RouteCollection::dump`]).
    pub fn dump_routes(&self) {
        self.collection.dump();
    }

    /// Mutable access to the resolver registry, for installing custom resolvers beyond
    /// the defaults.
    pub fn resolvers_mut(&mut self) -> &mut ResolverRegistry {
        &mut self.resolvers
    }

    /// Mutable access to the controller registry.
    pub fn controllers_mut(&mut self) -> &mut ControllerRegistry {
        &mut self.controllers
    }

    /// Mutable access to the middleware registry.
    pub fn middlewares_mut(&mut self) -> &mut MiddlewareRegistry {
        &mut self.middlewares
    }

    /// Declare a nested scope: `scope`'s prefix/namespace/constraints/middleware apply
    /// to every route `body` declares, folded together with any enclosing scope
    /// (spec.md §4.4).
    pub fn group(&mut self, scope: GroupScope, body: impl FnOnce(&mut Router)) {
        self.group_stack.push(scope);
        body(self);
        self.group_stack.pop();
    }

    /// Declare a route for `methods` at `pattern`. `GET` implicitly also answers `HEAD`
    /// (spec.md §4.2), unless `HEAD` was already listed explicitly.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RouterError::InvalidTemplate`] if `pattern` (after group
    /// prefix folding) fails to compile.
    pub fn route(
        &mut self,
        methods: Vec<Method>,
        pattern: impl Into<String>,
        handler: HandlerSpec,
    ) -> Result<&mut Route> {
        let mut methods = methods;
        if methods.contains(&Method::GET) && !methods.contains(&Method::HEAD) {
            methods.push(Method::HEAD);
        }

        let effective_uri = self.group_stack.prefix(&pattern.into());
        let effective_namespace = self.group_stack.namespace("", crate::route::NAMESPACE_SEPARATOR);
        let constraints = self.group_stack.constraints(ConstraintMap::new());
        let middleware = self.group_stack.middleware(Vec::new());

        let mut route = Route::new(
            methods,
            effective_uri,
            constraints,
            effective_namespace,
            middleware,
            handler,
        )?;
        if !self.config.case_sensitive {
            route.set_case_sensitive(false)?;
        }
        self.collection.add(route);
        Ok(self
            .collection
            .last_mut()
            .expect("a route was just added"))
    }

    /// Declare a `GET` (and implicit `HEAD`) route.
    ///
    /// # Errors
    ///
    /// See [`Self::route`].
    pub fn get(&mut self, pattern: impl Into<String>, handler: HandlerSpec) -> Result<&mut Route> {
        self.route(vec![Method::GET], pattern, handler)
    }

    /// Declare a `POST` route.
    ///
    /// # Errors
    ///
    /// See [`Self::route`].
    pub fn post(&mut self, pattern: impl Into<String>, handler: HandlerSpec) -> Result<&mut Route> {
        self.route(vec![Method::POST], pattern, handler)
    }

    /// Declare a `PUT` route.
    ///
    /// # Errors
    ///
    /// See [`Self::route`].
    pub fn put(&mut self, pattern: impl Into<String>, handler: HandlerSpec) -> Result<&mut Route> {
        self.route(vec![Method::PUT], pattern, handler)
    }

    /// Declare a `PATCH` route.
    ///
    /// # Errors
    ///
    /// See [`Self::route`].
    pub fn patch(&mut self, pattern: impl Into<String>, handler: HandlerSpec) -> Result<&mut Route> {
        self.route(vec![Method::PATCH], pattern, handler)
    }

    /// Declare a `DELETE` route.
    ///
    /// # Errors
    ///
    /// See [`Self::route`].
    pub fn delete(&mut self, pattern: impl Into<String>, handler: HandlerSpec) -> Result<&mut Route> {
        self.route(vec![Method::DELETE], pattern, handler)
    }

    /// Declare an explicit `OPTIONS` route, pre-empting the router's automatic
    /// pre-flight response for this path (spec.md §4.5).
    ///
    /// # Errors
    ///
    /// See [`Self::route`].
    pub fn options(&mut self, pattern: impl Into<String>, handler: HandlerSpec) -> Result<&mut Route> {
        self.route(vec![Method::OPTIONS], pattern, handler)
    }

    /// Match and dispatch `request` against the declared route table, converting
    /// no-route and wrong-method outcomes into 404/405/OPTIONS responses (spec.md
    /// §4.5, §6).
    ///
    /// # Errors
    ///
    /// Returns a [`crate::error::RouterError`] for a handler-resolution failure that a
    /// caller must decide how to render — see [`RouteCollection::dispatch`].
    pub fn dispatch(&self, request: &Request) -> Result<Response> {
        self.collection.dispatch(
            request,
            &self.resolvers,
            &self.controllers,
            &self.middlewares,
            &self.config,
        )
    }
}
