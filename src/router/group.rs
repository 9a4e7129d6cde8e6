//! Nested declaration scopes (spec.md §3 `GroupScope`/`GroupStack`, §4.4).
//!
//! A [`GroupStack`] is pushed and popped around a block of route declarations the way
//! the teacher's own request handling nests coroutine-local scopes (see
//! `src/dispatcher.rs`'s scoped channel setup) — here the scope being nested is a set of
//! prefix/namespace/constraint/middleware defaults rather than a runtime context, but
//! the push-body-pop shape is the same.

use crate::pattern::ConstraintMap;

/// One nested declaration scope. Any subset of fields may be present; absent fields
/// simply contribute nothing when the stack is folded.
#[derive(Debug, Clone, Default)]
pub struct GroupScope {
    /// Path segment(s) prepended to every route declared inside this scope.
    pub prefix: Option<String>,
    /// Namespace segment(s) prepended to every string-handler controller reference.
    pub namespace: Option<String>,
    /// Constraints merged onto every route declared inside this scope.
    pub where_: Option<ConstraintMap>,
    /// Middleware appended onto every route declared inside this scope.
    pub middleware: Option<Vec<String>>,
}

impl GroupScope {
    /// An empty scope contributing nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fluent prefix setter.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Fluent namespace setter.
    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Fluent constraint-map setter.
    #[must_use]
    pub fn where_map(mut self, constraints: ConstraintMap) -> Self {
        self.where_ = Some(constraints);
        self
    }

    /// Fluent middleware-list setter.
    #[must_use]
    pub fn middleware(mut self, middleware: Vec<String>) -> Self {
        self.middleware = Some(middleware);
        self
    }
}

/// Join two path components with `/`, collapsing an adjacent double slash and dropping
/// empty components (spec.md §4.4).
fn join_path(outer: &str, inner: &str) -> String {
    let outer = outer.trim_end_matches('/');
    let inner = inner.trim_start_matches('/');
    match (outer.is_empty(), inner.is_empty()) {
        (true, true) => String::new(),
        (true, false) => format!("/{inner}"),
        (false, true) => outer.to_string(),
        (false, false) => format!("{outer}/{inner}"),
    }
}

/// Join two namespace components with `\`, the same way, dropping empty components.
fn join_namespace(outer: &str, inner: &str, separator: &str) -> String {
    let outer = outer.trim_end_matches(separator);
    let inner = inner.trim_start_matches(separator);
    match (outer.is_empty(), inner.is_empty()) {
        (true, true) => String::new(),
        (true, false) => inner.to_string(),
        (false, true) => outer.to_string(),
        (false, false) => format!("{outer}{separator}{inner}"),
    }
}

/// A stack of active [`GroupScope`]s, pushed and popped as nested `group(...)` blocks
/// are entered and left during declaration. Ephemeral — it exists only while the host
/// application is declaring routes (spec.md §5).
#[derive(Debug, Clone, Default)]
pub struct GroupStack {
    scopes: Vec<GroupScope>,
}

impl GroupStack {
    /// An empty stack, as at the start of declaration.
    #[must_use]
    pub fn new() -> Self {
        Self { scopes: Vec::new() }
    }

    /// Push a new innermost scope.
    pub fn push(&mut self, scope: GroupScope) {
        self.scopes.push(scope);
    }

    /// Pop and return the innermost scope.
    pub fn pop(&mut self) -> Option<GroupScope> {
        self.scopes.pop()
    }

    /// The innermost scope, if the stack is non-empty.
    #[must_use]
    pub fn latest(&self) -> Option<&GroupScope> {
        self.scopes.last()
    }

    /// Fold the stack's prefixes onto `tail`, innermost-first (spec.md §4.4).
    #[must_use]
    pub fn prefix(&self, tail: &str) -> String {
        let mut acc = tail.to_string();
        for scope in self.scopes.iter().rev() {
            if let Some(p) = &scope.prefix {
                acc = join_path(p, &acc);
            }
        }
        acc
    }

    /// Fold the stack's namespaces onto `tail`, innermost-first, joined with `separator`
    /// (spec.md §3/§4.4 — the target language's module separator).
    #[must_use]
    pub fn namespace(&self, tail: &str, separator: &str) -> String {
        let mut acc = tail.to_string();
        for scope in self.scopes.iter().rev() {
            if let Some(ns) = &scope.namespace {
                acc = join_namespace(ns, &acc, separator);
            }
        }
        acc
    }

    /// Merge the stack's constraint maps into `acc`, innermost-first; entries already in
    /// `acc` (the route's own `where()` declarations, conceptually the most specific
    /// scope of all) are never overwritten, and an inner group's entry always beats an
    /// outer group's entry for the same segment name (spec.md §3/§4.4).
    #[must_use]
    pub fn constraints(&self, mut acc: ConstraintMap) -> ConstraintMap {
        for scope in self.scopes.iter().rev() {
            if let Some(where_) = &scope.where_ {
                for (name, constraint) in where_ {
                    acc.entry(name.clone()).or_insert_with(|| constraint.clone());
                }
            }
        }
        acc
    }

    /// Concatenate the stack's middleware lists outermost-to-innermost onto `acc`
    /// (spec.md §4.4 — "the outermost's first middleware becomes the outermost
    /// wrapper", i.e. index 0 of the final list).
    #[must_use]
    pub fn middleware(&self, mut acc: Vec<String>) -> Vec<String> {
        let mut folded = Vec::new();
        for scope in &self.scopes {
            if let Some(mw) = &scope.middleware {
                folded.extend(mw.iter().cloned());
            }
        }
        folded.append(&mut acc);
        folded
    }
}
