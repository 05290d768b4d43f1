//! Registered routes.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use axum::http::Method;

use crate::http::BoxHandler;
use crate::routing::matcher::MethodMatcher;
use crate::routing::pattern::Pattern;
use crate::routing::Vars;

static NEXT_ROUTE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique route identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RouteId(u64);

impl RouteId {
    fn next() -> Self {
        Self(NEXT_ROUTE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A compiled pattern, its allowed methods, an optional name and a handler.
pub struct Route {
    id: RouteId,
    pattern: Pattern,
    methods: MethodMatcher,
    name: Option<String>,
    handler: BoxHandler,
}

impl Route {
    pub(crate) fn new(
        pattern: Pattern,
        methods: MethodMatcher,
        name: Option<String>,
        handler: BoxHandler,
    ) -> Self {
        Self {
            id: RouteId::next(),
            pattern,
            methods,
            name,
            handler,
        }
    }

    pub fn id(&self) -> RouteId {
        self.id
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Allowed methods; empty means any.
    pub fn methods(&self) -> &[Method] {
        self.methods.methods()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub(crate) fn handler(&self) -> &BoxHandler {
        &self.handler
    }

    /// Match `path` (relative to the owning router) and `method`.
    ///
    /// The pattern is tested first, then the method set.
    pub fn matches(&self, method: &Method, path: &str) -> Option<Vars> {
        let vars = self.pattern.matches(path)?;
        if !self.methods.matches(method) {
            return None;
        }
        Some(vars)
    }

    pub(crate) fn handle(&self) -> RouteHandle {
        RouteHandle {
            id: self.id,
            template: self.pattern.template().to_string(),
            name: self.name.clone(),
        }
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("id", &self.id)
            .field("pattern", &self.pattern.template())
            .field("methods", &self.methods.methods())
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Returned by route registration; identifies the installed route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteHandle {
    id: RouteId,
    template: String,
    name: Option<String>,
}

impl RouteHandle {
    pub fn id(&self) -> RouteId {
        self.id
    }

    /// Template relative to the router the route was added to.
    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HandlerResult, Request, Response};
    use std::sync::Arc;

    fn ok(_req: &Request) -> HandlerResult {
        Ok(Response::new())
    }

    fn route(template: &str, methods: Vec<Method>) -> Route {
        Route::new(
            Pattern::compile(template).unwrap(),
            MethodMatcher::new(methods),
            None,
            Arc::new(ok),
        )
    }

    #[test]
    fn test_ids_are_unique() {
        let a = route("/a", vec![]);
        let b = route("/a", vec![]);
        assert_ne!(a.id(), b.id());
        assert_eq!(a.handle().id(), a.id());
    }

    #[test]
    fn test_matches_pattern_then_method() {
        let r = route("/handle-match", vec![Method::GET]);
        assert!(r.matches(&Method::GET, "/handle-match").is_some());
        assert!(r.matches(&Method::POST, "/handle-match").is_none());
        assert!(r.matches(&Method::GET, "/other").is_none());
    }
}
