//! Route registration and the subrouter tree.
//!
//! # Responsibilities
//! - Store routes and child routers in registration order
//! - Scope child routers under a path prefix
//! - Track which middleware applies to which entry
//! - Freeze into a [`Dispatcher`] once configuration is done
//!
//! # Design Decisions
//! - Configuration goes through `&mut Router`; serving goes through the
//!   immutable `Dispatcher`, so the tree cannot change while requests run
//! - Routes and subrouters share one ordered entry list: first match wins
//! - Middleware applies to entries registered after it (not retroactive);
//!   each entry records how much of its router's middleware list it sees

use std::sync::Arc;

use axum::http::Method;
use thiserror::Error;

use crate::http::Handler;
use crate::routing::dispatch::Dispatcher;
use crate::routing::matcher::{MethodMatcher, PathPrefixMatcher};
use crate::routing::middleware::{BoxMiddleware, Middleware};
use crate::routing::pattern::{Pattern, PatternError};
use crate::routing::route::{Route, RouteHandle};

/// Configuration-time routing errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// Route pattern failed to compile.
    #[error(transparent)]
    InvalidPattern(#[from] PatternError),

    /// Subrouter prefix is malformed.
    #[error("Invalid subrouter prefix `{prefix}`: {reason}")]
    InvalidPrefix { prefix: String, reason: &'static str },

    /// Two routes in the same tree share a name.
    #[error("Route name `{0}` is registered more than once")]
    DuplicateName(String),
}

pub(crate) enum Entry {
    Route {
        route: Route,
        middleware_len: usize,
    },
    Subrouter {
        router: Box<Router>,
        middleware_len: usize,
    },
}

/// An ordered set of routes, subrouters and middleware.
#[derive(Default)]
pub struct Router {
    prefix: PathPrefixMatcher,
    entries: Vec<Entry>,
    middleware: Vec<BoxMiddleware>,
}

impl Router {
    /// Create an empty root router.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route.
    ///
    /// An empty `methods` set accepts any method. The route is never
    /// installed if the pattern fails to compile.
    pub fn add_route<H, M>(
        &mut self,
        pattern: &str,
        methods: M,
        handler: H,
        name: Option<&str>,
    ) -> Result<RouteHandle, RouteError>
    where
        H: Handler,
        M: IntoIterator<Item = Method>,
    {
        let pattern = Pattern::compile(pattern)?;
        let route = Route::new(
            pattern,
            MethodMatcher::new(methods),
            name.map(str::to_string),
            Arc::new(handler),
        );

        tracing::debug!(
            prefix = %self.prefix.prefix(),
            pattern = %route.pattern().template(),
            methods = ?route.methods(),
            name = ?route.name(),
            "Route registered"
        );

        let handle = route.handle();
        self.entries.push(Entry::Route {
            route,
            middleware_len: self.middleware.len(),
        });
        Ok(handle)
    }

    /// Register a route for any method.
    pub fn handle<H: Handler>(
        &mut self,
        pattern: &str,
        handler: H,
    ) -> Result<RouteHandle, RouteError> {
        let any: [Method; 0] = [];
        self.add_route(pattern, any, handler, None)
    }

    /// Register a GET-only route.
    pub fn get<H: Handler>(
        &mut self,
        pattern: &str,
        handler: H,
    ) -> Result<RouteHandle, RouteError> {
        self.add_route(pattern, [Method::GET], handler, None)
    }

    /// Create a child router matching paths under `prefix`.
    ///
    /// Child patterns are matched against the path remaining after the prefix,
    /// so a child route `/one` under `/sub` serves `/sub/one`.
    pub fn subrouter(&mut self, prefix: &str) -> Result<&mut Router, RouteError> {
        let child = Router {
            prefix: PathPrefixMatcher::new(prefix)?,
            ..Router::default()
        };
        tracing::debug!(
            parent = %self.prefix.prefix(),
            prefix = %child.prefix.prefix(),
            "Subrouter registered"
        );

        self.entries.push(Entry::Subrouter {
            router: Box::new(child),
            middleware_len: self.middleware.len(),
        });
        match self.entries.last_mut() {
            Some(Entry::Subrouter { router, .. }) => Ok(router.as_mut()),
            _ => unreachable!("subrouter entry was just pushed"),
        }
    }

    /// Append middleware to this router.
    ///
    /// It wraps routes and subrouters registered on this router after the call.
    pub fn use_middleware<M: Middleware>(&mut self, middleware: M) -> &mut Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    /// Prefix this router is mounted under; empty for the root.
    pub fn prefix(&self) -> &str {
        self.prefix.prefix()
    }

    /// Freeze the tree for serving.
    pub fn into_dispatcher(self) -> Result<Dispatcher, RouteError> {
        Dispatcher::new(self)
    }

    pub(crate) fn prefix_matcher(&self) -> &PathPrefixMatcher {
        &self.prefix
    }

    pub(crate) fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub(crate) fn middleware(&self) -> &[BoxMiddleware] {
        &self.middleware
    }
}
