//! Request dispatch over a frozen router tree.
//!
//! # Responsibilities
//! - Walk the tree depth-first in registration order
//! - Select the first route whose pattern and method match
//! - Collect the middleware chain from the root down to the owning router
//! - Invoke the wrapped handler and pass its result through
//!
//! # Design Decisions
//! - Immutable after construction (shared across requests without locks)
//! - Deterministic: the same request always selects the same route
//! - Explicit `NoRouteMatched` rather than a silent default handler
//! - Route names are checked for uniqueness when the tree is frozen

use std::collections::HashMap;
use std::sync::Arc;

use axum::http::Method;
use serde::Serialize;
use thiserror::Error;

use crate::http::{HandlerError, Request, Response};
use crate::routing::middleware::{self, BoxMiddleware};
use crate::routing::pattern::{Pattern, UrlError};
use crate::routing::route::Route;
use crate::routing::router::{Entry, RouteError, Router};
use crate::routing::Vars;

/// Request-time dispatch errors.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No route, subrouter and method combination matched.
    #[error("No route matched {method} {path}")]
    NoRouteMatched { method: Method, path: String },

    /// The handler or a middleware failed.
    #[error(transparent)]
    Handler(#[from] HandlerError),
}

/// Result of matching a request against the tree.
pub struct RouteMatch<'a> {
    route: &'a Route,
    vars: Vars,
    middleware: Vec<&'a BoxMiddleware>,
}

impl<'a> RouteMatch<'a> {
    pub fn route(&self) -> &'a Route {
        self.route
    }

    pub fn vars(&self) -> &Vars {
        &self.vars
    }

    /// Number of middleware wrapping the route.
    pub fn middleware_len(&self) -> usize {
        self.middleware.len()
    }
}

/// One row of the flattened route table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteInfo {
    /// Full template, including subrouter prefixes.
    pub template: String,
    /// Allowed methods; empty means any.
    pub methods: Vec<String>,
    pub name: Option<String>,
}

struct Inner {
    root: Router,
    named: HashMap<String, Pattern>,
}

/// Frozen router tree, cheap to clone and safe to share between tasks.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<Inner>,
}

impl Dispatcher {
    pub(crate) fn new(root: Router) -> Result<Self, RouteError> {
        let mut named = HashMap::new();
        let mut routes = Vec::new();
        collect_routes(&root, "", &mut routes);

        for (full_template, route) in routes {
            if let Some(name) = route.name() {
                if named.contains_key(name) {
                    return Err(RouteError::DuplicateName(name.to_string()));
                }
                named.insert(name.to_string(), Pattern::compile(&full_template)?);
            }
        }

        tracing::debug!(named_routes = named.len(), "Router frozen");
        Ok(Self {
            inner: Arc::new(Inner { root, named }),
        })
    }

    /// Find the first route matching `method` and `path`.
    pub fn match_route(&self, method: &Method, path: &str) -> Option<RouteMatch<'_>> {
        let mut chain = Vec::new();
        let (route, vars) = find(&self.inner.root, method, path, &mut chain)?;
        Some(RouteMatch {
            route,
            vars,
            middleware: chain,
        })
    }

    /// Match the request, wrap the handler in its middleware and invoke it.
    pub fn dispatch(&self, mut request: Request) -> Result<Response, DispatchError> {
        self.dispatch_in_place(&mut request)
    }

    /// Same as [`dispatch`](Self::dispatch), leaving the request with the
    /// caller. On success its variables are those of the matched route.
    pub fn dispatch_in_place(&self, request: &mut Request) -> Result<Response, DispatchError> {
        let Some(matched) = self.match_route(request.method(), request.path()) else {
            tracing::debug!(
                method = %request.method(),
                path = %request.path(),
                "No route matched"
            );
            return Err(DispatchError::NoRouteMatched {
                method: request.method().clone(),
                path: request.path().to_string(),
            });
        };

        tracing::debug!(
            method = %request.method(),
            path = %request.path(),
            pattern = %matched.route.pattern().template(),
            route = ?matched.route.name(),
            vars = matched.vars.len(),
            "Route matched"
        );

        let handler = middleware::compose(
            Arc::clone(matched.route.handler()),
            matched.middleware.iter().copied(),
        );
        request.set_vars(matched.vars);
        Ok(handler.handle(request)?)
    }

    /// Build the full path of a named route.
    pub fn url_for(&self, name: &str, vars: &[(&str, &str)]) -> Result<String, UrlError> {
        self.inner
            .named
            .get(name)
            .ok_or_else(|| UrlError::UnknownRoute(name.to_string()))?
            .build(vars)
    }

    /// All routes in match order.
    pub fn routes(&self) -> Vec<RouteInfo> {
        let mut routes = Vec::new();
        collect_routes(&self.inner.root, "", &mut routes);
        routes
            .into_iter()
            .map(|(template, route)| RouteInfo {
                template,
                methods: route.methods().iter().map(|m| m.to_string()).collect(),
                name: route.name().map(str::to_string),
            })
            .collect()
    }
}

/// Depth-first search; `chain` holds the middleware of the current path
/// through the tree and is restored when a subtree does not match.
fn find<'a>(
    router: &'a Router,
    method: &Method,
    path: &str,
    chain: &mut Vec<&'a BoxMiddleware>,
) -> Option<(&'a Route, Vars)> {
    for entry in router.entries() {
        match entry {
            Entry::Route {
                route,
                middleware_len,
            } => {
                if let Some(vars) = route.matches(method, path) {
                    chain.extend(&router.middleware()[..*middleware_len]);
                    return Some((route, vars));
                }
            }
            Entry::Subrouter {
                router: child,
                middleware_len,
            } => {
                let Some(rest) = child.prefix_matcher().strip(path) else {
                    continue;
                };
                let depth = chain.len();
                chain.extend(&router.middleware()[..*middleware_len]);
                if let Some(found) = find(child, method, rest, chain) {
                    return Some(found);
                }
                chain.truncate(depth);
            }
        }
    }
    None
}

fn collect_routes<'a>(router: &'a Router, prefix: &str, out: &mut Vec<(String, &'a Route)>) {
    let prefix = format!("{}{}", prefix, router.prefix());
    for entry in router.entries() {
        match entry {
            Entry::Route { route, .. } => {
                out.push((format!("{}{}", prefix, route.pattern().template()), route));
            }
            Entry::Subrouter { router: child, .. } => collect_routes(child, &prefix, out),
        }
    }
}
