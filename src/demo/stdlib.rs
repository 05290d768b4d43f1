//! The handler-shapes demo.
//!
//! Every registered path is an exact match. Anything else is left to the
//! transport's static file fallback, rooted at [`ASSETS_DIR`] unless
//! configured otherwise.

use std::sync::Arc;

use axum::http::{Method, StatusCode};

use crate::http::{Handler, HandlerError, HandlerResult, Request, Response};
use crate::routing::middleware::{from_fn, Middleware};
use crate::routing::{RouteError, Router};

/// Default static asset directory.
pub const ASSETS_DIR: &str = "assets";

/// Handler implemented on a type rather than a closure.
pub struct TestHandler;

impl Handler for TestHandler {
    fn handle(&self, _request: &Request) -> HandlerResult {
        Ok(Response::text("Hello client from Handle"))
    }
}

fn test_func(_request: &Request) -> HandlerResult {
    Ok(Response::text("Hello client from HandlerFunc type"))
}

/// Log every form value and the `test` value. GET only.
fn test_get(request: &Request) -> HandlerResult {
    if *request.method() != Method::GET {
        return Ok(Response::with_status(StatusCode::NOT_FOUND));
    }

    let form = request
        .form()
        .map_err(|e| HandlerError::new(StatusCode::BAD_REQUEST, e.to_string()))?;

    for (key, values) in form.iter() {
        tracing::info!(key, values = ?values, "Form value");
    }
    tracing::info!(test = form.get("test").unwrap_or_default(), "Form value for `test`");

    Ok(Response::new())
}

/// Writes a greeting, then whatever the wrapped handler writes.
///
/// The greeting is committed before the handler runs: a failing handler
/// contributes its status and message after it.
pub fn greeting() -> impl Middleware {
    from_fn(|request: &Request, next: &dyn Handler| -> HandlerResult {
        let mut response = Response::text("Hello from testMW\n");
        match next.handle(request) {
            Ok(inner) => {
                response.set_status(inner.status());
                response.headers_mut().extend(inner.headers().clone());
                response.write(inner.body());
            }
            Err(e) => {
                response.set_status(e.status());
                response.write(e.to_string().as_bytes());
            }
        }
        Ok(response)
    })
}

/// Build the demo router.
pub fn router() -> Result<Router, RouteError> {
    let mut router = Router::new();

    router.handle("/test-handle", TestHandler)?;
    router.handle("/test-func", test_func)?;
    router.handle("/test-handlefunc", |_req: &Request| -> HandlerResult {
        Ok(Response::text("Hello client from HandleFunc"))
    })?;
    router.handle("/test-get", test_get)?;

    // Wrapped per handler, not per router.
    let wrapped = greeting().wrap(Arc::new(|_req: &Request| -> HandlerResult {
        Ok(Response::text("Hello from testMWFunc"))
    }));
    router.handle("/test-mw", move |req: &Request| wrapped.handle(req))?;

    Ok(router)
}
