//! The router demo.

use axum::http::Method;

use crate::http::middleware::request_log;
use crate::http::{Handler, HandlerResult, Request, Response};
use crate::routing::{RouteError, Router};

/// Name given to the method-restricted route.
pub const MATCHER_ROUTE: &str = "matcher";

/// Handler implemented on a type rather than a closure.
pub struct TestHandler;

impl Handler for TestHandler {
    fn handle(&self, _request: &Request) -> HandlerResult {
        Ok(Response::text("Hello client from Handle"))
    }
}

/// Build the demo router.
///
/// The logging middleware is installed first so it covers every route
/// below it, subrouter included.
pub fn router() -> Result<Router, RouteError> {
    let mut router = Router::new();
    router.use_middleware(request_log());

    router.handle("/test-handle", TestHandler)?;

    router.handle("/handle-func", |_req: &Request| -> HandlerResult {
        Ok(Response::text("hello handle func"))
    })?;

    router.handle("/handle-vars/{vars}", |req: &Request| -> HandlerResult {
        Ok(Response::text(format!(
            "hello vars {}",
            req.var("vars").unwrap_or_default()
        )))
    })?;

    router.add_route(
        "/handle-match",
        [Method::GET],
        |_req: &Request| -> HandlerResult { Ok(Response::text("hello matcher")) },
        Some(MATCHER_ROUTE),
    )?;

    let sub = router.subrouter("/sub")?;
    sub.handle("/", |_req: &Request| -> HandlerResult {
        Ok(Response::text("hello sub"))
    })?;
    sub.get("/one", |_req: &Request| -> HandlerResult {
        Ok(Response::text("hello sub one"))
    })?;

    Ok(router)
}
