//! Middleware composition.
//!
//! A middleware turns the next handler into a new handler that wraps it.
//! Chains are applied so that the first element is the outermost wrapper:
//! it runs first on the way in and last on the way out.

use std::sync::Arc;

use crate::http::{BoxHandler, Handler, HandlerResult, Request};

/// Shared, type-erased middleware.
pub type BoxMiddleware = Arc<dyn Middleware>;

/// Wraps a handler in another handler.
pub trait Middleware: Send + Sync + 'static {
    fn wrap(&self, next: BoxHandler) -> BoxHandler;
}

impl<F> Middleware for F
where
    F: Fn(BoxHandler) -> BoxHandler + Send + Sync + 'static,
{
    fn wrap(&self, next: BoxHandler) -> BoxHandler {
        self(next)
    }
}

/// Build a middleware from a `(request, next)` closure.
///
/// The closure decides whether and when to call `next.handle(request)`.
pub fn from_fn<F>(f: F) -> FromFn<F>
where
    F: Fn(&Request, &dyn Handler) -> HandlerResult + Send + Sync + 'static,
{
    FromFn { f: Arc::new(f) }
}

/// Middleware returned by [`from_fn`].
pub struct FromFn<F> {
    f: Arc<F>,
}

impl<F> Middleware for FromFn<F>
where
    F: Fn(&Request, &dyn Handler) -> HandlerResult + Send + Sync + 'static,
{
    fn wrap(&self, next: BoxHandler) -> BoxHandler {
        let f = Arc::clone(&self.f);
        Arc::new(move |request: &Request| -> HandlerResult { f(request, next.as_ref()) })
    }
}

/// Wrap `handler` in `chain`, first element outermost.
///
/// An empty chain returns the handler unchanged.
pub fn compose<'a, I>(handler: BoxHandler, chain: I) -> BoxHandler
where
    I: IntoIterator<Item = &'a BoxMiddleware>,
    I::IntoIter: DoubleEndedIterator,
{
    chain
        .into_iter()
        .rev()
        .fold(handler, |next, middleware| middleware.wrap(next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Response;
    use axum::http::{Method, StatusCode};
    use std::sync::Mutex;

    fn recorder(log: &Arc<Mutex<Vec<String>>>, name: &'static str) -> BoxMiddleware {
        let log = Arc::clone(log);
        Arc::new(from_fn(move |req: &Request, next: &dyn Handler| -> HandlerResult {
            log.lock().unwrap().push(format!("{}-before", name));
            let response = next.handle(req);
            log.lock().unwrap().push(format!("{}-after", name));
            response
        }))
    }

    #[test]
    fn test_compose_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let handler_log = Arc::clone(&log);
        let handler: BoxHandler = Arc::new(move |_req: &Request| -> HandlerResult {
            handler_log.lock().unwrap().push("H".to_string());
            Ok(Response::new())
        });

        let chain = vec![recorder(&log, "M1"), recorder(&log, "M2")];
        let wrapped = compose(handler, &chain);
        wrapped
            .handle(&Request::new(Method::GET, "/".parse().unwrap()))
            .unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            vec!["M1-before", "M2-before", "H", "M2-after", "M1-after"]
        );
    }

    #[test]
    fn test_empty_chain_is_identity() {
        let handler: BoxHandler =
            Arc::new(|_req: &Request| -> HandlerResult { Ok(Response::text("direct")) });
        let wrapped = compose(Arc::clone(&handler), &Vec::<BoxMiddleware>::new());
        assert!(Arc::ptr_eq(&handler, &wrapped));
    }

    #[test]
    fn test_short_circuit() {
        let deny: BoxMiddleware = Arc::new(|_next: BoxHandler| -> BoxHandler {
            Arc::new(|_req: &Request| -> HandlerResult {
                Ok(Response::with_status(StatusCode::FORBIDDEN))
            })
        });
        let handler: BoxHandler =
            Arc::new(|_req: &Request| -> HandlerResult { panic!("handler must not run") });

        let wrapped = compose(handler, [&deny]);
        let response = wrapped
            .handle(&Request::new(Method::GET, "/".parse().unwrap()))
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
