//! Router behavior through the public API.

use std::sync::{Arc, Mutex};

use axum::http::Method;
use pathmux::http::{BoxHandler, Handler, HandlerResult, Request, Response};
use pathmux::routing::{DispatchError, Pattern, PatternError, Router};

fn text(body: &'static str) -> impl Handler {
    move |_req: &Request| -> HandlerResult { Ok(Response::text(body)) }
}

fn request(method: Method, uri: &str) -> Request {
    Request::new(method, uri.parse().unwrap())
}

#[test]
fn test_compile_accepts_unique_variables() {
    for template in ["/", "/a", "/a/{b}", "/{a}/{b}/c", "/a/{b}/"] {
        assert!(Pattern::compile(template).is_ok(), "{template}");
    }
}

#[test]
fn test_compile_rejects_duplicates_and_braces() {
    assert!(matches!(
        Pattern::compile("/{id}/x/{id}"),
        Err(PatternError::DuplicateVariable { .. })
    ));
    assert!(matches!(
        Pattern::compile("/{id"),
        Err(PatternError::UnmatchedBrace { .. })
    ));
    assert!(matches!(
        Pattern::compile("/id}"),
        Err(PatternError::UnmatchedBrace { .. })
    ));
}

#[test]
fn test_literal_match_ignores_order_of_other_routes() {
    let mut before = Router::new();
    before.handle("/other/{x}", text("other")).unwrap();
    before.handle("/target", text("target")).unwrap();

    let mut after = Router::new();
    after.handle("/target", text("target")).unwrap();
    after.handle("/other/{x}", text("other")).unwrap();

    for router in [before, after] {
        let dispatcher = router.into_dispatcher().unwrap();
        let response = dispatcher.dispatch(request(Method::GET, "/target")).unwrap();
        assert_eq!(response.body_text(), "target");
    }
}

#[test]
fn test_variable_round_trip() {
    let mut router = Router::new();
    router
        .handle("/handle-vars/{vars}", |req: &Request| -> HandlerResult {
            Ok(Response::text(req.var("vars").unwrap_or_default().to_string()))
        })
        .unwrap();
    let dispatcher = router.into_dispatcher().unwrap();

    let found = dispatcher.match_route(&Method::GET, "/handle-vars/hello").unwrap();
    assert_eq!(found.vars().get("vars"), Some("hello"));

    let response = dispatcher.dispatch(request(Method::GET, "/handle-vars/hello")).unwrap();
    assert_eq!(response.body_text(), "hello");
}

#[test]
fn test_method_mismatch_falls_through() {
    let mut router = Router::new();
    router.get("/thing", text("get")).unwrap();
    router.handle("/thing", text("any")).unwrap();
    let dispatcher = router.into_dispatcher().unwrap();

    let get = dispatcher.dispatch(request(Method::GET, "/thing")).unwrap();
    assert_eq!(get.body_text(), "get");
    let post = dispatcher.dispatch(request(Method::POST, "/thing")).unwrap();
    assert_eq!(post.body_text(), "any");
}

#[test]
fn test_method_mismatch_without_fallback() {
    let mut router = Router::new();
    router.get("/only-get", text("get")).unwrap();
    let dispatcher = router.into_dispatcher().unwrap();

    match dispatcher.dispatch(request(Method::POST, "/only-get")) {
        Err(DispatchError::NoRouteMatched { method, path }) => {
            assert_eq!(method, Method::POST);
            assert_eq!(path, "/only-get");
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn test_subrouter_prefix() {
    let mut router = Router::new();
    router.subrouter("/sub").unwrap().handle("/one", text("one")).unwrap();
    let dispatcher = router.into_dispatcher().unwrap();

    assert!(dispatcher.match_route(&Method::GET, "/sub/one").is_some());
    assert!(dispatcher.match_route(&Method::GET, "/one").is_none());
    assert!(dispatcher.match_route(&Method::GET, "/subway/one").is_none());
}

#[test]
fn test_middleware_order() {
    let log = Arc::new(Mutex::new(Vec::new()));

    let tracer = |name: &'static str, log: Arc<Mutex<Vec<String>>>| {
        move |next: BoxHandler| -> BoxHandler {
            let log = Arc::clone(&log);
            Arc::new(move |req: &Request| -> HandlerResult {
                log.lock().unwrap().push(format!("{name}-before"));
                let result = next.handle(req);
                log.lock().unwrap().push(format!("{name}-after"));
                result
            })
        }
    };

    let mut router = Router::new();
    router.use_middleware(tracer("M1", Arc::clone(&log)));
    router.use_middleware(tracer("M2", Arc::clone(&log)));
    let handler_log = Arc::clone(&log);
    router
        .handle("/", move |_req: &Request| -> HandlerResult {
            handler_log.lock().unwrap().push("H".to_string());
            Ok(Response::new())
        })
        .unwrap();

    let dispatcher = router.into_dispatcher().unwrap();
    dispatcher.dispatch(request(Method::GET, "/")).unwrap();

    assert_eq!(
        *log.lock().unwrap(),
        vec!["M1-before", "M2-before", "H", "M2-after", "M1-after"]
    );
}

#[test]
fn test_dispatch_is_idempotent() {
    let mut router = Router::new();
    router.handle("/a/{x}", text("a")).unwrap();
    router.subrouter("/b").unwrap().handle("/{y}", text("b")).unwrap();
    let dispatcher = router.into_dispatcher().unwrap();

    for path in ["/a/1", "/b/2"] {
        let first = dispatcher.match_route(&Method::GET, path).unwrap();
        let second = dispatcher.match_route(&Method::GET, path).unwrap();
        assert_eq!(first.route().id(), second.route().id());
        assert_eq!(first.vars(), second.vars());
    }
}

#[test]
fn test_dispatcher_is_shareable_across_threads() {
    let mut router = Router::new();
    router
        .handle("/n/{n}", |req: &Request| -> HandlerResult {
            Ok(Response::text(req.var("n").unwrap_or_default().to_string()))
        })
        .unwrap();
    let dispatcher = router.into_dispatcher().unwrap();

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let dispatcher = dispatcher.clone();
            std::thread::spawn(move || {
                let response = dispatcher
                    .dispatch(request(Method::GET, &format!("/n/{i}")))
                    .unwrap();
                assert_eq!(response.body_text(), i.to_string());
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}
