//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum app with a single catch-all handler
//! - Wire up middleware (tracing, request ID, timeout)
//! - Buffer the request body and hand the request to the dispatcher
//! - Map dispatch errors to status codes
//! - Serve static assets when no route matched
//! - Bind server to listener and shut down gracefully

use std::path::PathBuf;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{Request as HttpRequest, StatusCode},
    response::{IntoResponse, Response as HttpResponse},
    routing::any,
    BoxError, Router,
};
use http_body_util::LengthLimitError;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceExt;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::http::request::MakeRequestUuidV4;
use crate::http::Request;
use crate::lifecycle::shutdown;
use crate::observability::metrics;
use crate::routing::{DispatchError, Dispatcher};

/// Application state injected into the catch-all handler.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
    pub assets: Option<PathBuf>,
    pub max_body_bytes: usize,
}

/// HTTP server hosting a frozen router.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and routes.
    pub fn new(config: ServerConfig, dispatcher: Dispatcher) -> Self {
        let state = AppState {
            dispatcher,
            assets: config.assets.dir.as_ref().map(PathBuf::from),
            max_body_bytes: config.limits.max_body_bytes,
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(dispatch_handler))
            .route("/", any(dispatch_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
    }

    /// Run the server until `shutdown` fires, draining in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            assets = ?self.config.assets.dir,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown_rx))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// Catch-all handler: buffer, dispatch, map errors.
async fn dispatch_handler(
    State(state): State<AppState>,
    request: HttpRequest<Body>,
) -> HttpResponse {
    let start_time = Instant::now();
    let (parts, body) = request.into_parts();
    let method = parts.method.to_string();

    let body = match axum::body::to_bytes(body, state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            let status = body_error_status(e.into_inner());
            tracing::warn!(
                status = status.as_u16(),
                limit = state.max_body_bytes,
                "Request body rejected"
            );
            metrics::record_request(&method, status.as_u16(), start_time);
            return status.into_response();
        }
    };

    let mut request = Request::from_parts(parts, body);
    let response = match state.dispatcher.dispatch_in_place(&mut request) {
        Ok(response) => response.into_response(),
        Err(DispatchError::NoRouteMatched { method, path }) => match &state.assets {
            Some(dir) => {
                metrics::record_unmatched(true);
                serve_asset(dir.clone(), request.into_http()).await
            }
            None => {
                tracing::debug!(method = %method, path = %path, "No route matched");
                metrics::record_unmatched(false);
                (StatusCode::NOT_FOUND, "404 page not found").into_response()
            }
        },
        Err(DispatchError::Handler(e)) => {
            let status = e.status();
            if status.is_server_error() {
                tracing::error!(error = %e, "Handler failed");
            } else {
                tracing::debug!(error = %e, "Handler rejected request");
            }
            (status, e.to_string()).into_response()
        }
    };

    metrics::record_request(&method, response.status().as_u16(), start_time);
    response
}

/// 413 when the body hit the configured limit, 400 for any other read failure.
fn body_error_status(err: BoxError) -> StatusCode {
    if err.is::<LengthLimitError>() {
        StatusCode::PAYLOAD_TOO_LARGE
    } else {
        tracing::debug!(error = %err, "Failed to read request body");
        StatusCode::BAD_REQUEST
    }
}

async fn serve_asset(dir: PathBuf, request: HttpRequest<Body>) -> HttpResponse {
    match ServeDir::new(dir).oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HandlerError, HandlerResult, Response};
    use crate::routing::Router as PathRouter;

    fn app(config: ServerConfig) -> Router {
        let mut router = PathRouter::new();
        router
            .handle("/echo/{word}", |req: &Request| -> HandlerResult {
                Ok(Response::text(req.var("word").unwrap_or_default().to_string()))
            })
            .unwrap();
        router
            .handle("/boom", |_req: &Request| -> HandlerResult {
                Err(HandlerError::internal("boom"))
            })
            .unwrap();
        HttpServer::new(config, router.into_dispatcher().unwrap()).router
    }

    async fn call(app: Router, uri: &str, body: Body) -> (StatusCode, String) {
        let request = HttpRequest::builder()
            .method("POST")
            .uri(uri)
            .body(body)
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_dispatches_with_vars() {
        let (status, body) = call(app(ServerConfig::default()), "/echo/hi", Body::empty()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "hi");
    }

    #[tokio::test]
    async fn test_not_found_without_assets() {
        let (status, _) = call(app(ServerConfig::default()), "/nope", Body::empty()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_handler_error_is_500() {
        let (status, body) = call(app(ServerConfig::default()), "/boom", Body::empty()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Internal error: boom");
    }

    #[tokio::test]
    async fn test_body_limit() {
        let mut config = ServerConfig::default();
        config.limits.max_body_bytes = 4;
        let (status, _) = call(app(config), "/echo/hi", Body::from("too long")).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_body_read_failure_is_400() {
        let err: BoxError = Box::new(std::io::Error::other("connection reset"));
        assert_eq!(body_error_status(err), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unmatched_serves_assets() {
        let dir = std::env::temp_dir().join(format!("pathmux-assets-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("hello.txt"), "static hello").unwrap();

        let mut config = ServerConfig::default();
        config.assets.dir = Some(dir.to_string_lossy().into_owned());
        let request = HttpRequest::builder()
            .uri("/hello.txt")
            .body(Body::empty())
            .unwrap();
        let response = app(config).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"static hello");

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn test_request_id_is_propagated() {
        let request = HttpRequest::builder()
            .uri("/echo/x")
            .body(Body::empty())
            .unwrap();
        let response = app(ServerConfig::default()).oneshot(request).await.unwrap();
        assert!(response.headers().contains_key(crate::http::X_REQUEST_ID));
    }
}
